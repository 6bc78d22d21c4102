//! Fixed sheet layout and pure row parsing.
//!
//! Columns are fixed by position: A holds the form timestamp, B the
//! confession text, C the status. Two state cells sit to the right of
//! the data: D1 is the running post counter, E1/F1 the access token and
//! its last refresh date.

use confessio_core::{Confession, ConfessionStatus};

/// First row holding form data (row 1 is the header).
pub const FIRST_DATA_ROW: usize = 2;

/// Column the terminal status is written into.
pub const STATUS_COLUMN: &str = "C";

/// Cell holding the running count of published confessions.
pub const COUNT_CELL: &str = "D1";

/// Cell pair holding the access token and its last refresh date.
pub const TOKEN_RANGE: &str = "E1:F1";

/// Range covering all form data columns.
pub const DATA_RANGE: &str = "A2:C";

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Extract the unprocessed tail of the sheet, in sheet order.
///
/// Form rows append at the bottom, so the scan walks upward from the
/// last row and stops at the first row whose status cell is non-empty.
/// Everything below that point has never been through a run. Rows with
/// empty confession text are skipped but do not stop the scan.
///
/// `first_data_row` is the 1-based sheet row of `values[0]`.
///
/// # Examples
///
/// ```
/// use confessio_sheets::parse_unprocessed_tail;
///
/// let values = vec![
///     vec!["6/1".into(), "old".into(), "posted".into()],
///     vec!["6/2".into(), "newer".into()],
///     vec!["6/3".into(), "newest".into()],
/// ];
/// let rows = parse_unprocessed_tail(&values, 2);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].row, 3);
/// assert_eq!(rows[1].text, "newest");
/// ```
pub fn parse_unprocessed_tail(values: &[Vec<String>], first_data_row: usize) -> Vec<Confession> {
    let mut tail = Vec::new();

    for (offset, row) in values.iter().enumerate().rev() {
        let status = ConfessionStatus::from_cell(cell(row, 2));
        if status != ConfessionStatus::Unprocessed {
            break;
        }

        let text = cell(row, 1).trim();
        if text.is_empty() {
            continue;
        }

        tail.push(Confession {
            row: first_data_row + offset,
            submitted_at: cell(row, 0).to_string(),
            text: text.to_string(),
            status,
        });
    }

    tail.reverse();
    tail
}
