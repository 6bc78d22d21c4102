//! Confession rows and their lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a confession row.
///
/// The status lives in the sheet's status column as lowercase text; an
/// empty cell means the row has not been processed yet. A row moves out
/// of [`ConfessionStatus::Unprocessed`] at most once per run, and the
/// status write is the only guard against posting the same row twice.
///
/// # Examples
///
/// ```
/// use confessio_core::ConfessionStatus;
///
/// assert_eq!(ConfessionStatus::from_cell(""), ConfessionStatus::Unprocessed);
/// assert_eq!(ConfessionStatus::from_cell("posted"), ConfessionStatus::Posted);
/// assert_eq!(ConfessionStatus::Rejected.as_cell(), "rejected");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConfessionStatus {
    /// Status cell is empty; the row has never been through a run
    Unprocessed,
    /// Moderation passed (transient, never written to the sheet)
    Approved,
    /// Moderation rejected the row, or it was passed over for posting
    Rejected,
    /// Published to the social page
    Posted,
}

impl ConfessionStatus {
    /// Parse a status cell, treating empty or unknown text as unprocessed.
    ///
    /// Unknown text maps to unprocessed rather than erroring so a stray
    /// manual edit in the sheet does not wedge the scan.
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().to_lowercase().as_str() {
            "" => ConfessionStatus::Unprocessed,
            "rejected" | "0" => ConfessionStatus::Rejected,
            "posted" | "1" => ConfessionStatus::Posted,
            "approved" => ConfessionStatus::Approved,
            _ => ConfessionStatus::Unprocessed,
        }
    }

    /// Text written back to the status cell.
    pub fn as_cell(&self) -> &'static str {
        match self {
            ConfessionStatus::Unprocessed => "",
            ConfessionStatus::Approved => "approved",
            ConfessionStatus::Rejected => "rejected",
            ConfessionStatus::Posted => "posted",
        }
    }

    /// Whether this status ends the row's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConfessionStatus::Rejected | ConfessionStatus::Posted)
    }
}

/// A user-submitted confession read from the sheet.
///
/// # Examples
///
/// ```
/// use confessio_core::{Confession, ConfessionStatus};
///
/// let row = Confession {
///     row: 42,
///     submitted_at: "2025-06-01 12:00:00".to_string(),
///     text: "I still owe the library a book from my first year.".to_string(),
///     status: ConfessionStatus::Unprocessed,
/// };
/// assert_eq!(row.row, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confession {
    /// 1-based sheet row index, used for all write-backs
    pub row: usize,
    /// Submission timestamp exactly as the form wrote it
    pub submitted_at: String,
    /// Raw confession text
    pub text: String,
    /// Current lifecycle status
    pub status: ConfessionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_unprocessed() {
        assert_eq!(ConfessionStatus::from_cell(""), ConfessionStatus::Unprocessed);
        assert_eq!(ConfessionStatus::from_cell("  "), ConfessionStatus::Unprocessed);
    }

    #[test]
    fn legacy_numeric_statuses_parse() {
        // Earlier runs wrote 1/0 instead of posted/rejected.
        assert_eq!(ConfessionStatus::from_cell("1"), ConfessionStatus::Posted);
        assert_eq!(ConfessionStatus::from_cell("0"), ConfessionStatus::Rejected);
    }

    #[test]
    fn cell_round_trip() {
        for status in [ConfessionStatus::Rejected, ConfessionStatus::Posted] {
            assert_eq!(ConfessionStatus::from_cell(status.as_cell()), status);
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(ConfessionStatus::Posted.is_terminal());
        assert!(ConfessionStatus::Rejected.is_terminal());
        assert!(!ConfessionStatus::Unprocessed.is_terminal());
        assert!(!ConfessionStatus::Approved.is_terminal());
    }
}
