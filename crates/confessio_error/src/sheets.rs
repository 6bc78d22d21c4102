//! Sheet store error types.

/// Kinds of sheet store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SheetErrorKind {
    /// Sheet API bearer token not found in configuration
    #[display("Sheets API token not configured")]
    MissingToken,
    /// Failed to fetch a value range from the sheet
    #[display("Failed to fetch range {}: {}", range, message)]
    RangeFetch {
        /// A1-notation range that was requested
        range: String,
        /// Error message
        message: String,
    },
    /// Failed to write a value range to the sheet
    #[display("Failed to update range {}: {}", range, message)]
    RangeUpdate {
        /// A1-notation range that was written
        range: String,
        /// Error message
        message: String,
    },
    /// A cell held a value the pipeline could not interpret
    #[display("Malformed cell value in {}: {}", cell, message)]
    MalformedCell {
        /// A1-notation cell address
        cell: String,
        /// Error message
        message: String,
    },
    /// Sheet API returned a non-success status
    #[display("Sheets API HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
}

/// Sheet store error with location tracking.
///
/// # Examples
///
/// ```
/// use confessio_error::{SheetError, SheetErrorKind};
///
/// let err = SheetError::new(SheetErrorKind::MissingToken);
/// assert!(format!("{}", err).contains("not configured"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sheet Error: {} at line {} in {}", kind, line, file)]
pub struct SheetError {
    /// The kind of error that occurred
    pub kind: SheetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SheetError {
    /// Create a new sheet error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SheetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
