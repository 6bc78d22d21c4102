//! Image host upload error types.

/// Kinds of upload errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UploadErrorKind {
    /// Failed to read an image file before uploading
    #[display("Failed to read image {}: {}", path, message)]
    FileRead {
        /// Path to the image file
        path: String,
        /// Error message
        message: String,
    },
    /// Upload request failed before a response arrived
    #[display("Upload request failed: {}", _0)]
    Request(String),
    /// Image host returned a non-success status
    #[display("Image host HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Upload succeeded but the response lacked a usable URL
    #[display("Upload response missing secure URL: {}", _0)]
    MissingUrl(String),
    /// One slide of a set failed, so the whole set is rejected
    #[display("Partial upload for row {}: {} of {} slides uploaded", row, uploaded, total)]
    PartialSet {
        /// Sheet row the set belonged to
        row: usize,
        /// Number of slides uploaded before the failure
        uploaded: usize,
        /// Total slides in the set
        total: usize,
    },
}

/// Upload error with location tracking.
///
/// # Examples
///
/// ```
/// use confessio_error::{UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::Request("timed out".into()));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload Error: {} at line {} in {}", kind, line, file)]
pub struct UploadError {
    /// The kind of error that occurred
    pub kind: UploadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
