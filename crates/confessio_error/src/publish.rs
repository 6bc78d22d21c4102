//! Social publishing error types.

/// Kinds of publishing errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PublishErrorKind {
    /// Graph API request failed before a response arrived
    #[display("Graph API request failed: {}", _0)]
    Request(String),
    /// Graph API returned a non-success status
    #[display("Graph API HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Response was missing the id field the next step needs
    #[display("Graph API response missing id: {}", _0)]
    MissingId(String),
    /// A carousel needs between one and ten children
    #[display("Carousel size {} outside 1..=10", _0)]
    CarouselSize(usize),
    /// Token refresh exchange failed
    #[display("Token refresh failed: {}", _0)]
    TokenRefresh(String),
}

/// Publishing error with location tracking.
///
/// # Examples
///
/// ```
/// use confessio_error::{PublishError, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::CarouselSize(11));
/// assert!(format!("{}", err).contains("outside 1..=10"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
