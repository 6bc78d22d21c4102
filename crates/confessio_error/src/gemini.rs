//! Gemini curation error types.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API request failed before a response arrived
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("Gemini HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The response carried no candidates (blocked or empty)
    #[display("Gemini returned no candidates: {}", _0)]
    EmptyResponse(String),
    /// The model answer was not the JSON shape the prompt asked for
    #[display("Failed to parse model output: {}", _0)]
    MalformedOutput(String),
    /// The selection response referenced an index outside the batch
    #[display("Selection index {} out of range for batch of {}", index, len)]
    IndexOutOfRange {
        /// 1-based index returned by the model
        index: usize,
        /// Number of entries in the batch
        len: usize,
    },
}

impl GeminiErrorKind {
    /// Whether this failure is a transport problem rather than a verdict.
    ///
    /// Transport failures are the ones a fail-open moderation policy is
    /// allowed to leave unresolved; everything else is a content decision.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GeminiErrorKind::ApiRequest(_) | GeminiErrorKind::Http { .. }
        )
    }
}

/// Gemini error with location tracking.
///
/// # Examples
///
/// ```
/// use confessio_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::ApiRequest("timed out".into()));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new Gemini error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
