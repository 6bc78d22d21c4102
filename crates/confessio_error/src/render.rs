//! Image rendering error types.

/// Kinds of rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// Font file could not be read
    #[display("Failed to read font file {}: {}", path, message)]
    FontRead {
        /// Path to the font file
        path: String,
        /// Error message
        message: String,
    },
    /// Font bytes were not a parseable font
    #[display("Invalid font data in {}", _0)]
    FontParse(String),
    /// Confession text produced no renderable slides
    #[display("No renderable text for row {}", _0)]
    EmptyText(usize),
    /// Failed to create the scratch directory
    #[display("Failed to create scratch directory {}: {}", path, message)]
    ScratchDir {
        /// Directory path
        path: String,
        /// Error message
        message: String,
    },
    /// Failed to encode or write a slide image
    #[display("Failed to write slide {}: {}", path, message)]
    ImageWrite {
        /// Path the slide was written to
        path: String,
        /// Error message
        message: String,
    },
}

/// Rendering error with location tracking.
///
/// # Examples
///
/// ```
/// use confessio_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::EmptyText(7));
/// assert!(format!("{}", err).contains("row 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new render error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
