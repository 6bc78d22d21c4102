//! Top-level error wrapper types.

use crate::{
    ConfigError, GeminiError, PublishError, RenderError, SheetError, UploadError,
};

/// Foundation error enum covering every failure domain in the pipeline.
///
/// # Examples
///
/// ```
/// use confessio_error::{ConfessioError, ConfigError};
///
/// let config_err = ConfigError::new("Missing field");
/// let err: ConfessioError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ConfessioErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Sheet store error
    #[from(SheetError)]
    Sheet(SheetError),
    /// Gemini curation error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Image rendering error
    #[from(RenderError)]
    Render(RenderError),
    /// Image host upload error
    #[from(UploadError)]
    Upload(UploadError),
    /// Social publishing error
    #[from(PublishError)]
    Publish(PublishError),
}

/// Confessio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use confessio_error::{ConfessioResult, ConfigError};
///
/// fn might_fail() -> ConfessioResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Confessio Error: {}", _0)]
pub struct ConfessioError(Box<ConfessioErrorKind>);

impl ConfessioError {
    /// Create a new error from a kind.
    pub fn new(kind: ConfessioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfessioErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ConfessioErrorKind
impl<T> From<T> for ConfessioError
where
    T: Into<ConfessioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Confessio operations.
///
/// # Examples
///
/// ```
/// use confessio_error::{ConfessioResult, SheetError, SheetErrorKind};
///
/// fn fetch_data() -> ConfessioResult<String> {
///     Err(SheetError::new(SheetErrorKind::MissingToken))?
/// }
/// ```
pub type ConfessioResult<T> = std::result::Result<T, ConfessioError>;
