//! Error types for the Confessio publishing pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Confessio workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Whether an error is fatal to the run or scoped to a single row is a
//! decision the orchestrator makes; these types only classify what went
//! wrong and where.
//!
//! # Examples
//!
//! ```
//! use confessio_error::{ConfessioResult, SheetError, SheetErrorKind};
//!
//! fn fetch_data() -> ConfessioResult<String> {
//!     Err(SheetError::new(SheetErrorKind::MissingToken))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod publish;
mod render;
mod sheets;
mod upload;

pub use config::ConfigError;
pub use error::{ConfessioError, ConfessioErrorKind, ConfessioResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use publish::{PublishError, PublishErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use sheets::{SheetError, SheetErrorKind};
pub use upload::{UploadError, UploadErrorKind};
