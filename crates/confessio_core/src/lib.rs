//! Core data types for the Confessio publishing pipeline.
//!
//! This crate provides the foundation data types passed between the
//! pipeline stages: sheet rows, moderation verdicts, selection batches,
//! rendered slide sets, the sheet-persisted access token, and the
//! per-run report.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod confession;
mod rendered;
mod report;
mod selection;
mod token;
mod verdict;

pub use confession::{Confession, ConfessionStatus};
pub use rendered::RenderedImageSet;
pub use report::RunReport;
pub use selection::SelectionBatch;
pub use token::SheetToken;
pub use verdict::ModerationVerdict;
