//! Confessio: a scheduled confession publishing pipeline.
//!
//! Each invocation is one stateless batch run: read unprocessed form
//! rows from the sheet, moderate them through Gemini, select a bounded
//! best subset, render the winners into slide images, host the images,
//! publish carousels to Instagram, and write terminal statuses back.
//!
//! The [`Pipeline`] drives the run against the service traits from
//! `confessio_interface`; [`PipelineConfig`] assembles the production
//! clients from environment configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod orchestrator;

pub use config::{PipelineConfig, SlideFormat};
pub use orchestrator::{Pipeline, RunSettings};
