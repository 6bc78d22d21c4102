//! Service traits for the Confessio publishing pipeline.
//!
//! The orchestrator only talks to the four external services through the
//! traits defined here, so the run scenarios can be exercised against
//! in-memory mocks. The renderer is pure and synchronous and therefore
//! has no trait; it is called directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ConfessionStore, Curator, MediaHost, Publisher};
pub use types::HostedImage;
