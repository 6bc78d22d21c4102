//! Image hosting and Instagram Graph publishing.
//!
//! Two clients live here. [`CloudinaryClient`] pushes rendered slides to
//! the image host and deletes them again at end of run, because the
//! Graph API only accepts publicly reachable image URLs. [`GraphClient`]
//! turns those URLs into a single-image or carousel post and handles the
//! long-lived access token exchange.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod host;
mod instagram;

pub use host::{CloudinaryClient, upload_signature};
pub use instagram::GraphClient;
