//! Shared types crossing the service trait boundaries.

use serde::{Deserialize, Serialize};

/// A slide image uploaded to the host, addressable two ways.
///
/// The public URL goes into the Graph API container; the public id is
/// what the end-of-run cleanup deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedImage {
    /// Publicly reachable HTTPS URL
    pub url: String,
    /// Host-side asset identifier
    pub public_id: String,
}
