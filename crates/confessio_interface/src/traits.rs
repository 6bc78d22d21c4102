//! Trait definitions for the wrapped external services.

use crate::HostedImage;
use async_trait::async_trait;
use confessio_core::{
    Confession, ConfessionStatus, ModerationVerdict, SelectionBatch, SheetToken,
};
use confessio_error::ConfessioResult;
use std::path::Path;

/// The spreadsheet behind the submission form.
///
/// Fetch failures are fatal to the run (there is no partial sheet state
/// to operate on); mark failures are row-scoped alerts because the post
/// already went out and only the dedup guard is at risk.
#[async_trait]
pub trait ConfessionStore: Send + Sync {
    /// Rows whose status cell is empty, in sheet order.
    async fn fetch_unprocessed(&self) -> ConfessioResult<Vec<Confession>>;

    /// Write a terminal status into one row's status cell.
    async fn mark(&self, row: usize, status: ConfessionStatus) -> ConfessioResult<()>;

    /// Running count of published confessions.
    async fn post_count(&self) -> ConfessioResult<u64>;

    /// Bump the running count after a successful publish.
    async fn increment_post_count(&self) -> ConfessioResult<()>;

    /// Read the access token cell pair.
    async fn read_token(&self) -> ConfessioResult<SheetToken>;

    /// Overwrite the access token cell pair.
    async fn write_token(&self, token: &SheetToken) -> ConfessioResult<()>;
}

/// The moderation and ranking endpoint.
#[async_trait]
pub trait Curator: Send + Sync {
    /// Classify one confession, drafting the caption and redaction on the way.
    ///
    /// Under the fail-closed policy this never errors: any transport or
    /// parse failure comes back as an unsafe verdict. Under fail-open,
    /// transport failures propagate so the orchestrator can leave the
    /// row unprocessed.
    async fn moderate(&self, row: usize, text: &str) -> ConfessioResult<ModerationVerdict>;

    /// Rank the safe set and keep at most `max` rows.
    ///
    /// Returns every row when the safe set is smaller than `max`. The
    /// ranking is delegated to the model and must be treated as opaque.
    async fn select_top(
        &self,
        safe: &[ModerationVerdict],
        max: usize,
    ) -> ConfessioResult<SelectionBatch>;
}

/// The image hosting endpoint.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload one rendered slide, returning its public address.
    async fn upload(&self, path: &Path) -> ConfessioResult<HostedImage>;

    /// Delete hosted assets at end of run. Best-effort.
    async fn delete(&self, public_ids: &[String]) -> ConfessioResult<()>;
}

/// The social graph endpoint.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Create and publish a post from hosted slide URLs, in order.
    ///
    /// One URL publishes a single-image post; several publish a carousel.
    /// The access token comes from the sheet each run, so it is an
    /// argument rather than client state.
    async fn publish(
        &self,
        access_token: &str,
        urls: &[String],
        caption: &str,
    ) -> ConfessioResult<String>;

    /// Exchange a near-expiry long-lived token for a fresh one.
    async fn refresh_token(&self, token: &str) -> ConfessioResult<String>;
}
