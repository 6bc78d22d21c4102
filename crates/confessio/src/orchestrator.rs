//! The per-run pipeline driver.

use chrono::Utc;
use confessio_core::{
    Confession, ConfessionStatus, ModerationVerdict, RunReport, SelectionBatch, SheetToken,
};
use confessio_error::{
    ConfessioResult, SheetError, SheetErrorKind, UploadError, UploadErrorKind,
};
use confessio_interface::{ConfessionStore, Curator, MediaHost, Publisher};
use confessio_render::{FontAsset, RenderStyle, render_confession};
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};

/// Per-run tunables lifted out of [`crate::PipelineConfig`] so the
/// pipeline can be driven by tests without an environment.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings {
    /// Upper bound on posts published per run
    pub max_posts_per_run: usize,
    /// Newest unprocessed rows considered per run
    pub fetch_window: usize,
    /// Token age in days that triggers an exchange
    pub token_refresh_days: i64,
}

/// One stateless batch run over the four service seams.
///
/// Failures split two ways. Anything that breaks the whole run before a
/// post could go out is fatal: sheet fetch, a missing or unrefreshable
/// access token. Everything after selection is row-scoped: a render,
/// upload, or publish failure skips that row, leaves its status cell
/// empty for the next run, and the run carries on.
pub struct Pipeline<'a> {
    store: &'a dyn ConfessionStore,
    curator: &'a dyn Curator,
    host: &'a dyn MediaHost,
    publisher: &'a dyn Publisher,
    style: RenderStyle,
    font: &'a FontAsset,
    scratch_dir: PathBuf,
    settings: RunSettings,
}

impl<'a> Pipeline<'a> {
    /// Wire up a pipeline over concrete service implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: &'a dyn ConfessionStore,
        curator: &'a dyn Curator,
        host: &'a dyn MediaHost,
        publisher: &'a dyn Publisher,
        style: RenderStyle,
        font: &'a FontAsset,
        scratch_dir: PathBuf,
        settings: RunSettings,
    ) -> Self {
        Self {
            store,
            curator,
            host,
            publisher,
            style,
            font,
            scratch_dir,
            settings,
        }
    }

    /// Read the sheet-held token and exchange it when it has aged out.
    ///
    /// Runs before anything else so a dead token aborts the run while
    /// every row still has an empty status cell.
    async fn prepare_token(&self) -> ConfessioResult<SheetToken> {
        let mut token = self.store.read_token().await?;
        if !token.is_present() {
            return Err(SheetError::new(SheetErrorKind::MissingToken))?;
        }

        let today = Utc::now().date_naive();
        if token.needs_refresh(self.settings.token_refresh_days, today) {
            info!("Access token aged out, exchanging for a fresh one");
            let fresh = self.publisher.refresh_token(&token.value).await?;
            token = SheetToken {
                value: fresh,
                refreshed_at: Some(today),
            };
            self.store.write_token(&token).await?;
            debug!("Refreshed token written back to the sheet");
        }
        Ok(token)
    }

    /// Moderate every fetched row, marking rejections as they happen.
    async fn moderate(
        &self,
        confessions: &[Confession],
        report: &mut RunReport,
    ) -> Vec<ModerationVerdict> {
        let mut safe = Vec::new();
        for confession in confessions {
            match self.curator.moderate(confession.row, &confession.text).await {
                Ok(verdict) if verdict.is_safe => safe.push(verdict),
                Ok(verdict) => {
                    debug!(
                        row = confession.row,
                        reason = verdict.rejection_reason.as_deref().unwrap_or("unspecified"),
                        "Confession rejected"
                    );
                    self.mark_rejected(confession.row, report).await;
                }
                Err(e) => {
                    warn!(row = confession.row, error = %e, "Moderation failed, leaving row for the next run");
                    report.failed += 1;
                }
            }
        }
        safe
    }

    /// Write a rejected status, tallying the row either way.
    ///
    /// A failed mark is alert-worthy (the row will be re-moderated next
    /// run) but never stops the batch.
    async fn mark_rejected(&self, row: usize, report: &mut RunReport) {
        report.rejected += 1;
        if let Err(e) = self
            .store
            .mark(row, ConfessionStatus::Rejected)
            .await
        {
            error!(row, error = %e, "Failed to mark row rejected");
        }
    }

    /// Render, host, publish, and mark one selected confession.
    ///
    /// Any new hosted asset ids are appended to `hosted` even on
    /// failure, so end-of-run cleanup purges partial uploads too.
    async fn publish_row(
        &self,
        token: &SheetToken,
        verdict: &ModerationVerdict,
        count: u64,
        hosted: &mut Vec<String>,
    ) -> ConfessioResult<()> {
        let rendered = render_confession(
            verdict.row,
            count,
            &verdict.redacted_text,
            &self.style,
            self.font,
            &self.scratch_dir,
        )?;

        let total = rendered.slides.len();
        let mut urls = Vec::with_capacity(total);
        for slide in &rendered.slides {
            let image = match self.host.upload(slide).await {
                Ok(image) => image,
                Err(e) => {
                    // No partial carousel: one failed slide abandons the
                    // whole set. Anything already hosted still gets purged.
                    warn!(row = verdict.row, error = %e, "Slide upload failed, abandoning the set");
                    return Err(UploadError::new(UploadErrorKind::PartialSet {
                        row: verdict.row,
                        uploaded: urls.len(),
                        total,
                    }))?;
                }
            };
            hosted.push(image.public_id.clone());
            urls.push(image.url);
        }

        let fallback = format!("Confession #{count}");
        let caption = verdict.summary_caption.as_deref().unwrap_or(&fallback);
        let post_id = self.publisher.publish(&token.value, &urls, caption).await?;
        info!(row = verdict.row, post_id, "Confession published");

        if let Err(e) = self.store.increment_post_count().await {
            warn!(row = verdict.row, error = %e, "Failed to bump the post counter");
        }
        if let Err(e) = self
            .store
            .mark(verdict.row, ConfessionStatus::Posted)
            .await
        {
            // The post is out but the row still looks unprocessed, which
            // risks a duplicate next run. Loud, but the batch continues.
            error!(row = verdict.row, error = %e, "Published but failed to mark row posted");
        }
        Ok(())
    }

    /// Delete hosted assets and the scratch directory. Best-effort.
    async fn cleanup(&self, hosted: &[String]) {
        if let Err(e) = self.host.delete(hosted).await {
            warn!(error = %e, "Failed to purge hosted slides");
        }
        if self.scratch_dir.exists()
            && let Err(e) = std::fs::remove_dir_all(&self.scratch_dir)
        {
            warn!(error = %e, path = %self.scratch_dir.display(), "Failed to remove scratch directory");
        }
    }

    /// Execute one batch run.
    #[instrument(skip(self))]
    pub async fn run(&self) -> ConfessioResult<RunReport> {
        let mut report = RunReport::default();

        let token = self.prepare_token().await?;

        let mut confessions = self.store.fetch_unprocessed().await?;
        if confessions.len() > self.settings.fetch_window {
            // Keep the newest rows; older ones wait for a future run.
            let skip = confessions.len() - self.settings.fetch_window;
            debug!(skipped = skip, "Fetch window full, deferring older rows");
            confessions.drain(..skip);
        }
        report.fetched = confessions.len();
        if confessions.is_empty() {
            info!("No unprocessed confessions, nothing to do");
            return Ok(report);
        }
        info!(rows = confessions.len(), "Fetched unprocessed confessions");

        let safe = self.moderate(&confessions, &mut report).await;
        if safe.is_empty() {
            info!(%report, "No confessions survived moderation");
            return Ok(report);
        }

        let batch = match self
            .curator
            .select_top(&safe, self.settings.max_posts_per_run)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                // Ranking is best-effort; sheet order stands in.
                warn!(error = %e, "Selection failed, keeping the first safe rows");
                SelectionBatch::new(
                    safe.iter()
                        .take(self.settings.max_posts_per_run)
                        .map(|v| v.row)
                        .collect(),
                )
            }
        };
        report.selected = batch.len();
        debug!(selected = batch.len(), "Selection complete");

        // Safe rows that lost the selection are terminal too, otherwise
        // they would be re-moderated forever.
        for verdict in &safe {
            if !batch.contains(verdict.row) {
                self.mark_rejected(verdict.row, &mut report).await;
            }
        }

        let base_count = match self.store.post_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "Failed to read the post counter, numbering from zero");
                0
            }
        };

        let mut hosted = Vec::new();
        for row in batch.iter() {
            // Selection only ever returns rows from the safe set.
            let Some(verdict) = safe.iter().find(|v| v.row == row) else {
                continue;
            };
            let count = base_count + report.posted as u64 + 1;
            match self.publish_row(&token, verdict, count, &mut hosted).await {
                Ok(()) => report.posted += 1,
                Err(e) => {
                    warn!(row, error = %e, "Row failed mid-publish, leaving it for the next run");
                    report.failed += 1;
                }
            }
        }

        self.cleanup(&hosted).await;

        info!(%report, "Run complete");
        Ok(report)
    }
}
