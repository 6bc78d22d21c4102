//! Per-run outcome counters.

use serde::{Deserialize, Serialize};

/// Counters summarizing one pipeline run.
///
/// Row-scoped failures are tallied here rather than aborting the run;
/// the orchestrator logs the report at the end and the process still
/// exits zero when only individual rows failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Rows fetched with an empty status cell
    pub fetched: usize,
    /// Rows rejected by moderation or passed over by selection
    pub rejected: usize,
    /// Rows chosen for publication
    pub selected: usize,
    /// Rows published and marked posted
    pub posted: usize,
    /// Rows that failed mid-pipeline and stay unprocessed
    pub failed: usize,
}

impl RunReport {
    /// Whether every fetched row reached a terminal or retryable outcome.
    ///
    /// Used as a sanity check in tests; in production the sum always
    /// matches because each stage accounts for every row it drops.
    pub fn accounted(&self) -> bool {
        self.rejected + self.posted + self.failed == self.fetched
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fetched={} rejected={} selected={} posted={} failed={}",
            self.fetched, self.rejected, self.selected, self.posted, self.failed
        )
    }
}
