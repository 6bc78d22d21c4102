//! Full pipeline runs against in-memory service mocks.
//!
//! The renderer runs for real against the font fixture shipped with the
//! render crate, so these scenarios cover the whole row lifecycle.

use async_trait::async_trait;
use chrono::Utc;
use confessio::{Pipeline, RunSettings};
use confessio_core::{
    Confession, ConfessionStatus, ModerationVerdict, SelectionBatch, SheetToken,
};
use confessio_error::{
    ConfessioResult, PublishError, PublishErrorKind, UploadError, UploadErrorKind,
};
use confessio_interface::{ConfessionStore, Curator, HostedImage, MediaHost, Publisher};
use confessio_render::{FontAsset, RenderStyle};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

fn font() -> FontAsset {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../confessio_render/tests/fixtures/DejaVuSansMono.ttf");
    FontAsset::load(&path).unwrap()
}

fn confessions(n: usize) -> Vec<Confession> {
    (0..n)
        .map(|i| Confession {
            row: i + 2,
            submitted_at: "2025-08-01 10:00:00".to_string(),
            text: format!("confession number {i} about something mundane"),
            status: ConfessionStatus::Unprocessed,
        })
        .collect()
}

fn fresh_token() -> SheetToken {
    SheetToken {
        value: "sheet-token".to_string(),
        refreshed_at: Some(Utc::now().date_naive()),
    }
}

fn stale_token() -> SheetToken {
    SheetToken {
        value: "sheet-token".to_string(),
        refreshed_at: None,
    }
}

struct MockStore {
    rows: Vec<Confession>,
    token: SheetToken,
    statuses: Mutex<HashMap<usize, ConfessionStatus>>,
    count: Mutex<u64>,
    written_token: Mutex<Option<SheetToken>>,
}

impl MockStore {
    fn new(rows: Vec<Confession>, token: SheetToken) -> Self {
        Self {
            rows,
            token,
            statuses: Mutex::new(HashMap::new()),
            count: Mutex::new(0),
            written_token: Mutex::new(None),
        }
    }

    fn status_of(&self, row: usize) -> Option<ConfessionStatus> {
        self.statuses.lock().unwrap().get(&row).copied()
    }
}

#[async_trait]
impl ConfessionStore for MockStore {
    async fn fetch_unprocessed(&self) -> ConfessioResult<Vec<Confession>> {
        Ok(self.rows.clone())
    }

    async fn mark(&self, row: usize, status: ConfessionStatus) -> ConfessioResult<()> {
        self.statuses.lock().unwrap().insert(row, status);
        Ok(())
    }

    async fn post_count(&self) -> ConfessioResult<u64> {
        Ok(*self.count.lock().unwrap())
    }

    async fn increment_post_count(&self) -> ConfessioResult<()> {
        *self.count.lock().unwrap() += 1;
        Ok(())
    }

    async fn read_token(&self) -> ConfessioResult<SheetToken> {
        Ok(self.token.clone())
    }

    async fn write_token(&self, token: &SheetToken) -> ConfessioResult<()> {
        *self.written_token.lock().unwrap() = Some(token.clone());
        Ok(())
    }
}

struct MockCurator {
    unsafe_rows: HashSet<usize>,
}

impl MockCurator {
    fn new(unsafe_rows: impl IntoIterator<Item = usize>) -> Self {
        Self {
            unsafe_rows: unsafe_rows.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Curator for MockCurator {
    async fn moderate(&self, row: usize, text: &str) -> ConfessioResult<ModerationVerdict> {
        if self.unsafe_rows.contains(&row) {
            return Ok(ModerationVerdict::rejected(row, text, "policy"));
        }
        Ok(ModerationVerdict {
            row,
            is_safe: true,
            rejection_reason: None,
            sentiment: Some("Neutral".to_string()),
            summary_caption: Some(format!("A little secret from row {row}")),
            redacted_text: text.to_string(),
        })
    }

    async fn select_top(
        &self,
        safe: &[ModerationVerdict],
        max: usize,
    ) -> ConfessioResult<SelectionBatch> {
        Ok(SelectionBatch::new(
            safe.iter().take(max).map(|v| v.row).collect(),
        ))
    }
}

#[derive(Default)]
struct MockHost {
    fail_slide: Option<&'static str>,
    uploads: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for MockHost {
    async fn upload(&self, path: &Path) -> ConfessioResult<HostedImage> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_slide == Some(name.as_str()) {
            return Err(UploadError::new(UploadErrorKind::Api {
                status_code: 500,
                message: "upload rejected".to_string(),
            }))?;
        }
        self.uploads.lock().unwrap().push(name.clone());
        Ok(HostedImage {
            url: format!("https://img.example/{name}"),
            public_id: name,
        })
    }

    async fn delete(&self, public_ids: &[String]) -> ConfessioResult<()> {
        self.deleted.lock().unwrap().extend_from_slice(public_ids);
        Ok(())
    }
}

#[derive(Default)]
struct MockPublisher {
    fail_refresh: bool,
    posts: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(
        &self,
        access_token: &str,
        urls: &[String],
        caption: &str,
    ) -> ConfessioResult<String> {
        assert!(!urls.is_empty() && urls.len() <= 10);
        let mut posts = self.posts.lock().unwrap();
        posts.push((access_token.to_string(), caption.to_string(), urls.len()));
        Ok(format!("post_{}", posts.len()))
    }

    async fn refresh_token(&self, _token: &str) -> ConfessioResult<String> {
        if self.fail_refresh {
            return Err(PublishError::new(PublishErrorKind::TokenRefresh(
                "exchange down".to_string(),
            )))?;
        }
        Ok("fresh-token".to_string())
    }
}

fn settings() -> RunSettings {
    RunSettings {
        max_posts_per_run: 4,
        fetch_window: 15,
        token_refresh_days: 45,
    }
}

fn scratch(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("scratch")
}

#[tokio::test]
async fn every_fetched_row_reaches_a_terminal_state() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let store = MockStore::new(confessions(10), fresh_token());
    let curator = MockCurator::new([4, 8]);
    let host = MockHost::default();
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.fetched, 10);
    assert_eq!(report.posted, 4);
    assert_eq!(report.rejected, 6);
    assert_eq!(report.failed, 0);
    assert!(report.accounted());

    for row in 2..=11 {
        let status = store.status_of(row).unwrap();
        assert!(status.is_terminal(), "row {row} still {status}");
    }
    assert_eq!(store.status_of(4), Some(ConfessionStatus::Rejected));
    assert_eq!(store.status_of(8), Some(ConfessionStatus::Rejected));
    assert_eq!(*store.count.lock().unwrap(), 4);

    // Every hosted slide gets purged at end of run.
    let uploads = host.uploads.lock().unwrap().clone();
    let deleted = host.deleted.lock().unwrap().clone();
    assert!(!uploads.is_empty());
    assert_eq!(uploads, deleted);
    assert!(!scratch(&dir).exists());
}

#[tokio::test]
async fn upload_failure_leaves_the_row_for_the_next_run() {
    let font = font();
    let dir = TempDir::new().unwrap();

    // Row 3 needs several slides; its second upload fails mid-set.
    let mut rows = confessions(4);
    rows[1].text =
        "a much longer confession that needs more than one slide once the budget shrinks"
            .to_string();
    let store = MockStore::new(rows, fresh_token());
    let curator = MockCurator::new([]);
    let host = MockHost {
        fail_slide: Some("confession_3_slide_2"),
        ..MockHost::default()
    };
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default().with_char_budget(40),
        &font,
        scratch(&dir),
        settings(),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.fetched, 4);
    assert_eq!(report.posted, 3);
    assert_eq!(report.failed, 1);
    assert!(report.accounted());

    // The failed row keeps its empty status cell.
    assert_eq!(store.status_of(3), None);
    for row in [2, 4, 5] {
        assert_eq!(store.status_of(row), Some(ConfessionStatus::Posted));
    }
    assert_eq!(publisher.posts.lock().unwrap().len(), 3);

    // The slide hosted before the failure is still purged at end of run.
    assert!(
        host.deleted
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == "confession_3_slide_1")
    );
}

#[tokio::test]
async fn missing_token_aborts_the_run() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let blank = SheetToken {
        value: "  ".to_string(),
        refreshed_at: None,
    };
    let store = MockStore::new(confessions(3), blank);
    let curator = MockCurator::new([]);
    let host = MockHost::default();
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    assert!(pipeline.run().await.is_err());
    assert!(store.statuses.lock().unwrap().is_empty());
    assert!(publisher.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn token_refresh_failure_aborts_before_any_write() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let store = MockStore::new(confessions(5), stale_token());
    let curator = MockCurator::new([]);
    let host = MockHost::default();
    let publisher = MockPublisher {
        fail_refresh: true,
        ..MockPublisher::default()
    };
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    assert!(pipeline.run().await.is_err());
    assert!(store.statuses.lock().unwrap().is_empty());
    assert!(publisher.posts.lock().unwrap().is_empty());
    assert!(store.written_token.lock().unwrap().is_none());
}

#[tokio::test]
async fn stale_token_is_exchanged_and_written_back() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let store = MockStore::new(confessions(2), stale_token());
    let curator = MockCurator::new([]);
    let host = MockHost::default();
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.posted, 2);

    let written = store.written_token.lock().unwrap().clone().unwrap();
    assert_eq!(written.value, "fresh-token");
    assert!(written.refreshed_at.is_some());
    // Publishes go out under the fresh token, not the stale one.
    for (token, _, _) in publisher.posts.lock().unwrap().iter() {
        assert_eq!(token, "fresh-token");
    }
}

#[tokio::test]
async fn fetch_window_defers_the_oldest_rows() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let store = MockStore::new(confessions(20), fresh_token());
    let curator = MockCurator::new([]);
    let host = MockHost::default();
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.fetched, 15);
    assert!(report.accounted());

    // Rows 2..=6 fell outside the window and were never touched.
    for row in 2..=6 {
        assert_eq!(store.status_of(row), None);
    }
    for row in 7..=21 {
        assert!(store.status_of(row).unwrap().is_terminal());
    }
}

#[tokio::test]
async fn empty_sheet_is_a_quiet_run() {
    let font = font();
    let dir = TempDir::new().unwrap();

    let store = MockStore::new(Vec::new(), fresh_token());
    let curator = MockCurator::new([]);
    let host = MockHost::default();
    let publisher = MockPublisher::default();
    let pipeline = Pipeline::new(
        &store,
        &curator,
        &host,
        &publisher,
        RenderStyle::default(),
        &font,
        scratch(&dir),
        settings(),
    );

    let report = pipeline.run().await.unwrap();
    assert_eq!(report, confessio_core::RunReport::default());
    assert!(publisher.posts.lock().unwrap().is_empty());
}
