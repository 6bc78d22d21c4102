//! Environment-driven pipeline configuration.

use confessio_error::{ConfessioResult, ConfigError};
use confessio_gemini::ModerationFailMode;
use confessio_render::RenderStyle;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

fn default_moderation_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_selection_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_graph_api_version() -> String {
    "v19.0".to_string()
}

fn default_max_posts_per_run() -> usize {
    4
}

fn default_fetch_window() -> usize {
    15
}

fn default_token_refresh_days() -> i64 {
    45
}

fn default_slide_char_budget() -> usize {
    400
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("confessio")
}

fn default_watermark() -> String {
    "QUICK CONFESSIONS".to_string()
}

/// Canvas format for rendered slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideFormat {
    /// 1080x1080 square feed post
    #[default]
    Square,
    /// 1080x1920 portrait reel frame
    Reel,
}

/// Everything one run needs, read from `CONFESSIO_`-prefixed environment
/// variables (a `.env` file is honored when present).
///
/// Credentials have no defaults; tunables default to the production
/// values so a deployment only sets what it changes.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Spreadsheet id behind the submission form
    pub sheet_id: String,
    /// Pre-issued OAuth bearer token for the Sheets API
    pub sheets_token: String,
    /// Gemini API key
    pub gemini_api_key: String,
    /// Model used for per-row moderation
    #[serde(default = "default_moderation_model")]
    pub moderation_model: String,
    /// Model used for batch selection
    #[serde(default = "default_selection_model")]
    pub selection_model: String,
    /// Cloudinary cloud name
    pub cloudinary_cloud_name: String,
    /// Cloudinary API key
    pub cloudinary_api_key: String,
    /// Cloudinary API secret
    pub cloudinary_api_secret: String,
    /// Instagram business account id
    pub instagram_account_id: String,
    /// Graph API version segment
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,
    /// Facebook app id, used for the token exchange
    pub facebook_app_id: String,
    /// Facebook app secret, used for the token exchange
    pub facebook_app_secret: String,
    /// Upper bound on posts published per run
    #[serde(default = "default_max_posts_per_run")]
    pub max_posts_per_run: usize,
    /// Newest unprocessed rows considered per run
    #[serde(default = "default_fetch_window")]
    pub fetch_window: usize,
    /// What a moderation transport failure means for the row
    #[serde(default)]
    pub moderation_fail_mode: ModerationFailMode,
    /// Token age in days that triggers an exchange
    #[serde(default = "default_token_refresh_days")]
    pub token_refresh_days: i64,
    /// Character budget per rendered slide
    #[serde(default = "default_slide_char_budget")]
    pub slide_char_budget: usize,
    /// Canvas format for rendered slides
    #[serde(default)]
    pub slide_format: SlideFormat,
    /// TrueType/OpenType font for slide text
    pub font_path: PathBuf,
    /// Working directory for rendered slides, removed at end of run
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Branding text drawn at the top of every slide
    #[serde(default = "default_watermark")]
    pub watermark: String,
}

impl PipelineConfig {
    /// Load configuration from the environment.
    pub fn load() -> ConfessioResult<Self> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CONFESSIO")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        let config: Self = source
            .try_deserialize()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        debug!(
            max_posts = config.max_posts_per_run,
            fetch_window = config.fetch_window,
            fail_mode = %config.moderation_fail_mode,
            format = ?config.slide_format,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// The render style this deployment uses.
    pub fn style(&self) -> RenderStyle {
        let base = match self.slide_format {
            SlideFormat::Square => RenderStyle::default(),
            SlideFormat::Reel => RenderStyle::reel(),
        };
        base.with_watermark(self.watermark.clone())
            .with_char_budget(self.slide_char_budget)
    }
}
