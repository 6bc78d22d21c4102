//! Styling parameters and font loading.

use ab_glyph::FontVec;
use confessio_error::{RenderError, RenderErrorKind};
use image::Rgb;
use std::path::Path;

/// Hard cap on slides per confession, the carousel limit of the Graph API.
pub const MAX_SLIDES: usize = 10;

/// Visual parameters for slide rendering.
///
/// Every field participates in the determinism contract: identical style
/// plus identical text and font bytes must yield identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Horizontal padding on each side, in pixels
    pub margin: u32,
    /// Canvas fill color
    pub background: Rgb<u8>,
    /// Body text color
    pub text_color: Rgb<u8>,
    /// Watermark and badge color
    pub accent: Rgb<u8>,
    /// Body font size in pixels
    pub body_size: f32,
    /// Watermark and badge font size in pixels
    pub heading_size: f32,
    /// Indicator font size in pixels
    pub small_size: f32,
    /// Vertical distance between body baselines, in pixels
    pub line_height: u32,
    /// Vertical center of the watermark line, in pixels from the top
    pub watermark_y: u32,
    /// Vertical center of the `#N` badge, in pixels from the top
    pub badge_y: u32,
    /// Branding text drawn at the top of every slide
    pub watermark: String,
    /// Character budget per slide for the text splitter
    pub char_budget: usize,
}

impl Default for RenderStyle {
    /// The square feed post: black canvas, white text, 1080x1080.
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            margin: 80,
            background: Rgb([0, 0, 0]),
            text_color: Rgb([255, 255, 255]),
            accent: Rgb([220, 220, 220]),
            body_size: 50.0,
            heading_size: 32.0,
            small_size: 24.0,
            line_height: 60,
            watermark_y: 50,
            badge_y: 100,
            watermark: "QUICK CONFESSIONS".to_string(),
            char_budget: 400,
        }
    }
}

impl RenderStyle {
    /// The 9:16 portrait variant with larger type.
    pub fn reel() -> Self {
        Self {
            width: 1080,
            height: 1920,
            margin: 108,
            body_size: 70.0,
            heading_size: 45.0,
            small_size: 30.0,
            line_height: 85,
            watermark_y: 300,
            badge_y: 360,
            ..Self::default()
        }
    }

    /// Override the branding watermark.
    pub fn with_watermark(mut self, watermark: impl Into<String>) -> Self {
        self.watermark = watermark.into();
        self
    }

    /// Override the per-slide character budget.
    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.char_budget = budget;
        self
    }

    /// Width available to text after margins.
    pub fn text_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.margin)
    }
}

/// A loaded TrueType/OpenType font.
pub struct FontAsset {
    font: FontVec,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset").finish_non_exhaustive()
    }
}

impl FontAsset {
    /// Load a font from disk.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| {
            RenderError::new(RenderErrorKind::FontRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        Self::from_bytes(bytes, &path.display().to_string())
    }

    /// Parse already-read font bytes.
    pub fn from_bytes(bytes: Vec<u8>, origin: &str) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|_| RenderError::new(RenderErrorKind::FontParse(origin.to_string())))?;
        Ok(Self { font })
    }

    /// The parsed font.
    pub fn font(&self) -> &FontVec {
        &self.font
    }
}
