//! Slide rasterization.

use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont, point};
use confessio_core::RenderedImageSet;
use confessio_error::{RenderError, RenderErrorKind};
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, warn};

use crate::split::split_text_into_slides;
use crate::style::{FontAsset, MAX_SLIDES, RenderStyle};

fn blend(base: u8, ink: u8, coverage: f32) -> u8 {
    let c = coverage.clamp(0.0, 1.0);
    (base as f32 * (1.0 - c) + ink as f32 * c).round() as u8
}

fn line_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Draw one line of text with its left edge at `origin_x` and its
/// baseline at `baseline_y`.
fn draw_line(
    img: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    text: &str,
    origin_x: f32,
    baseline_y: f32,
    color: Rgb<u8>,
) {
    let scaled = font.as_scaled(scale);
    let mut caret = origin_x;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph: Glyph = id.with_scale_and_position(scale, point(caret, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                    let pixel = img.get_pixel_mut(x as u32, y as u32);
                    for channel in 0..3 {
                        pixel.0[channel] = blend(pixel.0[channel], color.0[channel], coverage);
                    }
                }
            });
        }
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Draw text horizontally and vertically centered on `(cx, cy)`.
fn draw_centered(
    img: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    text: &str,
    cx: f32,
    cy: f32,
    color: Rgb<u8>,
) {
    let scaled = font.as_scaled(scale);
    let width = line_width(font, scale, text);
    let baseline = cy + (scaled.ascent() + scaled.descent()) / 2.0;
    draw_line(img, font, scale, text, cx - width / 2.0, baseline, color);
}

/// Wrap text into lines no wider than `max_width` pixels.
///
/// Greedy by word; a word wider than the full line is hard-broken by
/// character so nothing ever escapes the canvas.
fn wrap_to_width(font: &FontVec, scale: PxScale, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    let push_word = |lines: &mut Vec<String>, current: &mut String, word: &str| {
        if line_width(font, scale, word) <= max_width {
            *current = word.to_string();
            return;
        }
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            if line_width(font, scale, &chunk) > max_width && chunk.chars().count() > 1 {
                chunk.pop();
                lines.push(std::mem::take(&mut chunk));
                chunk.push(c);
            }
        }
        *current = chunk;
    };

    for word in text.split_whitespace() {
        if current.is_empty() {
            push_word(&mut lines, &mut current, word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if line_width(font, scale, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            push_word(&mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render one slide of a confession to an in-memory canvas.
///
/// `slide_index` is 1-based. `count` is the running confession number
/// shown as a `#N` badge on the first slide. Deterministic for fixed
/// inputs: no timestamps, randomness, or environment enter the canvas.
pub fn render_slide(
    text: &str,
    slide_index: usize,
    total_slides: usize,
    count: u64,
    style: &RenderStyle,
    font: &FontAsset,
) -> RgbImage {
    let font = font.font();
    let mut img = RgbImage::from_pixel(style.width, style.height, style.background);

    let body_scale = PxScale::from(style.body_size);
    let heading_scale = PxScale::from(style.heading_size);
    let small_scale = PxScale::from(style.small_size);

    // Body text, block-centered vertically, each line centered horizontally.
    let lines = wrap_to_width(font, body_scale, text, style.text_width() as f32);
    let total_height = lines.len() as u32 * style.line_height;
    let start_y = style.height.saturating_sub(total_height) / 2;
    let ascent = font.as_scaled(body_scale).ascent();
    for (i, line) in lines.iter().enumerate() {
        let width = line_width(font, body_scale, line);
        let x = (style.width as f32 - width) / 2.0;
        let baseline = start_y as f32 + ascent + (i as u32 * style.line_height) as f32;
        draw_line(&mut img, font, body_scale, line, x, baseline, style.text_color);
    }

    // Branding watermark on every slide.
    draw_centered(
        &mut img,
        font,
        heading_scale,
        &style.watermark,
        style.width as f32 / 2.0,
        style.watermark_y as f32,
        style.accent,
    );

    // Running confession number on the first slide only.
    if slide_index == 1 {
        draw_centered(
            &mut img,
            font,
            heading_scale,
            &format!("#{count}"),
            style.width as f32 / 2.0,
            style.badge_y as f32,
            style.accent,
        );
    }

    // Carousel position indicator, bottom-right, inverted colors.
    if total_slides > 1 {
        let indicator = format!("{slide_index}/{total_slides}");
        let width = line_width(font, small_scale, &indicator).ceil() as u32;
        let x0 = style.width.saturating_sub(width + 40);
        let y0 = style.height.saturating_sub(65);
        for y in y0..(y0 + 30).min(style.height) {
            for x in x0..(x0 + width + 20).min(style.width) {
                img.put_pixel(x, y, style.text_color);
            }
        }
        draw_centered(
            &mut img,
            font,
            small_scale,
            &indicator,
            (x0 + (width + 20) / 2) as f32,
            (y0 + 15) as f32,
            style.background,
        );
    }

    img
}

/// Render every slide for one confession into the scratch directory.
///
/// Splits the text against the style's character budget, truncating to
/// the carousel limit of [`MAX_SLIDES`] panels.
pub fn render_confession(
    row: usize,
    count: u64,
    text: &str,
    style: &RenderStyle,
    font: &FontAsset,
    scratch_dir: &Path,
) -> Result<RenderedImageSet, RenderError> {
    std::fs::create_dir_all(scratch_dir).map_err(|e| {
        RenderError::new(RenderErrorKind::ScratchDir {
            path: scratch_dir.display().to_string(),
            message: e.to_string(),
        })
    })?;

    let mut slides = split_text_into_slides(text, style.char_budget);
    if slides.is_empty() {
        return Err(RenderError::new(RenderErrorKind::EmptyText(row)));
    }
    if slides.len() > MAX_SLIDES {
        warn!(
            row,
            slides = slides.len(),
            "Confession exceeds the carousel limit, truncating"
        );
        slides.truncate(MAX_SLIDES);
    }

    debug!(row, slides = slides.len(), "Rendering confession slides");

    let total = slides.len();
    let mut paths = Vec::with_capacity(total);
    for (i, slide_text) in slides.iter().enumerate() {
        let img = render_slide(slide_text, i + 1, total, count, style, font);
        let path = scratch_dir.join(format!("confession_{}_slide_{}.png", row, i + 1));
        img.save(&path).map_err(|e| {
            RenderError::new(RenderErrorKind::ImageWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        paths.push(path);
    }

    Ok(RenderedImageSet { row, slides: paths })
}
