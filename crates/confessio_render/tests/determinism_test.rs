//! Golden-image determinism tests for the slide renderer.
//!
//! A DejaVu Sans Mono fixture rides along under `tests/fixtures/` so the
//! renderer is exercised for real on every checkout.

use confessio_render::{FontAsset, RenderStyle, render_confession, render_slide};
use std::path::Path;

fn test_font() -> FontAsset {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
    FontAsset::load(&path).unwrap()
}

#[test]
fn repeated_renders_are_byte_identical() {
    let font = test_font();
    let style = RenderStyle::default();

    let first = render_slide("the same text every time", 1, 2, 42, &style, &font);
    let second = render_slide("the same text every time", 1, 2, 42, &style, &font);
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn slide_index_changes_the_canvas() {
    let font = test_font();
    let style = RenderStyle::default();

    let first = render_slide("carousel text", 1, 3, 7, &style, &font);
    let second = render_slide("carousel text", 2, 3, 7, &style, &font);
    // Slide 1 carries the #N badge, slide 2 a different indicator.
    assert_ne!(first.as_raw(), second.as_raw());
}

#[test]
fn canvas_matches_style_dimensions() {
    let font = test_font();

    let square = render_slide("hi", 1, 1, 1, &RenderStyle::default(), &font);
    assert_eq!((square.width(), square.height()), (1080, 1080));

    let reel = render_slide("hi", 1, 1, 1, &RenderStyle::reel(), &font);
    assert_eq!((reel.width(), reel.height()), (1080, 1920));
}

#[test]
fn long_confession_renders_multiple_slides() {
    let font = test_font();
    let style = RenderStyle::default().with_char_budget(40);
    let scratch = tempfile::tempdir().unwrap();

    let text = "a confession long enough that forty characters cannot possibly hold it in one slide";
    let set = render_confession(5, 3, text, &style, &font, scratch.path()).unwrap();

    assert!(set.len() > 1);
    assert!(set.len() <= confessio_render::MAX_SLIDES);
    for path in &set.slides {
        assert!(path.exists());
    }
    assert!(
        set.slides[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("confession_5_slide_1")
    );
}

#[test]
fn empty_text_is_a_render_error() {
    let font = test_font();
    let scratch = tempfile::tempdir().unwrap();
    let result = render_confession(9, 1, "   ", &RenderStyle::default(), &font, scratch.path());
    assert!(result.is_err());
}
