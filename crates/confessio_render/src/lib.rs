//! Slide image renderer for the Confessio publishing pipeline.
//!
//! Approved confession text becomes one or more raster slides: long text
//! is split greedily by word against a character budget, then each chunk
//! is drawn centered on a solid canvas with the page watermark, the
//! confession number on the first slide, and an `i/N` indicator when a
//! carousel has more than one panel.
//!
//! Rendering is deterministic: the same text, style, and font bytes
//! always produce byte-identical output, which is what makes
//! golden-image testing possible.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod slide;
mod split;
mod style;

pub use slide::{render_confession, render_slide};
pub use split::split_text_into_slides;
pub use style::{FontAsset, RenderStyle, MAX_SLIDES};
