//! Rendered slide sets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The slide images rendered for one confession, in carousel order.
///
/// Scoped to a single run; the scratch directory holding these files is
/// removed unconditionally when the run ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedImageSet {
    /// Sheet row the slides belong to
    pub row: usize,
    /// Ordered slide file paths, one per carousel panel
    pub slides: Vec<PathBuf>,
}

impl RenderedImageSet {
    /// Number of slides in the set.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the set holds no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
