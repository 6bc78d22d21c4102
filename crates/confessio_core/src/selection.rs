//! Selection batches.

use serde::{Deserialize, Serialize};

/// Ordered set of sheet rows chosen for publication this run.
///
/// The order reflects the model's ranking, not sheet order, and the
/// batch never exceeds the configured per-run maximum. The ranking
/// criteria are opaque to the pipeline.
///
/// # Examples
///
/// ```
/// use confessio_core::SelectionBatch;
///
/// let batch = SelectionBatch::new(vec![9, 4, 7]);
/// assert_eq!(batch.len(), 3);
/// assert!(batch.contains(4));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBatch {
    rows: Vec<usize>,
}

impl SelectionBatch {
    /// Create a batch from ranked row indices.
    pub fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    /// Ranked row indices.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows selected.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a row is part of this batch.
    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Iterate rows in ranked order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}
