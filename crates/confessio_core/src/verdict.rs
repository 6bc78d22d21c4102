//! Moderation verdicts.

use serde::{Deserialize, Serialize};

/// Outcome of moderating one confession.
///
/// Produced once per row per run and never persisted beyond log output.
/// Besides the safety verdict, the moderation call drafts the caption
/// and redacts personal identifiers, so those ride along here.
///
/// # Examples
///
/// ```
/// use confessio_core::ModerationVerdict;
///
/// let verdict = ModerationVerdict {
///     row: 12,
///     is_safe: false,
///     rejection_reason: Some("harassment".to_string()),
///     sentiment: None,
///     summary_caption: None,
///     redacted_text: "****".to_string(),
/// };
/// assert!(!verdict.is_safe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Sheet row the verdict applies to
    pub row: usize,
    /// Whether the confession may be published
    pub is_safe: bool,
    /// Why the confession was rejected, when it was
    pub rejection_reason: Option<String>,
    /// Overall sentiment as reported by the model
    pub sentiment: Option<String>,
    /// Caption drafted by the model for the eventual post
    pub summary_caption: Option<String>,
    /// Confession text with personal identifiers masked
    pub redacted_text: String,
}

impl ModerationVerdict {
    /// A conservative rejection for when the moderation call itself failed.
    pub fn rejected(row: usize, text: &str, reason: impl Into<String>) -> Self {
        Self {
            row,
            is_safe: false,
            rejection_reason: Some(reason.into()),
            sentiment: None,
            summary_caption: None,
            redacted_text: text.to_string(),
        }
    }
}
