//! Response types for the Gemini `generateContent` endpoint.

use crate::request::Content;
use serde::{Deserialize, Serialize};

/// One candidate answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when generation was cut off
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped ("STOP", "SAFETY", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Whether the answer was cut off by the safety filters.
    pub fn blocked_by_safety(&self) -> bool {
        self.finish_reason.as_deref() == Some("SAFETY")
    }
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked outright
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// A `generateContent` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate answers, absent when the request was blocked
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level feedback
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Strip a Markdown code fence from a model answer.
///
/// JSON response mode usually returns bare JSON, but models still wrap
/// answers in ```` ```json ```` fences often enough that parsing without
/// this fallback is flaky.
///
/// # Examples
///
/// ```
/// use confessio_gemini::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
/// assert_eq!(strip_code_fence("[1, 2]"), "[1, 2]");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Part;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n[3]\n```"), "[3]");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn first_candidate_text_is_joined() {
        let response = GeminiResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![
                        Part { text: "a".into() },
                        Part { text: "b".into() },
                    ],
                    role: None,
                }),
                finish_reason: Some("STOP".into()),
            }],
            prompt_feedback: None,
        };
        assert_eq!(response.text().as_deref(), Some("ab"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        assert_eq!(GeminiResponse::default().text(), None);
    }

    #[test]
    fn safety_finish_reason_detected() {
        let candidate = Candidate {
            content: None,
            finish_reason: Some("SAFETY".into()),
        };
        assert!(candidate.blocked_by_safety());
    }
}
