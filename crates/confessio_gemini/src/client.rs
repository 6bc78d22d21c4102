//! Gemini REST client implementing the curator seam.

use async_trait::async_trait;
use confessio_core::{ModerationVerdict, SelectionBatch};
use confessio_error::{ConfessioResult, GeminiError, GeminiErrorKind};
use confessio_interface::Curator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::prompts::{moderation_prompt, selection_prompt};
use crate::request::GeminiRequest;
use crate::response::{GeminiResponse, strip_code_fence};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// What a moderation transport failure means for the row.
///
/// `Closed` (the default) turns every failure into a rejection so
/// nothing unmoderated is ever published. `Open` propagates transport
/// failures instead, leaving the row unprocessed for the next run; a
/// malformed model answer still rejects under both modes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationFailMode {
    /// Failures become rejections (publish nothing unmoderated)
    #[default]
    Closed,
    /// Transport failures leave the row for the next run
    Open,
}

/// The JSON shape the moderation prompt asks for.
#[derive(Debug, Clone, Default, Deserialize)]
struct ModerationOutcome {
    #[serde(default)]
    is_safe: bool,
    #[serde(default)]
    rejection_reason: String,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    summary_caption: Option<String>,
    #[serde(default)]
    redacted_text: String,
}

/// Map model-chosen 1-based indices onto the safe set, in ranked order.
///
/// Duplicate indices are dropped, the result is capped at `max`, and an
/// index outside the batch is an error (the caller falls back rather
/// than guessing what the model meant).
pub fn apply_selection(
    safe: &[ModerationVerdict],
    indices: &[usize],
    max: usize,
) -> Result<SelectionBatch, GeminiError> {
    let mut rows = Vec::new();
    for &index in indices {
        if index == 0 || index > safe.len() {
            return Err(GeminiError::new(GeminiErrorKind::IndexOutOfRange {
                index,
                len: safe.len(),
            }));
        }
        let row = safe[index - 1].row;
        if !rows.contains(&row) {
            rows.push(row);
        }
        if rows.len() == max {
            break;
        }
    }
    Ok(SelectionBatch::new(rows))
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Moderation and selection can run on different models; the cheaper one
/// handles the per-row moderation volume while a stronger model ranks
/// the final batch.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    moderation_model: String,
    selection_model: String,
    fail_mode: ModerationFailMode,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("moderation_model", &self.moderation_model)
            .field("selection_model", &self.selection_model)
            .field("fail_mode", &self.fail_mode)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(
        api_key: impl Into<String>,
        moderation_model: impl Into<String>,
        selection_model: impl Into<String>,
        fail_mode: ModerationFailMode,
    ) -> Self {
        debug!("Creating new Gemini client");
        Self {
            client: Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
            api_key: api_key.into(),
            moderation_model: moderation_model.into(),
            selection_model: selection_model.into(),
            fail_mode,
        }
    }

    /// Point the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Call `generateContent` on one model.
    #[instrument(skip(self, request))]
    async fn generate(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, model, "Failed to send request to Gemini API");
                GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, model, "Gemini API returned error");
            return Err(GeminiError::new(GeminiErrorKind::Http {
                status_code: status.as_u16(),
                message: body,
            }));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, model, "Failed to parse Gemini response");
            GeminiError::new(GeminiErrorKind::MalformedOutput(format!(
                "Failed to parse response body: {}",
                e
            )))
        })
    }

    /// Pull the JSON answer out of a response, handling safety blocks.
    ///
    /// `Ok(None)` means the safety filters blocked the content, which is
    /// a verdict, not a failure.
    fn answer_text(response: &GeminiResponse) -> Result<Option<String>, GeminiError> {
        if let Some(feedback) = &response.prompt_feedback
            && let Some(reason) = &feedback.block_reason
        {
            debug!(reason = %reason, "Prompt blocked by safety filters");
            return Ok(None);
        }

        match response.candidates.first() {
            None => Ok(None),
            Some(candidate) if candidate.blocked_by_safety() => Ok(None),
            Some(_) => response.text().map(Some).ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::EmptyResponse(
                    "candidate carried no text".to_string(),
                ))
            }),
        }
    }

    fn parse_outcome(text: &str) -> Result<ModerationOutcome, GeminiError> {
        serde_json::from_str(strip_code_fence(text))
            .map_err(|e| GeminiError::new(GeminiErrorKind::MalformedOutput(e.to_string())))
    }

    async fn moderate_inner(
        &self,
        row: usize,
        text: &str,
    ) -> Result<ModerationVerdict, GeminiError> {
        let request = GeminiRequest::json_prompt(moderation_prompt(text)).with_strict_safety();
        let response = self.generate(&self.moderation_model, &request).await?;

        let Some(answer) = Self::answer_text(&response)? else {
            return Ok(ModerationVerdict::rejected(
                row,
                text,
                "blocked by safety filters",
            ));
        };

        let outcome = Self::parse_outcome(&answer)?;
        Ok(Self::verdict_from_outcome(row, text, outcome))
    }

    fn verdict_from_outcome(
        row: usize,
        text: &str,
        outcome: ModerationOutcome,
    ) -> ModerationVerdict {
        let redacted_text = if outcome.redacted_text.trim().is_empty() {
            text.to_string()
        } else {
            outcome.redacted_text
        };
        ModerationVerdict {
            row,
            is_safe: outcome.is_safe,
            rejection_reason: (!outcome.rejection_reason.is_empty())
                .then_some(outcome.rejection_reason),
            sentiment: outcome.sentiment,
            summary_caption: outcome.summary_caption,
            redacted_text,
        }
    }

    /// Decide what a failed moderation call means for the row.
    ///
    /// Fail-closed turns every failure into a rejection. Fail-open lets
    /// transport failures propagate so the row stays unprocessed, but a
    /// malformed model answer is still a content decision and rejects.
    fn resolve_failure(
        fail_mode: ModerationFailMode,
        row: usize,
        text: &str,
        error: GeminiError,
    ) -> ConfessioResult<ModerationVerdict> {
        if fail_mode == ModerationFailMode::Open && error.kind.is_transport() {
            return Err(error)?;
        }
        warn!(row, error = %error, "Moderation failed, rejecting row");
        Ok(ModerationVerdict::rejected(
            row,
            text,
            format!("moderation failed: {}", error.kind),
        ))
    }
}

#[async_trait]
impl Curator for GeminiClient {
    #[instrument(skip(self, text))]
    async fn moderate(&self, row: usize, text: &str) -> ConfessioResult<ModerationVerdict> {
        match self.moderate_inner(row, text).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => Self::resolve_failure(self.fail_mode, row, text, e),
        }
    }

    #[instrument(skip(self, safe))]
    async fn select_top(
        &self,
        safe: &[ModerationVerdict],
        max: usize,
    ) -> ConfessioResult<SelectionBatch> {
        if safe.len() <= max {
            return Ok(SelectionBatch::new(safe.iter().map(|v| v.row).collect()));
        }

        let request = GeminiRequest::json_prompt(selection_prompt(safe, max));
        let batch = async {
            let response = self.generate(&self.selection_model, &request).await?;
            let answer = Self::answer_text(&response)?.ok_or_else(|| {
                GeminiError::new(GeminiErrorKind::EmptyResponse(
                    "selection response blocked or empty".to_string(),
                ))
            })?;
            let indices: Vec<usize> = serde_json::from_str(strip_code_fence(&answer))
                .map_err(|e| GeminiError::new(GeminiErrorKind::MalformedOutput(e.to_string())))?;
            apply_selection(safe, &indices, max)
        }
        .await;

        match batch {
            Ok(batch) => Ok(batch),
            Err(e) => {
                // Ranking is best-effort: fall back to sheet order.
                warn!(error = %e, "Selection call failed, falling back to first {max} safe rows");
                Ok(SelectionBatch::new(
                    safe.iter().take(max).map(|v| v.row).collect(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(row: usize) -> ModerationVerdict {
        ModerationVerdict {
            row,
            is_safe: true,
            rejection_reason: None,
            sentiment: None,
            summary_caption: None,
            redacted_text: format!("text {row}"),
        }
    }

    #[test]
    fn selection_maps_indices_to_rows() {
        let safe = vec![verdict(10), verdict(20), verdict(30)];
        let batch = apply_selection(&safe, &[2, 3, 1], 4).unwrap();
        assert_eq!(batch.rows(), &[20, 30, 10]);
    }

    #[test]
    fn selection_caps_at_max() {
        let safe = vec![verdict(10), verdict(20), verdict(30)];
        let batch = apply_selection(&safe, &[1, 2, 3], 2).unwrap();
        assert_eq!(batch.rows(), &[10, 20]);
    }

    #[test]
    fn selection_drops_duplicate_indices() {
        let safe = vec![verdict(10), verdict(20)];
        let batch = apply_selection(&safe, &[1, 1, 2], 4).unwrap();
        assert_eq!(batch.rows(), &[10, 20]);
    }

    #[test]
    fn selection_rejects_out_of_range_index() {
        let safe = vec![verdict(10)];
        let err = apply_selection(&safe, &[2], 4).unwrap_err();
        assert!(matches!(
            err.kind,
            GeminiErrorKind::IndexOutOfRange { index: 2, len: 1 }
        ));
    }

    #[test]
    fn selection_rejects_zero_index() {
        let safe = vec![verdict(10)];
        assert!(apply_selection(&safe, &[0], 4).is_err());
    }

    #[test]
    fn moderation_outcome_parses_fenced_json() {
        let text = "```json\n{\"is_safe\": true, \"sentiment\": \"Positive\"}\n```";
        let outcome = GeminiClient::parse_outcome(text).unwrap();
        assert!(outcome.is_safe);
        assert_eq!(outcome.sentiment.as_deref(), Some("Positive"));
        assert!(outcome.redacted_text.is_empty());
    }

    #[test]
    fn moderation_outcome_defaults_to_unsafe() {
        let outcome = GeminiClient::parse_outcome("{}").unwrap();
        assert!(!outcome.is_safe);
    }

    #[test]
    fn closed_mode_rejects_on_transport_failure() {
        let err = GeminiError::new(GeminiErrorKind::ApiRequest("timed out".into()));
        let verdict =
            GeminiClient::resolve_failure(ModerationFailMode::Closed, 7, "text", err).unwrap();
        assert!(!verdict.is_safe);
        assert_eq!(verdict.redacted_text, "text");
    }

    #[test]
    fn open_mode_propagates_transport_failure() {
        let err = GeminiError::new(GeminiErrorKind::Http {
            status_code: 503,
            message: "busy".into(),
        });
        assert!(GeminiClient::resolve_failure(ModerationFailMode::Open, 7, "text", err).is_err());
    }

    #[test]
    fn open_mode_still_rejects_malformed_output() {
        // A parse failure is a content decision, not a transport blip.
        let err = GeminiError::new(GeminiErrorKind::MalformedOutput("not json".into()));
        let verdict =
            GeminiClient::resolve_failure(ModerationFailMode::Open, 7, "text", err).unwrap();
        assert!(!verdict.is_safe);
    }

    #[test]
    fn fail_mode_parses_from_config_text() {
        use std::str::FromStr;
        assert_eq!(
            ModerationFailMode::from_str("closed").unwrap(),
            ModerationFailMode::Closed
        );
        assert_eq!(
            ModerationFailMode::from_str("open").unwrap(),
            ModerationFailMode::Open
        );
    }
}
