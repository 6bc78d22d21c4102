//! Request types for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

/// One text part of a content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// The text payload
    pub text: String,
}

/// A content block in the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Ordered parts of the block
    pub parts: Vec<Part>,
    /// Role of the author ("user" or "model"), omitted on responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Output shaping knobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type the model must answer in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A harm category threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    /// Harm category identifier
    pub category: String,
    /// Blocking threshold identifier
    pub threshold: String,
}

impl SafetySetting {
    /// The strict thresholds used for confession moderation.
    ///
    /// Everything at or above low probability is blocked; a blocked
    /// response is itself treated as an unsafe verdict.
    pub fn strict() -> Vec<Self> {
        [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: "BLOCK_LOW_AND_ABOVE".to_string(),
        })
        .collect()
    }
}

/// A `generateContent` request body.
///
/// # Examples
///
/// ```
/// use confessio_gemini::GeminiRequest;
///
/// let request = GeminiRequest::json_prompt("Classify this text.");
/// assert_eq!(request.contents.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents (a single user turn for this pipeline)
    pub contents: Vec<Content>,
    /// Output shaping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Harm thresholds, when the call moderates user content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

impl GeminiRequest {
    /// A single-turn request that must answer in JSON.
    pub fn json_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                temperature: None,
            }),
            safety_settings: None,
        }
    }

    /// Attach the strict moderation safety thresholds.
    pub fn with_strict_safety(mut self) -> Self {
        self.safety_settings = Some(SafetySetting::strict());
        self
    }
}
