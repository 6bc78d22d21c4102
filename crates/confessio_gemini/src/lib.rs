//! Gemini moderation and selection client for the Confessio pipeline.
//!
//! Two calls per run flow through this crate: a per-row moderation call
//! that classifies a confession, drafts a caption, and masks personal
//! identifiers; and a batch selection call that ranks the safe set and
//! keeps the best few. Both ask for JSON output and tolerate the model
//! wrapping its answer in a code fence.
//!
//! Moderation is conservative by default: under the fail-closed policy
//! any transport or parse failure comes back as an unsafe verdict, so an
//! unmoderated confession can never reach the renderer. Selection is the
//! opposite: its ranking is a nicety, so a failed selection call falls
//! back to the first N safe rows.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod prompts;
mod request;
mod response;

pub use client::{GeminiClient, ModerationFailMode, apply_selection};
pub use request::{Content, GeminiRequest, GenerationConfig, Part, SafetySetting};
pub use response::{Candidate, GeminiResponse, PromptFeedback, strip_code_fence};
