//! Prompt construction for the moderation and selection calls.

use confessio_core::ModerationVerdict;

/// Moderation prompt: safety verdict, sentiment, caption, redaction.
pub fn moderation_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following confession text for hate speech, harassment, sexually explicit content, and dangerous content.
Also determine its overall sentiment (Positive, Negative, Neutral, Mixed) and write a concise summary (max 50 words) suitable as a social media caption, with a few fitting hashtags.

Confession text:
"{text}"

Output a JSON object with exactly these keys:
- "is_safe": boolean (true if no safety violations, false otherwise)
- "rejection_reason": string (brief reason if not safe, empty string if safe)
- "sentiment": string (Positive, Negative, Neutral, Mixed)
- "summary_caption": string (concise caption with hashtags, max 50 words)
- "redacted_text": string (the original text with personal identifiers replaced by ****)
"#
    )
}

/// Selection prompt: rank the safe set and keep at most `max` entries.
pub fn selection_prompt(safe: &[ModerationVerdict], max: usize) -> String {
    let entries = safe
        .iter()
        .enumerate()
        .map(|(i, verdict)| {
            format!(
                "Confession {}:\n{}\nSentiment: {}",
                i + 1,
                verdict.redacted_text,
                verdict.sentiment.as_deref().unwrap_or("Unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a social media content curator for a community confession page. Select the confessions below most likely to resonate with the community and spark discussion.

Selection criteria:
- Relatability: shared experiences, struggles, or triumphs the audience will recognize.
- Engagement potential: humorous or emotionally impactful entries likely to prompt a range of responses.
- Tone: constructive or humorous criticism is fine; never select anything touching hate speech, harassment, personal attacks, or sexually explicit material.
- Diversity: prefer a mix of funny, serious, and relatable entries over several of the same flavor.

Review the following confessions:

{entries}

Select up to {max} confessions that best fit the criteria above.
Respond ONLY with a JSON array of the 1-based indices of your selections, e.g.: [2, 5, 1, 4]
"#
    )
}
