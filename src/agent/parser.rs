//! Output parser: validates the model's final text against the research schema.

use thiserror::Error;

use crate::api::types::ResearchResponse;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model output does not match the research schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Parse the agent's final text into a `ResearchResponse`.
///
/// A single surrounding Markdown code fence is tolerated (models routinely
/// wrap JSON this way despite instructions); anything else that is not a
/// well-formed object with all four fields is an error. No repair is
/// attempted.
pub fn parse_research_response(raw: &str) -> Result<ResearchResponse, ParseError> {
    let cleaned = strip_code_fence(raw.trim());
    Ok(serde_json::from_str(cleaned)?)
}

/// Strip a ```json ... ``` or ``` ... ``` fence wrapping the whole text.
fn strip_code_fence(text: &str) -> &str {
    if let Some(inner) = text.strip_prefix("```json") {
        inner.strip_suffix("```").unwrap_or(inner).trim()
    } else if let Some(inner) = text.strip_prefix("```") {
        inner.strip_suffix("```").unwrap_or(inner).trim()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "topic": "Rust async runtimes",
        "summary": "Tokio dominates the ecosystem.",
        "sources": ["https://tokio.rs", "https://async.rs"],
        "tools_used": ["web_search"]
    }"#;

    #[test]
    fn test_parses_valid_output() {
        let parsed = parse_research_response(VALID).unwrap();
        assert_eq!(parsed.topic, "Rust async runtimes");
        assert_eq!(parsed.summary, "Tokio dominates the ecosystem.");
        assert_eq!(parsed.sources, vec!["https://tokio.rs", "https://async.rs"]);
        assert_eq!(parsed.tools_used, vec!["web_search"]);
    }

    #[test]
    fn test_parses_fenced_output() {
        let fenced = format!("```json\n{}\n```", VALID);
        let parsed = parse_research_response(&fenced).unwrap();
        assert_eq!(parsed.topic, "Rust async runtimes");

        let bare_fence = format!("```\n{}\n```", VALID);
        let parsed = parse_research_response(&bare_fence).unwrap();
        assert_eq!(parsed.tools_used, vec!["web_search"]);
    }

    #[test]
    fn test_rejects_missing_field() {
        let missing_sources = r#"{
            "topic": "t",
            "summary": "s",
            "tools_used": []
        }"#;
        assert!(parse_research_response(missing_sources).is_err());
    }

    #[test]
    fn test_rejects_wrong_type() {
        let sources_not_a_list = r#"{
            "topic": "t",
            "summary": "s",
            "sources": "https://example.com",
            "tools_used": []
        }"#;
        assert!(parse_research_response(sources_not_a_list).is_err());
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        let with_prose = format!("{}\nHope this helps!", VALID);
        assert!(parse_research_response(&with_prose).is_err());
    }

    #[test]
    fn test_ignores_extra_fields() {
        let with_extra = r#"{
            "topic": "t",
            "summary": "s",
            "sources": [],
            "tools_used": [],
            "confidence": 0.9
        }"#;
        let parsed = parse_research_response(with_extra).unwrap();
        assert_eq!(parsed.topic, "t");
        assert!(parsed.sources.is_empty());
    }

    #[test]
    fn test_preserves_list_order() {
        let parsed = parse_research_response(VALID).unwrap();
        assert_eq!(parsed.sources[0], "https://tokio.rs");
        assert_eq!(parsed.sources[1], "https://async.rs");
    }
}
