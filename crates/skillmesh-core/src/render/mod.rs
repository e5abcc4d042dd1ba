//! Provider-specific context rendering for retrieved cards.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use crate::types::RetrievalHit;

/// Default instruction excerpt length, in characters.
pub const DEFAULT_INSTRUCTION_CHARS: usize = 700;
/// Smallest accepted instruction excerpt length.
pub const MIN_INSTRUCTION_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Target agent for a rendered context block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContextProvider {
    #[default]
    Claude,
    Codex,
}

impl ContextProvider {
    /// Parse a provider name, mapping unknown names to a configuration error.
    pub fn parse(name: &str) -> SkillmeshResult<Self> {
        name.trim().parse().map_err(|_| {
            SkillmeshError::configuration_with(
                ErrorCode::CfgInvalidValue,
                format!("Unknown provider '{}'", name.trim()),
                "`provider` must be one of: claude, codex.",
            )
        })
    }

    /// Render hits for this provider.
    pub fn render(&self, query: &str, hits: &[RetrievalHit], instruction_chars: usize) -> String {
        match self {
            Self::Claude => render_claude_context(query, hits, instruction_chars),
            Self::Codex => render_codex_context(query, hits, instruction_chars),
        }
    }
}

/// Check a caller-supplied excerpt length.
pub fn validate_instruction_chars(chars: usize) -> SkillmeshResult<usize> {
    if chars < MIN_INSTRUCTION_CHARS {
        return Err(SkillmeshError::configuration_with(
            ErrorCode::CfgInvalidValue,
            format!("instruction_chars must be >= {}", MIN_INSTRUCTION_CHARS),
            "Use a larger instruction excerpt.",
        ));
    }
    Ok(chars)
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "unknown"
    } else {
        value
    }
}

/// Markdown block for Codex-style agents.
pub fn render_codex_context(
    query: &str,
    hits: &[RetrievalHit],
    instruction_chars: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## SkillMesh context");
    let _ = writeln!(out, "Query: {}", query);
    let _ = writeln!(out);

    if hits.is_empty() {
        let _ = writeln!(out, "No matching cards.");
        return out;
    }

    for (rank, hit) in hits.iter().enumerate() {
        let card = &hit.card;
        let _ = writeln!(out, "### {}. {} ({})", rank + 1, card.title, card.id);
        let _ = writeln!(out, "- domain: {}", or_unknown(&card.domain));
        let _ = writeln!(out, "- score: {:.4}", hit.score);
        let _ = writeln!(out, "- tool hints: {}", join_or_none(&card.tool_hints));
        let _ = writeln!(out, "- dependencies: {}", join_or_none(&card.dependencies));
        let _ = writeln!(out, "- risk level: {}", or_unknown(&card.risk_level));
        let excerpt = truncate_chars(&card.description, instruction_chars);
        if !excerpt.is_empty() {
            let _ = writeln!(out, "- instructions: {}", excerpt);
        }
        let _ = writeln!(out);
    }
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML-tagged block for Claude-style agents.
pub fn render_claude_context(
    query: &str,
    hits: &[RetrievalHit],
    instruction_chars: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<skillmesh_context>");
    let _ = writeln!(out, "<query>{}</query>", escape_xml(query));

    for (rank, hit) in hits.iter().enumerate() {
        let card = &hit.card;
        let _ = writeln!(
            out,
            "<card rank=\"{}\" id=\"{}\" score=\"{:.4}\">",
            rank + 1,
            escape_xml(&card.id),
            hit.score
        );
        let _ = writeln!(out, "<title>{}</title>", escape_xml(&card.title));
        let _ = writeln!(out, "<domain>{}</domain>", escape_xml(or_unknown(&card.domain)));
        let _ = writeln!(
            out,
            "<tool_hints>{}</tool_hints>",
            escape_xml(&join_or_none(&card.tool_hints))
        );
        let _ = writeln!(
            out,
            "<dependencies>{}</dependencies>",
            escape_xml(&join_or_none(&card.dependencies))
        );
        let _ = writeln!(
            out,
            "<risk_level>{}</risk_level>",
            escape_xml(or_unknown(&card.risk_level))
        );
        let _ = writeln!(
            out,
            "<instructions>{}</instructions>",
            escape_xml(&truncate_chars(&card.description, instruction_chars))
        );
        let _ = writeln!(out, "</card>");
    }

    let _ = writeln!(out, "</skillmesh_context>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpertCard;
    use std::sync::Arc;

    fn hit(card: ExpertCard, score: f32) -> RetrievalHit {
        RetrievalHit {
            card: Arc::new(card),
            score,
            sparse_score: score,
            dense_score: None,
        }
    }

    fn hits() -> Vec<RetrievalHit> {
        vec![
            hit(
                ExpertCard::new("cv.opencv-image-processing", "OpenCV <image> processing")
                    .with_domain("computer_vision")
                    .with_description("Detect contours & edges.")
                    .with_tool_hints(["opencv-python"])
                    .with_risk_level("low"),
                1.5,
            ),
            hit(ExpertCard::new("nlp.summarize", "Summarizer"), 0.25),
        ]
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 8), "abcde...");
        // Multi-byte characters are never split.
        assert_eq!(truncate_chars("ééééééé", 6), "ééé...");
    }

    #[test]
    fn test_codex_context() {
        let out = render_codex_context("find contours", &hits(), 700);
        assert!(out.starts_with("## SkillMesh context\nQuery: find contours\n"));
        assert!(out.contains("### 1. OpenCV <image> processing (cv.opencv-image-processing)"));
        assert!(out.contains("- score: 1.5000"));
        assert!(out.contains("- tool hints: opencv-python"));
        assert!(out.contains("### 2. Summarizer (nlp.summarize)"));
        assert!(out.contains("- dependencies: none"));
    }

    #[test]
    fn test_codex_context_without_hits() {
        let out = render_codex_context("nothing", &[], 700);
        assert!(out.contains("No matching cards."));
    }

    #[test]
    fn test_claude_context_escapes() {
        let out = render_claude_context("a < b", &hits(), 700);
        assert!(out.starts_with("<skillmesh_context>\n<query>a &lt; b</query>\n"));
        assert!(out.contains(r#"<card rank="1" id="cv.opencv-image-processing" score="1.5000">"#));
        assert!(out.contains("<title>OpenCV &lt;image&gt; processing</title>"));
        assert!(out.contains("<instructions>Detect contours &amp; edges.</instructions>"));
        assert!(out.trim_end().ends_with("</skillmesh_context>"));
    }

    #[test]
    fn test_provider_parse_and_render() {
        assert_eq!(ContextProvider::parse(" Codex ").unwrap(), ContextProvider::Codex);
        assert!(ContextProvider::parse("gemini").unwrap_err().is_configuration());
        let out = ContextProvider::Claude.render("q", &hits(), 100);
        assert!(out.contains("<skillmesh_context>"));
    }

    #[test]
    fn test_instruction_chars_floor() {
        assert!(validate_instruction_chars(99).is_err());
        assert_eq!(validate_instruction_chars(100).unwrap(), 100);
    }
}
