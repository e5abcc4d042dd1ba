//! MCP tool input/output type definitions.
//!
//! These types are used with `schemars::JsonSchema` to generate the JSON Schema
//! that MCP clients use to understand tool parameters.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use skillmesh_core::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use skillmesh_core::render::{validate_instruction_chars, DEFAULT_INSTRUCTION_CHARS};
use skillmesh_core::{validate_top_k, BackendMode, ContextProvider, RetrievalHit};

/// Input for the retrieve_skillmesh_cards tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RetrieveCardsInput {
    /// Free-text description of the task to find expert cards for.
    pub query: String,

    /// Maximum number of cards to return (at least 1).
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Registry file (.json/.yaml). Defaults to SKILLMESH_REGISTRY or the installed registry.
    #[serde(default)]
    pub registry: Option<String>,

    /// Similarity backend: auto, memory, or chroma.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Blend embedding similarity into the ranking.
    #[serde(default)]
    pub dense: bool,
}

/// Input for the route_with_skillmesh tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RouteInput {
    /// Free-text description of the task to route.
    pub query: String,

    /// Maximum number of cards to include (at least 1).
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Registry file (.json/.yaml). Defaults to SKILLMESH_REGISTRY or the installed registry.
    #[serde(default)]
    pub registry: Option<String>,

    /// Similarity backend: auto, memory, or chroma.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Blend embedding similarity into the ranking.
    #[serde(default)]
    pub dense: bool,

    /// Target agent format: claude or codex.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Per-card instruction excerpt length in characters (at least 100).
    #[serde(default = "default_instruction_chars")]
    pub instruction_chars: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_backend() -> String {
    BackendMode::Auto.to_string()
}

fn default_provider() -> String {
    ContextProvider::Claude.to_string()
}

fn default_instruction_chars() -> usize {
    DEFAULT_INSTRUCTION_CHARS
}

/// Retrieval arguments after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    pub query: String,
    pub top_k: usize,
    pub registry: Option<String>,
    pub backend: BackendMode,
    pub dense: bool,
}

/// Trim the query and reject blank ones.
pub fn normalize_query(query: &str) -> SkillmeshResult<String> {
    let normalized = query.trim();
    if normalized.is_empty() {
        return Err(SkillmeshError::configuration_with(
            ErrorCode::CfgEmptyQuery,
            "query must be a non-empty string",
            "Describe the task you need expert cards for.",
        ));
    }
    Ok(normalized.to_string())
}

impl RetrieveCardsInput {
    /// Validate into a retrieval request.
    pub fn normalize(&self) -> SkillmeshResult<RetrievalRequest> {
        Ok(RetrievalRequest {
            query: normalize_query(&self.query)?,
            top_k: validate_top_k(self.top_k)?,
            registry: self.registry.clone(),
            backend: BackendMode::parse(&self.backend)?,
            dense: self.dense,
        })
    }
}

impl RouteInput {
    /// Validate into a retrieval request, provider, and excerpt length.
    pub fn normalize(&self) -> SkillmeshResult<(RetrievalRequest, ContextProvider, usize)> {
        let provider = ContextProvider::parse(&self.provider)?;
        let instruction_chars = validate_instruction_chars(self.instruction_chars)?;
        let request = RetrievalRequest {
            query: normalize_query(&self.query)?,
            top_k: validate_top_k(self.top_k)?,
            registry: self.registry.clone(),
            backend: BackendMode::parse(&self.backend)?,
            dense: self.dense,
        };
        Ok((request, provider, instruction_chars))
    }
}

/// Result of retrieve_skillmesh_cards.
#[derive(Debug, Serialize)]
pub struct RetrieveCardsOutput {
    /// The normalized query.
    pub query: String,
    /// Registry file the cards were loaded from.
    pub registry: String,
    /// Ranked cards with their scores.
    pub hits: Vec<RetrievalHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_input_schema() {
        let schema = rmcp::schemars::schema_for!(RetrieveCardsInput);
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("query"));
        assert!(json.contains("top_k"));
        assert!(json.contains("backend"));
    }

    #[test]
    fn test_retrieve_input_defaults() {
        let input: RetrieveCardsInput = serde_json::from_str(r#"{"query": "opencv"}"#).unwrap();
        assert_eq!(input.top_k, 5);
        assert_eq!(input.backend, "auto");
        assert!(!input.dense);
        assert!(input.registry.is_none());
    }

    #[test]
    fn test_route_input_defaults() {
        let input: RouteInput = serde_json::from_str(r#"{"query": "opencv"}"#).unwrap();
        assert_eq!(input.provider, "claude");
        assert_eq!(input.instruction_chars, 700);
    }

    #[test]
    fn test_normalize_trims_and_parses() {
        let input: RetrieveCardsInput = serde_json::from_str(
            r#"{"query": "  find contours ", "backend": "Memory", "top_k": 2}"#,
        )
        .unwrap();
        let request = input.normalize().unwrap();
        assert_eq!(request.query, "find contours");
        assert_eq!(request.backend, BackendMode::Memory);
        assert_eq!(request.top_k, 2);
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        let blank: RetrieveCardsInput = serde_json::from_str(r#"{"query": "   "}"#).unwrap();
        assert_eq!(blank.normalize().unwrap_err().code(), ErrorCode::CfgEmptyQuery);

        let zero: RetrieveCardsInput =
            serde_json::from_str(r#"{"query": "x", "top_k": 0}"#).unwrap();
        assert_eq!(zero.normalize().unwrap_err().code(), ErrorCode::CfgInvalidTopK);

        let backend: RetrieveCardsInput =
            serde_json::from_str(r#"{"query": "x", "backend": "faiss"}"#).unwrap();
        assert_eq!(backend.normalize().unwrap_err().code(), ErrorCode::CfgInvalidBackend);
    }

    #[test]
    fn test_route_normalize_rejects_bad_provider_and_chars() {
        let provider: RouteInput =
            serde_json::from_str(r#"{"query": "x", "provider": "gemini"}"#).unwrap();
        assert!(provider.normalize().unwrap_err().is_configuration());

        let chars: RouteInput =
            serde_json::from_str(r#"{"query": "x", "instruction_chars": 50}"#).unwrap();
        assert!(chars.normalize().unwrap_err().is_configuration());
    }
}
