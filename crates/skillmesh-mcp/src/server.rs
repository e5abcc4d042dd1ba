//! MCP server implementation for skillmesh card routing.
//!
//! Uses the rmcp SDK's macro-based approach for defining tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tracing::{debug, info};

use skillmesh_core::error::{SkillmeshError, SkillmeshResult};
use skillmesh_core::{load_corpus, resolve_registry_path, RetrievalHit, SkillmeshConfig};

use crate::factory::build_retriever;
use crate::tools::*;

/// MCP server exposing card retrieval and context routing.
///
/// Each call loads the requested registry and builds a fresh retriever, so
/// registry edits are picked up without a restart.
#[derive(Clone)]
pub struct SkillmeshServer {
    config: Arc<SkillmeshConfig>,
    tool_router: ToolRouter<SkillmeshServer>,
}

fn to_mcp_error(err: SkillmeshError) -> McpError {
    match err {
        SkillmeshError::Configuration { .. }
        | SkillmeshError::Registry { .. }
        | SkillmeshError::Corpus { .. } => McpError::invalid_params(err.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

#[tool_router]
impl SkillmeshServer {
    /// Create a new server with the given defaults.
    pub fn new(config: Arc<SkillmeshConfig>) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    fn registry_path(&self, requested: Option<&str>) -> PathBuf {
        match requested.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => resolve_registry_path(Some(path)),
            None => self.config.resolved_registry_path(),
        }
    }

    /// Run a validated retrieval and return the registry used with the hits.
    pub async fn run_retrieval(
        &self,
        request: &RetrievalRequest,
    ) -> SkillmeshResult<(PathBuf, Vec<RetrievalHit>)> {
        let registry = self.registry_path(request.registry.as_deref());
        let corpus = load_corpus(&registry)?;
        debug!(registry = %registry.display(), cards = corpus.len(), "Registry loaded");

        let retrieval = self
            .config
            .retrieval
            .clone()
            .with_backend(request.backend)
            .with_dense(request.dense);
        let retriever = build_retriever(&self.config, corpus, retrieval).await?;
        let hits = retriever.retrieve(&request.query, request.top_k).await?;
        Ok((registry, hits))
    }

    /// Retrieve cards and package them as the tool payload.
    pub async fn retrieve_cards(
        &self,
        input: &RetrieveCardsInput,
    ) -> SkillmeshResult<RetrieveCardsOutput> {
        let request = input.normalize()?;
        let (registry, hits) = self.run_retrieval(&request).await?;
        Ok(RetrieveCardsOutput {
            query: request.query,
            registry: registry.display().to_string(),
            hits,
        })
    }

    /// Retrieve cards and render them for the requested agent.
    pub async fn route(&self, input: &RouteInput) -> SkillmeshResult<String> {
        let (request, provider, instruction_chars) = input.normalize()?;
        let (_, hits) = self.run_retrieval(&request).await?;
        Ok(provider.render(&request.query, &hits, instruction_chars))
    }

    /// Return the top-k expert cards for a query as structured JSON.
    #[tool(
        name = "retrieve_skillmesh_cards",
        description = "Retrieve the top-k tool and role cards from a SkillMesh registry for a task description. Returns ranked cards with fused, sparse, and dense scores."
    )]
    async fn retrieve_skillmesh_cards(
        &self,
        Parameters(input): Parameters<RetrieveCardsInput>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.retrieve_cards(&input).await.map_err(to_mcp_error)?;
        info!(hits = output.hits.len(), "retrieve_skillmesh_cards");

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&output).unwrap_or_default(),
        )]))
    }

    /// Return a context block for the top-k cards, formatted for Claude or Codex.
    #[tool(
        name = "route_with_skillmesh",
        description = "Retrieve the top-k SkillMesh cards for a task and render them as a context block for Claude (XML) or Codex (Markdown)."
    )]
    async fn route_with_skillmesh(
        &self,
        Parameters(input): Parameters<RouteInput>,
    ) -> Result<CallToolResult, McpError> {
        let context = self.route(&input).await.map_err(to_mcp_error)?;
        info!(provider = %input.provider, "route_with_skillmesh");

        Ok(CallToolResult::success(vec![Content::text(context)]))
    }
}

#[tool_handler]
impl ServerHandler for SkillmeshServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "SkillMesh routes a task description to the most relevant expert cards. \
                 Use retrieve_skillmesh_cards for ranked JSON results and route_with_skillmesh \
                 for a ready-to-inject context block."
                    .to_string(),
            ),
        }
    }
}
