//! SkillMesh MCP Server - expert card routing for Claude Code, Codex, and other MCP clients.
//!
//! Communicates via stdio transport, which is the standard for local MCP servers.
//! See the library docs for the environment variables it reads.

use std::sync::Arc;

use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillmesh_core::SkillmeshConfig;
use skillmesh_mcp::SkillmeshServer;

const CONFIG_ENV: &str = "SKILLMESH_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing to stderr (stdout is used for MCP transport)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting SkillMesh MCP server");

    let config = load_config()?;
    tracing::info!(
        registry = %config.resolved_registry_path().display(),
        backend = %config.retrieval.backend,
        "Configuration loaded"
    );

    let server = SkillmeshServer::new(Arc::new(config));

    // Serve via stdio transport
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    tracing::info!("MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}

/// Read configuration from `SKILLMESH_CONFIG` if set, otherwise from the environment.
fn load_config() -> Result<SkillmeshConfig> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => SkillmeshConfig::from_file(path.trim())?,
        _ => SkillmeshConfig::from_env()?,
    };
    Ok(config)
}
