//! MCP server for skillmesh.
//!
//! Provides MCP tools that route a task description to the most relevant
//! expert cards in a SkillMesh registry.
//!
//! # Tools
//!
//! - `retrieve_skillmesh_cards` - Ranked cards with fused, sparse, and dense scores
//! - `route_with_skillmesh` - The same cards rendered as a Claude or Codex context block
//!
//! # Configuration
//!
//! The server reads configuration from environment variables, or from the file
//! named by `SKILLMESH_CONFIG` (.toml/.json/.yaml):
//!
//! - `SKILLMESH_REGISTRY` - Default registry file
//! - `SKILLMESH_BACKEND` - Default backend: auto, memory, or chroma
//! - `SKILLMESH_EMBEDDER` - Embedder for the dense path: openai, ollama, or hash
//! - `SKILLMESH_CHROMA_URL` / `SKILLMESH_COLLECTION` - Chroma location
//! - `OPENAI_API_KEY` - API key for OpenAI embeddings
//!
//! # Usage with Claude Code
//!
//! Add to your `claude_desktop_config.json`:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "skillmesh": {
//!       "command": "/path/to/skillmesh-mcp"
//!     }
//!   }
//! }
//! ```

pub mod factory;
pub mod server;
pub mod tools;

pub use factory::{build_retriever, ConfiguredDenseProvider};
pub use server::SkillmeshServer;
