//! Retriever configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use super::fusion::FusionWeights;
use crate::error::{ErrorCode, SkillmeshError, SkillmeshResult};

/// Requested similarity backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendMode {
    /// Try the dense backend, fall back to memory-only scoring on failure.
    #[default]
    Auto,
    /// Lexical scoring only.
    Memory,
    /// Dense backend required; construction failure is fatal.
    Chroma,
}

impl BackendMode {
    /// Parse a backend name, mapping unknown names to a configuration error.
    pub fn parse(name: &str) -> SkillmeshResult<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(Self::Auto);
        }
        Self::from_str(trimmed).map_err(|_| {
            SkillmeshError::configuration_with(
                ErrorCode::CfgInvalidBackend,
                format!("Unknown backend '{}'", trimmed),
                "`backend` must be one of: auto, memory, chroma.",
            )
        })
    }
}

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f32,
    /// Document length normalization.
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Params {
    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err("bm25 k1 must be a non-negative finite number");
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err("bm25 b must be between 0.0 and 1.0");
        }
        Ok(())
    }
}

/// Configuration for a `Retriever`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Whether dense similarity should contribute to ranking.
    pub use_dense: bool,
    /// Requested backend.
    pub backend: BackendMode,
    /// Sparse/dense fusion weights.
    pub weights: FusionWeights,
    /// BM25 parameters.
    pub bm25: Bm25Params,
}

impl RetrieverConfig {
    /// Memory-only configuration.
    pub fn memory() -> Self {
        Self {
            backend: BackendMode::Memory,
            ..Default::default()
        }
    }

    /// Enable or disable dense scoring.
    pub fn with_dense(mut self, use_dense: bool) -> Self {
        self.use_dense = use_dense;
        self
    }

    /// Set the requested backend.
    pub fn with_backend(mut self, backend: BackendMode) -> Self {
        self.backend = backend;
        self
    }

    /// Set fusion weights.
    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validate every nested setting.
    pub fn validate(&self) -> SkillmeshResult<()> {
        self.weights
            .validate()
            .map_err(SkillmeshError::configuration)?;
        self.bm25.validate().map_err(SkillmeshError::configuration)?;
        Ok(())
    }
}

/// Check a caller-supplied `top_k`.
pub fn validate_top_k(top_k: usize) -> SkillmeshResult<usize> {
    if top_k == 0 {
        return Err(SkillmeshError::configuration_with(
            ErrorCode::CfgInvalidTopK,
            "top_k must be >= 1",
            "Request at least one result.",
        ));
    }
    Ok(top_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_mode_parse() {
        assert_eq!(BackendMode::parse("auto").unwrap(), BackendMode::Auto);
        assert_eq!(BackendMode::parse(" Memory ").unwrap(), BackendMode::Memory);
        assert_eq!(BackendMode::parse("CHROMA").unwrap(), BackendMode::Chroma);
        assert_eq!(BackendMode::parse("").unwrap(), BackendMode::Auto);

        let err = BackendMode::parse("faiss").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CfgInvalidBackend);
    }

    #[test]
    fn test_backend_mode_display() {
        assert_eq!(BackendMode::Chroma.to_string(), "chroma");
        assert_eq!(BackendMode::Auto.to_string(), "auto");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RetrieverConfig::default();
        assert!(!config.use_dense);
        assert_eq!(config.backend, BackendMode::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_bm25_rejected() {
        let config = RetrieverConfig {
            bm25: Bm25Params { k1: 1.2, b: 1.5 },
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_top_k() {
        assert_eq!(validate_top_k(3).unwrap(), 3);
        assert_eq!(validate_top_k(0).unwrap_err().code(), ErrorCode::CfgInvalidTopK);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: RetrieverConfig =
            serde_json::from_str(r#"{"use_dense": true, "backend": "chroma"}"#).unwrap();
        assert!(config.use_dense);
        assert_eq!(config.backend, BackendMode::Chroma);
        assert_eq!(config.bm25, Bm25Params::default());
    }
}
