//! Error types for skillmesh operations.
//!
//! This module provides the error hierarchy shared by every skillmesh crate,
//! with structured error codes and suggestions for resolution.

use thiserror::Error;

/// Result type alias for skillmesh operations.
pub type SkillmeshResult<T> = Result<T, SkillmeshError>;

/// Main error type for all skillmesh operations.
#[derive(Error, Debug)]
pub enum SkillmeshError {
    /// Invalid caller-supplied configuration or arguments.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// An explicitly requested dense backend could not be constructed.
    #[error("Backend unavailable: {backend}: {message}")]
    BackendUnavailable {
        backend: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The card corpus violates an invariant (duplicate or empty ids).
    #[error("Corpus error: {message}")]
    Corpus {
        message: String,
        code: ErrorCode,
        card_id: Option<String>,
    },

    /// The card registry document could not be read or parsed.
    #[error("Registry error: {message}")]
    Registry { message: String, code: ErrorCode },

    /// Embedding generation failed.
    #[error("Embedding error: {message}")]
    Embedding {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector store operation failed.
    #[error("Vector store error: {message}")]
    VectorStore {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider not supported (or not compiled in).
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalidValue,
    CfgInvalidBackend,
    CfgInvalidTopK,
    CfgEmptyQuery,
    CfgInvalidFile,

    // Backend (BCK_xxx)
    BckUnavailable,

    // Corpus (CRP_xxx)
    CrpDuplicateId,
    CrpEmptyId,

    // Registry (REG_xxx)
    RegNotFound,
    RegInvalidFormat,
    RegInvalidEntry,

    // Embedding (EMB_xxx)
    EmbConnectionFailed,
    EmbGenerationFailed,

    // Vector Store (VEC_xxx)
    VecConnectionFailed,
    VecOperationFailed,
    VecCollectionNotFound,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalidValue => "CFG_001",
            ErrorCode::CfgInvalidBackend => "CFG_002",
            ErrorCode::CfgInvalidTopK => "CFG_003",
            ErrorCode::CfgEmptyQuery => "CFG_004",
            ErrorCode::CfgInvalidFile => "CFG_005",
            ErrorCode::BckUnavailable => "BCK_001",
            ErrorCode::CrpDuplicateId => "CRP_001",
            ErrorCode::CrpEmptyId => "CRP_002",
            ErrorCode::RegNotFound => "REG_001",
            ErrorCode::RegInvalidFormat => "REG_002",
            ErrorCode::RegInvalidEntry => "REG_003",
            ErrorCode::EmbConnectionFailed => "EMB_001",
            ErrorCode::EmbGenerationFailed => "EMB_002",
            ErrorCode::VecConnectionFailed => "VEC_001",
            ErrorCode::VecOperationFailed => "VEC_002",
            ErrorCode::VecCollectionNotFound => "VEC_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl SkillmeshError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            code: ErrorCode::CfgInvalidValue,
            suggestion: None,
        }
    }

    /// Create a configuration error with a specific code and suggestion.
    pub fn configuration_with(
        code: ErrorCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a backend-unavailable error wrapping the construction failure.
    pub fn backend_unavailable(backend: impl Into<String>, cause: SkillmeshError) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            message: cause.to_string(),
            source: Some(Box::new(cause)),
        }
    }

    /// Create a duplicate-id corpus error.
    pub fn duplicate_card(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::Corpus {
            message: format!("Duplicate card id '{}'", id),
            code: ErrorCode::CrpDuplicateId,
            card_id: Some(id),
        }
    }

    /// Create an empty-id corpus error.
    pub fn empty_card_id(position: usize) -> Self {
        Self::Corpus {
            message: format!("Card at position {} has an empty id", position),
            code: ErrorCode::CrpEmptyId,
            card_id: None,
        }
    }

    /// Create a registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
            code: ErrorCode::RegInvalidFormat,
        }
    }

    /// Create a registry error with a specific code.
    pub fn registry_with(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
            code,
        }
    }

    /// Create an embedding error.
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
            code: ErrorCode::EmbGenerationFailed,
            source: None,
        }
    }

    /// Create a vector store error.
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore {
            message: message.into(),
            code: ErrorCode::VecOperationFailed,
            source: None,
        }
    }

    /// Create a vector store connection error.
    pub fn vector_store_connection(message: impl Into<String>) -> Self {
        Self::VectorStore {
            message: message.into(),
            code: ErrorCode::VecConnectionFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { code, .. } => *code,
            Self::BackendUnavailable { .. } => ErrorCode::BckUnavailable,
            Self::Corpus { code, .. } => *code,
            Self::Registry { code, .. } => *code,
            Self::Embedding { code, .. } => *code,
            Self::VectorStore { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether this is a backend-unavailable error.
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }

    /// Whether this is a corpus error.
    pub fn is_corpus(&self) -> bool {
        matches!(self, Self::Corpus { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration { suggestion, .. } => suggestion.as_deref(),
            Self::BackendUnavailable { .. } => {
                Some("Check the vector store and embedder settings, or use backend 'auto' or 'memory'")
            }
            Self::Corpus { .. } => Some("Card ids must be non-empty and unique within a registry"),
            Self::Registry { .. } => Some(
                "Registry must be a .json/.yaml list of cards or an object with 'tools' or 'roles'",
            ),
            Self::Embedding { .. } => Some("Please check your embedding provider configuration"),
            Self::VectorStore { .. } => Some("Please check your vector store connection settings"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = SkillmeshError::configuration("bad value");
        assert_eq!(err.code(), ErrorCode::CfgInvalidValue);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("bad value"));
    }

    #[test]
    fn test_backend_unavailable_keeps_cause() {
        let cause = SkillmeshError::vector_store_connection("connection refused");
        let err = SkillmeshError::backend_unavailable("chroma", cause);
        assert!(err.is_backend_unavailable());
        assert_eq!(err.code().as_str(), "BCK_001");
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_duplicate_card_error() {
        let err = SkillmeshError::duplicate_card("cv.opencv");
        assert!(err.is_corpus());
        assert_eq!(err.code(), ErrorCode::CrpDuplicateId);
        assert!(err.suggestion().is_some());
    }
}
