//! Expert card types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structured descriptor of a tool, skill, or role.
///
/// Cards are loaded once from a registry and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertCard {
    /// Unique identifier within a corpus (e.g. `cv.opencv-image-processing`).
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Domain the card belongs to.
    #[serde(default)]
    pub domain: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Alternative names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Tool names or ids the card suggests.
    #[serde(default)]
    pub tool_hints: Vec<String>,
    /// Ids of cards this card depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Expected inputs.
    #[serde(default)]
    pub input_contract: serde_json::Value,
    /// Produced artifacts.
    #[serde(default)]
    pub output_artifacts: serde_json::Value,
    /// Checks applied to the output.
    #[serde(default)]
    pub quality_checks: serde_json::Value,
    /// Usage constraints.
    #[serde(default)]
    pub constraints: serde_json::Value,
    /// Risk level label.
    #[serde(default)]
    pub risk_level: String,
    /// Maturity label.
    #[serde(default)]
    pub maturity: String,
    /// Open key-value metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Instruction markdown path, relative to the registry file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_file: Option<String>,
}

impl ExpertCard {
    /// Create a new card with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            domain: String::new(),
            description: String::new(),
            tags: Vec::new(),
            aliases: Vec::new(),
            tool_hints: Vec::new(),
            dependencies: Vec::new(),
            input_contract: serde_json::Value::Null,
            output_artifacts: serde_json::Value::Null,
            quality_checks: serde_json::Value::Null,
            constraints: serde_json::Value::Null,
            risk_level: String::new(),
            maturity: String::new(),
            metadata: BTreeMap::new(),
            instruction_file: None,
        }
    }

    /// Set the domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the aliases.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tool hints.
    pub fn with_tool_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the dependencies.
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Set the risk level.
    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = risk_level.into();
        self
    }

    /// Insert a metadata entry.
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Text fields that feed the lexical index, in indexing order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.domain.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
        .chain(self.aliases.iter().map(String::as_str))
        .chain(self.tool_hints.iter().map(String::as_str))
    }

    /// Text embedded by dense backends.
    ///
    /// Falls back to the title when the description is blank.
    pub fn embedding_text(&self) -> &str {
        if self.description.trim().is_empty() {
            &self.title
        } else {
            &self.description
        }
    }
}
