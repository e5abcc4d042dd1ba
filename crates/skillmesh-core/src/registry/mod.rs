//! Card registry loading.
//!
//! A registry is a `.json`, `.yaml`, or `.yml` document holding either a list
//! of cards or an object with a `tools` or `roles` list. An empty document or
//! an empty object holds no cards.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorCode, SkillmeshError, SkillmeshResult};
use crate::types::{CardCorpus, ExpertCard};

/// Environment variable naming the default registry file.
pub const REGISTRY_ENV: &str = "SKILLMESH_REGISTRY";

/// Registry location used when neither an explicit path nor the env var is set.
pub fn default_registry_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codex")
        .join("skills")
        .join("skillmesh")
        .join("installed.registry.yaml")
}

/// Pick the registry path: explicit, then `SKILLMESH_REGISTRY`, then the default.
pub fn resolve_registry_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match std::env::var(REGISTRY_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => default_registry_path(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryFormat {
    Json,
    Yaml,
}

impl RegistryFormat {
    fn from_path(path: &Path) -> SkillmeshResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            other => Err(SkillmeshError::registry(format!(
                "Unsupported registry extension '{}': {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// Load all cards from a registry file.
pub fn load_registry(path: impl AsRef<Path>) -> SkillmeshResult<Vec<ExpertCard>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(SkillmeshError::registry_with(
            ErrorCode::RegNotFound,
            format!("Registry file not found: {}", path.display()),
        ));
    }

    let format = RegistryFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let cards = parse_registry(&content, format)?;
    debug!(path = %path.display(), cards = cards.len(), "Loaded registry");
    Ok(cards)
}

/// Load a registry and check id uniqueness.
pub fn load_corpus(path: impl AsRef<Path>) -> SkillmeshResult<CardCorpus> {
    CardCorpus::new(load_registry(path)?)
}

/// Parse registry JSON text.
pub fn parse_registry_json(content: &str) -> SkillmeshResult<Vec<ExpertCard>> {
    parse_registry(content, RegistryFormat::Json)
}

/// Parse registry YAML text.
pub fn parse_registry_yaml(content: &str) -> SkillmeshResult<Vec<ExpertCard>> {
    parse_registry(content, RegistryFormat::Yaml)
}

fn parse_registry(content: &str, format: RegistryFormat) -> SkillmeshResult<Vec<ExpertCard>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = match format {
        RegistryFormat::Json => serde_json::from_str(content)
            .map_err(|e| SkillmeshError::registry(format!("Invalid JSON registry: {}", e)))?,
        RegistryFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| SkillmeshError::registry(format!("Invalid YAML registry: {}", e)))?,
    };

    entries(document)?
        .into_iter()
        .enumerate()
        .map(|(position, entry)| parse_card(position, entry))
        .collect()
}

fn entries(document: Value) -> SkillmeshResult<Vec<Value>> {
    match document {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["tools", "roles"] {
                match map.remove(key) {
                    Some(Value::Array(items)) => return Ok(items),
                    Some(_) => {
                        return Err(SkillmeshError::registry(format!(
                            "Registry '{}' must be a list of cards",
                            key
                        )))
                    }
                    None => {}
                }
            }
            if map.is_empty() {
                Ok(Vec::new())
            } else {
                Err(SkillmeshError::registry(
                    "Registry object must include one of 'tools' or 'roles'",
                ))
            }
        }
        _ => Err(SkillmeshError::registry("Registry must be a list or an object")),
    }
}

fn parse_card(position: usize, entry: Value) -> SkillmeshResult<ExpertCard> {
    let card: ExpertCard = serde_json::from_value(entry).map_err(|e| {
        SkillmeshError::registry_with(
            ErrorCode::RegInvalidEntry,
            format!("Invalid card at position {}: {}", position, e),
        )
    })?;
    if card.id.trim().is_empty() {
        return Err(SkillmeshError::registry_with(
            ErrorCode::RegInvalidEntry,
            format!("Card at position {} has an empty id", position),
        ));
    }
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_list() {
        let cards = parse_registry_json(
            r#"[{"id": "cv.opencv", "title": "OpenCV", "tags": ["image"]}, {"id": "nlp.spacy"}]"#,
        )
        .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].tags, vec!["image"]);
        assert_eq!(cards[1].title, "");
    }

    #[test]
    fn test_yaml_tools_object() {
        let yaml = r#"
version: 1
tools:
  - id: cv.opencv
    title: OpenCV
    domain: computer_vision
    risk_level: low
"#;
        let cards = parse_registry_yaml(yaml).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].domain, "computer_vision");
        assert_eq!(cards[0].risk_level, "low");
    }

    #[test]
    fn test_roles_object() {
        let cards =
            parse_registry_json(r#"{"roles": [{"id": "role.analyst", "title": "Analyst"}]}"#)
                .unwrap();
        assert_eq!(cards[0].id, "role.analyst");
    }

    #[test]
    fn test_empty_documents() {
        assert!(parse_registry_yaml("").unwrap().is_empty());
        assert!(parse_registry_yaml("~").unwrap().is_empty());
        assert!(parse_registry_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_object_without_cards_rejected() {
        let err = parse_registry_json(r#"{"skills": []}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidFormat);
    }

    #[test]
    fn test_non_list_cards_rejected() {
        let err = parse_registry_json(r#"{"tools": "x"}"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidFormat);
        let err = parse_registry_yaml("roles:\n  id: role.analyst\n").unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidFormat);
    }

    #[test]
    fn test_missing_or_blank_id_rejected() {
        let err = parse_registry_json(r#"[{"title": "No id"}]"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidEntry);

        let err = parse_registry_json(r#"[{"id": "  "}]"#).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidEntry);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "- id: data.pandas\n  title: Pandas").unwrap();

        let cards = load_registry(file.path()).unwrap();
        assert_eq!(cards[0].id, "data.pandas");
    }

    #[test]
    fn test_missing_file() {
        let err = load_registry("/definitely/not/here.yaml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegNotFound);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = load_registry(file.path()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RegInvalidFormat);
    }

    #[test]
    fn test_duplicate_ids_fail_corpus() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"id": "a"}}, {{"id": "a"}}]"#).unwrap();
        let err = load_corpus(file.path()).unwrap_err();
        assert!(err.is_corpus());
    }

    #[test]
    fn test_explicit_registry_path_wins() {
        assert_eq!(
            resolve_registry_path(Some(" /tmp/cards.json ")),
            PathBuf::from("/tmp/cards.json")
        );
        assert!(
            default_registry_path().ends_with(".codex/skills/skillmesh/installed.registry.yaml")
        );
    }
}
