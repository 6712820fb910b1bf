use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{ErrorContext, ErrorDetail};

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Person,
    Organization,
}

impl EntityType {
    /// Name of the agent column in the product table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Person => "persons",
            Self::Organization => "organizations",
        }
    }
}

/// Records promoted to collections without asking.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct CollectionRules {
    /// `levelOfDescription` values (e.g. `Fonds`, `Series`).
    pub levels: Vec<String>,
    /// Explicit `legacyId`s.
    pub ids: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct MapsConfig {
    pub physical_location: String,
    pub default_parent_id: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            physical_location: "Queen's University Maps and Air Photos Collection".into(),
            default_parent_id: "10678".into(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RunConfig {
    pub entity_type: EntityType,
    pub uniform_agent_name: Option<String>,
    pub default_parent_id: String,
    pub language: String,
    pub archive_uri_prefix: String,
    pub map_uri_prefix: String,
    pub collections: CollectionRules,
    pub interactive: bool,
    pub child_id_start: Option<u64>,
    pub exiftool: PathBuf,
    pub maps: MapsConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            entity_type: EntityType::default(),
            uniform_agent_name: None,
            default_parent_id: String::new(),
            language: "English".into(),
            archive_uri_prefix: "repo-ingest://archives/".into(),
            map_uri_prefix: "repo-ingest://maps/".into(),
            collections: CollectionRules::default(),
            interactive: false,
            child_id_start: None,
            exiftool: "exiftool".into(),
            maps: MapsConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let ctx = ErrorContext::new(path);
        let text = std::fs::read_to_string(path).map_err(|e| ctx.error(ErrorDetail::Io(e)))?;
        serde_yaml::from_str(&text).map_err(|e| ctx.error(ErrorDetail::ParseConfig(e)))
    }

    /// Fallback agent name, ignoring blank values.
    pub fn uniform_agent_name(&self) -> Option<&str> {
        self.uniform_agent_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
