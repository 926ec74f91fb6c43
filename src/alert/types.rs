//! Alert type map
//!
//! Immutable id → name table loaded once from a TOML file:
//!
//! ```toml
//! [[types]]
//! id = 1
//! type = "USER_LOGIN"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SysmonError};

#[derive(Debug, Deserialize)]
struct TypeFile {
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeEntry {
    id: u32,
    #[serde(rename = "type")]
    name: String,
}

/// Alert type id ↔ name table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertTypeMap {
    by_id: BTreeMap<u32, String>,
}

impl AlertTypeMap {
    /// Empty table: every lookup misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SysmonError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let map = Self::from_toml_str(&content)
            .map_err(|e| SysmonError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Loaded {} alert types from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parse the table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TypeFile =
            toml::from_str(content).map_err(|e| SysmonError::Config(e.to_string()))?;

        let mut by_id = BTreeMap::new();
        for entry in file.types {
            if by_id.insert(entry.id, entry.name).is_some() {
                return Err(SysmonError::Config(format!(
                    "Duplicate alert type id: {}",
                    entry.id
                )));
            }
        }
        Ok(Self { by_id })
    }

    /// Id of the type called `name`
    ///
    /// With duplicate names the lowest id wins.
    pub fn type_id_for_name(&self, name: &str) -> Option<u32> {
        self.by_id
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&id, _)| id)
    }

    pub fn type_name_for_id(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// All types in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.by_id.iter().map(|(&id, name)| (id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<(u32, String)> for AlertTypeMap {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            by_id: iter.into_iter().collect(),
        }
    }
}
