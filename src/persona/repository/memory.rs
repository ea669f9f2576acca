//! In-process persona store.
//!
//! Holds rows in insertion order behind a lock. Used for offline runs and
//! tests; it can be seeded from a JSON, YAML or TOML document.

use super::contract::{row_key, EnhancementFilter, PersonaRepository};
use crate::error::{PersonaError, Result};
use crate::types::Row;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Seed document layout: `{ personas = [...], enhancements = [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub personas: Vec<Row>,
    #[serde(default)]
    pub enhancements: Vec<Row>,
}

impl SeedDocument {
    /// Parse a seed file, choosing the format from its extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let parsed: std::result::Result<Self, String> = match extension.as_str() {
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
            other => {
                return Err(PersonaError::ConfigurationError(format!(
                    "Unsupported seed file extension '{}': {}",
                    other,
                    path.display()
                )))
            }
        };

        parsed.map_err(|e| {
            PersonaError::ConfigurationError(format!(
                "Failed to parse seed file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[derive(Default)]
pub struct MemoryPersonaRepository {
    personas: RwLock<Vec<Row>>,
    enhancements: RwLock<Vec<Row>>,
}

impl MemoryPersonaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedDocument) -> Self {
        Self {
            personas: RwLock::new(seed.personas),
            enhancements: RwLock::new(seed.enhancements),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let seed = SeedDocument::from_file(path)?;
        tracing::debug!(
            path = %path.display(),
            personas = seed.personas.len(),
            enhancements = seed.enhancements.len(),
            "Loaded persona seed file"
        );
        Ok(Self::from_seed(seed))
    }

    pub fn insert_persona(&self, row: Row) {
        self.personas.write().push(row);
    }

    pub fn insert_enhancement(&self, row: Row) {
        self.enhancements.write().push(row);
    }

    fn find_persona(&self, predicate: impl Fn(&Row) -> bool) -> Option<Row> {
        self.personas.read().iter().find(|row| predicate(row)).cloned()
    }
}

fn field_is(row: &Row, field: &str, expected: &str) -> bool {
    row.get(field)
        .and_then(row_key)
        .map_or(false, |value| value == expected)
}

/// Rows without an `is_active` column count as active.
fn is_active(row: &Row) -> bool {
    !matches!(row.get("is_active"), Some(Value::Bool(false)))
}

fn priority(row: &Row) -> i64 {
    row.get("priority").and_then(Value::as_i64).unwrap_or(0)
}

#[async_trait]
impl PersonaRepository for MemoryPersonaRepository {
    async fn get_by_id(&self, persona_id: &str) -> Result<Option<Row>> {
        Ok(self.find_persona(|row| field_is(row, "persona_id", persona_id)))
    }

    async fn get_by_name_version(&self, name: &str, version: &str) -> Result<Option<Row>> {
        Ok(self.find_persona(|row| field_is(row, "name", name) && field_is(row, "version", version)))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Row>> {
        Ok(self
            .personas
            .read()
            .iter()
            .filter(|row| !active_only || is_active(row))
            .cloned()
            .collect())
    }

    async fn get_enhancements(
        &self,
        persona_id: &str,
        filter: &EnhancementFilter,
    ) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = self
            .enhancements
            .read()
            .iter()
            .filter(|row| field_is(row, "persona_id", persona_id) && filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by_key(|row| std::cmp::Reverse(priority(row)));
        Ok(rows)
    }
}
