//! Persona store contract.
//!
//! Adapters return raw rows; normalization into domain types happens in the
//! service so every backend shares the same required-field and legacy-key
//! handling.

use crate::error::Result;
use crate::types::Row;
use async_trait::async_trait;

/// Narrowing applied when fetching a persona's enhancements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnhancementFilter {
    /// Only these type tags.
    pub types: Option<Vec<String>>,
    /// Only these enhancement ids. An empty list does not restrict.
    pub ids: Option<Vec<String>>,
}

impl EnhancementFilter {
    pub fn with_ids(ids: Vec<String>) -> Self {
        Self {
            types: None,
            ids: Some(ids),
        }
    }

    pub fn with_types(types: Vec<String>) -> Self {
        Self {
            types: Some(types),
            ids: None,
        }
    }

    pub(crate) fn matches(&self, row: &Row) -> bool {
        let field_in = |field: &str, allowed: &Option<Vec<String>>| match allowed {
            Some(allowed) if !allowed.is_empty() => row
                .get(field)
                .and_then(row_key)
                .map_or(false, |value| allowed.iter().any(|a| *a == value)),
            _ => true,
        };
        field_in("enhancement_type", &self.types) && field_in("enhancement_id", &self.ids)
    }
}

/// Ids arrive as strings or numbers; compare them as text.
pub(crate) fn row_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read access to stored personas and enhancements.
///
/// Lookups that find nothing return `Ok(None)` or an empty list. Transport
/// failures are errors and are never folded into "not found".
#[async_trait]
pub trait PersonaRepository: Send + Sync {
    /// Persona row by id.
    async fn get_by_id(&self, persona_id: &str) -> Result<Option<Row>>;

    /// Persona row by name and version.
    async fn get_by_name_version(&self, name: &str, version: &str) -> Result<Option<Row>>;

    /// Persona rows, optionally restricted to active ones.
    async fn list(&self, active_only: bool) -> Result<Vec<Row>>;

    /// Enhancement rows for a persona, highest priority first.
    async fn get_enhancements(
        &self,
        persona_id: &str,
        filter: &EnhancementFilter,
    ) -> Result<Vec<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(EnhancementFilter::default().matches(&row(json!({}))));
        assert!(EnhancementFilter::with_ids(vec![]).matches(&row(json!({"enhancement_id": "e"}))));
    }

    #[test]
    fn filter_compares_numeric_ids_as_text() {
        let filter = EnhancementFilter::with_ids(vec!["7".to_string()]);
        assert!(filter.matches(&row(json!({"enhancement_id": 7}))));
        assert!(!filter.matches(&row(json!({"enhancement_id": "8"}))));
        assert!(!filter.matches(&row(json!({}))));
    }

    #[test]
    fn filter_by_type() {
        let filter = EnhancementFilter::with_types(vec!["tool".to_string(), "model".to_string()]);
        assert!(filter.matches(&row(json!({"enhancement_type": "model"}))));
        assert!(!filter.matches(&row(json!({"enhancement_type": "voice"}))));
    }
}
