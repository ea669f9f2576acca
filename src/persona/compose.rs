//! Composition engine.
//!
//! Folds a persona's enhancements into a new persona and applies request
//! overrides on top.
//!
//! Ordering: enhancements are applied in ascending priority, so the highest
//! priority is applied last and wins exclusive fields (model, tool
//! replacement). Accumulating rules see everything applied before them. Equal
//! priorities keep their input order; the store reports enhancements in
//! descending priority, so ties keep the store's order.

use crate::error::{PersonaError, Result};
use crate::persona::domain::{PersonaConfig, PersonaEnhancement};
use crate::persona::merge;
use crate::types::StructuredMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request-level replacements applied after every enhancement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
}

impl Overrides {
    /// Read overrides from an open map. Unknown keys are ignored.
    pub fn from_map(map: &StructuredMap) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(map.clone()))
            .map_err(|e| PersonaError::InvalidRequest(format!("Invalid overrides: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.tools.is_none()
    }

    /// Replace each provided field.
    pub fn apply(&self, persona: PersonaConfig) -> PersonaConfig {
        PersonaConfig {
            model_preference: self
                .model
                .clone()
                .unwrap_or_else(|| persona.model_preference.clone()),
            temperature: self.temperature.unwrap_or(persona.temperature),
            max_tokens: self.max_tokens.unwrap_or(persona.max_tokens),
            tools_access: match self.tools {
                Some(ref tools) => merge::union_in_order(&[], tools),
                None => persona.tools_access.clone(),
            },
            ..persona
        }
    }
}

/// Enhancements in application order: stable ascending priority.
pub fn order_for_application(enhancements: &[PersonaEnhancement]) -> Vec<&PersonaEnhancement> {
    let mut ordered: Vec<&PersonaEnhancement> = enhancements.iter().collect();
    ordered.sort_by_key(|e| e.priority);
    ordered
}

/// Derive a new persona from `base`, its enhancements, and overrides.
///
/// `base` is only read; the result is an independent value.
pub fn compose(
    base: &PersonaConfig,
    enhancements: &[PersonaEnhancement],
    overrides: Option<&Overrides>,
) -> PersonaConfig {
    let ordered = order_for_application(enhancements);

    let composed = ordered.iter().fold(base.clone(), |persona, enhancement| {
        debug!(
            persona_id = %base.persona_id,
            enhancement_id = %enhancement.enhancement_id,
            enhancement_type = enhancement.enhancement_type(),
            priority = enhancement.priority,
            "Applying enhancement"
        );
        merge::apply(persona, &enhancement.kind)
    });

    match overrides {
        Some(overrides) => overrides.apply(composed),
        None => composed,
    }
}
