//! Persona configuration and its normalization from store rows.

use super::row::{
    count_value, float_value, string_value, structured_map, unique_strings, weights_map,
    RowFields,
};
use super::thread_type::ThreadType;
use crate::error::{PersonaError, Result};
use crate::types::{BehaviorWeights, Row, StructuredMap};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// decode 0.33 / retrieve 0.34 / generate 0.33. No sum-to-one invariant.
pub fn default_behavior_weights() -> BehaviorWeights {
    BehaviorWeights::from([
        ("decode".to_string(), 0.33),
        ("retrieve".to_string(), 0.34),
        ("generate".to_string(), 0.33),
    ])
}

/// Immutable persona template.
///
/// Derivation never edits a persona in place: every composition step builds a
/// new value from the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    pub persona_id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thread_type: ThreadType,
    pub model_preference: String,
    /// Generation temperature, 0.0 to 2.0.
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_template: Option<String>,
    /// Ordered, duplicate-free tool names.
    #[serde(default)]
    pub tools_access: Vec<String>,
    pub behavior_weights: BehaviorWeights,
    #[serde(default)]
    pub nats_subjects: Vec<String>,
    /// Grounding pack identifiers.
    #[serde(default)]
    pub default_packs: Vec<String>,
    #[serde(default)]
    pub boosts: StructuredMap,
    #[serde(default)]
    pub filters: StructuredMap,
    #[serde(default)]
    pub eval_gates: StructuredMap,
}

impl PersonaConfig {
    /// Persona with the documented defaults for every optional field.
    pub fn new(
        persona_id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            persona_id: persona_id.into(),
            name: name.into(),
            version: version.into(),
            description: description.into(),
            thread_type: ThreadType::Base,
            model_preference: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt_template: None,
            tools_access: Vec::new(),
            behavior_weights: default_behavior_weights(),
            nats_subjects: Vec::new(),
            default_packs: Vec::new(),
            boosts: StructuredMap::new(),
            filters: StructuredMap::new(),
            eval_gates: StructuredMap::new(),
        }
    }

    /// Normalize a persona store row.
    ///
    /// `persona_id`, `name` and `version` must be present. Every optional
    /// setting resolves from its top-level column, then from the legacy
    /// `runtime` object, then from the default.
    pub fn from_row(row: &Row) -> Result<Self> {
        let fields = RowFields::new("persona", row);

        let persona_id = fields.required_string("persona_id")?;
        let name = fields.required_string("name")?;
        let version = fields.required_string("version")?;

        let mut persona = PersonaConfig::new(persona_id, name, version, "");

        if let Some(value) = fields.column("description") {
            persona.description = string_value("description", value)?;
        }
        if let Some(value) = fields.resolve("thread_type", &[]) {
            let tag = string_value("thread_type", value)?;
            persona.thread_type = tag
                .parse()
                .map_err(|reason: String| PersonaError::invalid("thread_type", reason))?;
        }
        if let Some(value) = fields.resolve("model_preference", &["model"]) {
            persona.model_preference = string_value("model_preference", value)?;
        }
        if let Some(value) = fields.resolve("temperature", &[]) {
            let temperature = float_value("temperature", value)?;
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PersonaError::invalid(
                    "temperature",
                    format!("must be between 0.0 and 2.0, got {}", temperature),
                ));
            }
            persona.temperature = temperature;
        }
        if let Some(value) = fields.resolve("max_tokens", &[]) {
            persona.max_tokens = count_value("max_tokens", value)?;
        }
        // An empty template column still defers to the legacy prompt.
        let template = match fields.column("system_prompt_template") {
            Some(value) if value.as_str() != Some("") => Some(value),
            _ => fields.legacy("system_prompt_template", &["system_prompt"]),
        };
        if let Some(value) = template {
            let text = string_value("system_prompt_template", value)?;
            persona.system_prompt_template = Some(text).filter(|t| !t.is_empty());
        }
        if let Some(value) = fields.resolve("tools_access", &["tools"]) {
            persona.tools_access = unique_strings("tools_access", value)?;
        }
        if let Some(value) = fields.resolve("behavior_weights", &["weights"]) {
            let weights = weights_map("behavior_weights", value)?;
            if !weights.is_empty() {
                persona.behavior_weights = weights;
            }
        }
        if let Some(value) = fields.resolve("nats_subjects", &["nats_subscriptions"]) {
            persona.nats_subjects = unique_strings("nats_subjects", value)?;
        }
        if let Some(value) = fields.resolve("default_packs", &[]) {
            persona.default_packs = unique_strings("default_packs", value)?;
        }
        if let Some(value) = fields.resolve("boosts", &[]) {
            persona.boosts = structured_map("boosts", value)?;
        }
        if let Some(value) = fields.resolve("filters", &[]) {
            persona.filters = structured_map("filters", value)?;
        }
        if let Some(value) = fields.resolve("eval_gates", &[]) {
            persona.eval_gates = structured_map("eval_gates", value)?;
        }

        Ok(persona)
    }
}

/// Filter for persona listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaFilter {
    pub active_only: bool,
    pub thread_type: Option<ThreadType>,
}

impl Default for PersonaFilter {
    fn default() -> Self {
        Self {
            active_only: true,
            thread_type: None,
        }
    }
}

impl PersonaFilter {
    pub fn matches(&self, persona: &PersonaConfig) -> bool {
        self.thread_type
            .map(|wanted| persona.thread_type == wanted)
            .unwrap_or(true)
    }
}
