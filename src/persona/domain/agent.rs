//! Agent configuration derived from a composed persona, and the request shape
//! that asks for one.

use super::enhancement::PersonaEnhancement;
use super::persona::PersonaConfig;
use super::thread_type::ThreadType;
use crate::persona::compose::Overrides;
use crate::types::{BehaviorWeights, StructuredMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTEXT_ALLOCATION: f64 = 0.3;

fn default_context_allocation() -> f64 {
    DEFAULT_CONTEXT_ALLOCATION
}

fn default_true() -> bool {
    true
}

/// Request to derive an agent configuration from a stored persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub persona_id: String,
    /// Share of the parent's context window, 0.0 to 1.0.
    #[serde(default = "default_context_allocation")]
    pub context_allocation: f64,
    #[serde(default)]
    pub parent_agent_id: Option<String>,
    #[serde(default)]
    pub overrides: Option<Overrides>,
    /// Restrict composition to these enhancements.
    #[serde(default)]
    pub enhancement_ids: Option<Vec<String>>,
    /// Publish the created event once the configuration is built.
    #[serde(default = "default_true")]
    pub publish_event: bool,
}

impl CreateAgentRequest {
    pub fn new(persona_id: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            context_allocation: DEFAULT_CONTEXT_ALLOCATION,
            parent_agent_id: None,
            overrides: None,
            enhancement_ids: None,
            publish_event: true,
        }
    }

    pub fn with_context_allocation(mut self, context_allocation: f64) -> Self {
        self.context_allocation = context_allocation;
        self
    }

    pub fn with_parent(mut self, parent_agent_id: impl Into<String>) -> Self {
        self.parent_agent_id = Some(parent_agent_id.into());
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_enhancements(mut self, ids: Vec<String>) -> Self {
        self.enhancement_ids = Some(ids);
        self
    }

    pub fn without_event(mut self) -> Self {
        self.publish_event = false;
        self
    }
}

/// Final configuration handed to the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub specialization: String,
    pub thread_type: ThreadType,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub tools: Vec<String>,
    pub behavior_weights: BehaviorWeights,
    pub nats_subscriptions: Vec<String>,
    pub grounding_packs: Vec<String>,
    pub boosts: StructuredMap,
    pub filters: StructuredMap,
    pub context_allocation: f64,
    pub parent_agent_id: Option<String>,
    pub persona_id: String,
}

impl AgentConfig {
    /// Project a composed persona plus request-scoped fields.
    pub fn from_persona(
        persona: &PersonaConfig,
        system_prompt: String,
        request: &CreateAgentRequest,
    ) -> Self {
        Self {
            name: persona.name.clone(),
            specialization: persona.description.clone(),
            thread_type: persona.thread_type,
            model: persona.model_preference.clone(),
            temperature: persona.temperature,
            max_tokens: persona.max_tokens,
            system_prompt,
            tools: persona.tools_access.clone(),
            behavior_weights: persona.behavior_weights.clone(),
            nats_subscriptions: persona.nats_subjects.clone(),
            grounding_packs: persona.default_packs.clone(),
            boosts: persona.boosts.clone(),
            filters: persona.filters.clone(),
            context_allocation: request.context_allocation,
            parent_agent_id: request.parent_agent_id.clone(),
            persona_id: request.persona_id.clone(),
        }
    }
}

/// Outcome of one successful creation request.
#[derive(Debug, Clone, Serialize)]
pub struct AgentCreation {
    pub config: AgentConfig,
    /// The persona after enhancements and overrides.
    pub persona: PersonaConfig,
    /// Enhancements in the order they were applied.
    pub enhancements_applied: Vec<PersonaEnhancement>,
    /// blake3 digest of `config.system_prompt`.
    pub prompt_digest: String,
    pub created_at: DateTime<Utc>,
}

/// A persona together with every enhancement stored for it.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaDetail {
    pub persona: PersonaConfig,
    pub enhancements: Vec<PersonaEnhancement>,
}
