//! Persona integration service.
//!
//! Fetches persona and enhancement rows from a [`PersonaRepository`],
//! normalizes them, runs composition and prompt assembly, and publishes an
//! event for every agent configuration it builds.

use crate::error::{PersonaError, Result};
use crate::events::EventSink;
use crate::persona::compose::{compose, order_for_application};
use crate::persona::domain::{
    validate_request, AgentConfig, AgentCreation, CreateAgentRequest, PersonaConfig,
    PersonaDetail, PersonaEnhancement, PersonaFilter,
};
use crate::persona::prompt::{assemble, prompt_digest};
use crate::persona::repository::{EnhancementFilter, PersonaRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Subject for the event published after each agent configuration is built.
pub const AGENT_CREATED_SUBJECT: &str = "persona.agent.created.v1";

pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Store reachable, but some persona rows fail normalization.
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub store_connected: bool,
    pub total_personas: usize,
    pub invalid_personas: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct PersonaService {
    repository: Arc<dyn PersonaRepository>,
    events: Arc<dyn EventSink>,
}

impl PersonaService {
    pub fn new(repository: Arc<dyn PersonaRepository>, events: Arc<dyn EventSink>) -> Self {
        Self { repository, events }
    }

    /// Persona by id, `None` when the store has no such row.
    pub async fn get_persona(&self, persona_id: &str) -> Result<Option<PersonaConfig>> {
        debug!(persona_id = persona_id, "Fetching persona");
        self.repository
            .get_by_id(persona_id)
            .await?
            .map(|row| PersonaConfig::from_row(&row))
            .transpose()
    }

    /// Persona by name; `version` defaults to "1.0".
    pub async fn get_persona_by_name(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<Option<PersonaConfig>> {
        let version = version.unwrap_or(DEFAULT_VERSION);
        debug!(name = name, version = version, "Fetching persona by name");
        self.repository
            .get_by_name_version(name, version)
            .await?
            .map(|row| PersonaConfig::from_row(&row))
            .transpose()
    }

    pub async fn list_personas(&self, filter: &PersonaFilter) -> Result<Vec<PersonaConfig>> {
        let rows = self.repository.list(filter.active_only).await?;
        let mut personas = Vec::with_capacity(rows.len());
        for row in &rows {
            let persona = PersonaConfig::from_row(row)?;
            if filter.matches(&persona) {
                personas.push(persona);
            }
        }
        debug!(
            fetched = rows.len(),
            matched = personas.len(),
            "Listed personas"
        );
        Ok(personas)
    }

    /// Enhancements for a persona, highest priority first.
    pub async fn get_enhancements(
        &self,
        persona_id: &str,
        filter: &EnhancementFilter,
    ) -> Result<Vec<PersonaEnhancement>> {
        let rows = self.repository.get_enhancements(persona_id, filter).await?;
        rows.iter().map(PersonaEnhancement::from_row).collect()
    }

    /// Persona with all of its stored enhancements.
    pub async fn persona_detail(&self, persona_id: &str) -> Result<PersonaDetail> {
        let filter = EnhancementFilter::default();
        let (persona, enhancements) = futures::try_join!(
            self.get_persona(persona_id),
            self.get_enhancements(persona_id, &filter)
        )?;
        let persona = persona
            .ok_or_else(|| PersonaError::NotFound(format!("persona {}", persona_id)))?;
        Ok(PersonaDetail {
            persona,
            enhancements,
        })
    }

    /// Build an agent configuration for `request`.
    ///
    /// Persona and enhancements are fetched concurrently; either failure
    /// fails the whole request. The created event is published at most once,
    /// after the configuration is complete.
    pub async fn create_agent_config(&self, request: &CreateAgentRequest) -> Result<AgentCreation> {
        validate_request(request)?;

        let filter = EnhancementFilter {
            types: None,
            ids: request.enhancement_ids.clone(),
        };
        let (persona, enhancements) = futures::try_join!(
            self.get_persona(&request.persona_id),
            self.get_enhancements(&request.persona_id, &filter)
        )?;
        let persona = persona.ok_or_else(|| {
            PersonaError::NotFound(format!("persona {}", request.persona_id))
        })?;
        ensure_requested_present(request, &enhancements)?;

        let composed = compose(&persona, &enhancements, request.overrides.as_ref());
        let system_prompt = assemble(&composed);
        let digest = prompt_digest(&system_prompt);
        let config = AgentConfig::from_persona(&composed, system_prompt, request);

        let enhancements_applied: Vec<PersonaEnhancement> = order_for_application(&enhancements)
            .into_iter()
            .cloned()
            .collect();

        let creation = AgentCreation {
            config,
            persona: composed,
            enhancements_applied,
            prompt_digest: digest,
            created_at: Utc::now(),
        };

        info!(
            persona_id = %request.persona_id,
            name = %creation.persona.name,
            model = %creation.config.model,
            enhancements = creation.enhancements_applied.len(),
            "Created agent configuration"
        );

        if request.publish_event {
            self.events
                .publish(AGENT_CREATED_SUBJECT, agent_created_payload(&creation));
        }

        Ok(creation)
    }

    /// Probe the store. Never fails; an unreachable store yields an
    /// unhealthy report.
    pub async fn health(&self) -> HealthReport {
        match self.repository.list(false).await {
            Ok(rows) => {
                let invalid_personas = rows
                    .iter()
                    .filter(|row| PersonaConfig::from_row(row).is_err())
                    .count();
                let status = if invalid_personas == 0 {
                    HealthStatus::Healthy
                } else {
                    HealthStatus::Degraded
                };
                HealthReport {
                    status,
                    store_connected: true,
                    total_personas: rows.len(),
                    invalid_personas,
                    error: None,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Persona store health check failed");
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    store_connected: false,
                    total_personas: 0,
                    invalid_personas: 0,
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        }
    }
}

/// Every explicitly requested enhancement id must have been returned.
fn ensure_requested_present(
    request: &CreateAgentRequest,
    enhancements: &[PersonaEnhancement],
) -> Result<()> {
    let Some(ids) = request.enhancement_ids.as_deref() else {
        return Ok(());
    };
    let missing: Vec<&str> = ids
        .iter()
        .filter(|id| !enhancements.iter().any(|e| &e.enhancement_id == *id))
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PersonaError::NotFound(format!(
        "enhancement(s) {} for persona {}",
        missing.join(", "),
        request.persona_id
    )))
}

fn agent_created_payload(creation: &AgentCreation) -> serde_json::Value {
    let persona = &creation.persona;
    json!({
        "event": AGENT_CREATED_SUBJECT,
        "persona_id": persona.persona_id,
        "name": persona.name,
        "version": persona.version,
        "thread_type": persona.thread_type,
        "model": persona.model_preference,
        "timestamp": creation.created_at.to_rfc3339(),
        "context_allocation": creation.config.context_allocation,
        "parent_agent_id": creation.config.parent_agent_id,
        "enhancements_applied": creation.enhancements_applied.len(),
        "prompt_digest": creation.prompt_digest,
    })
}
