//! Creation request validation, run before any store access.

use super::agent::CreateAgentRequest;
use crate::error::{PersonaError, Result};

/// Validate a creation request.
pub fn validate_request(request: &CreateAgentRequest) -> Result<()> {
    if request.persona_id.trim().is_empty() {
        return Err(PersonaError::InvalidRequest(
            "persona_id cannot be empty".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&request.context_allocation) {
        return Err(PersonaError::InvalidRequest(format!(
            "context_allocation must be between 0.0 and 1.0, got {}",
            request.context_allocation
        )));
    }

    if let Some(ref overrides) = request.overrides {
        if let Some(temperature) = overrides.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PersonaError::InvalidRequest(format!(
                    "Temperature override must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }
        if let Some(ref model) = overrides.model {
            if model.trim().is_empty() {
                return Err(PersonaError::InvalidRequest(
                    "Model override cannot be empty".to_string(),
                ));
            }
        }
    }

    if let Some(ref ids) = request.enhancement_ids {
        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(PersonaError::InvalidRequest(
                "enhancement_ids cannot contain empty ids".to_string(),
            ));
        }
    }

    Ok(())
}
