//! Enhancement merge rules.
//!
//! One pure function per enhancement kind. Each takes the accumulated persona
//! by value and returns the next persona, built from the previous one plus the
//! enhancement's delta. None of them can fail.

use crate::persona::domain::{EnhancementKind, PersonaConfig};
use crate::types::{BehaviorWeights, StructuredMap};

/// Apply one enhancement to the accumulated persona.
pub fn apply(persona: PersonaConfig, kind: &EnhancementKind) -> PersonaConfig {
    match kind {
        EnhancementKind::Model { model } => apply_model(persona, model.as_deref()),
        EnhancementKind::Weight { weights } => apply_weights(persona, weights),
        EnhancementKind::Tool { tools, append } => apply_tools(persona, tools, *append),
        EnhancementKind::Nats { subjects } => apply_subjects(persona, subjects),
        EnhancementKind::Prompt { text } => apply_prompt(persona, text.as_deref()),
        EnhancementKind::Eval { gates } => apply_eval_gates(persona, gates),
        EnhancementKind::Geometry {
            default_shape_id,
            decode_mode,
        } => apply_geometry(persona, default_shape_id, decode_mode),
        EnhancementKind::Voice {
            speaking_rate,
            pitch_shift,
            personality_traits,
        } => apply_voice(persona, speaking_rate, pitch_shift, personality_traits),
        EnhancementKind::Unknown { .. } => persona,
    }
}

pub fn apply_model(persona: PersonaConfig, model: Option<&str>) -> PersonaConfig {
    match model {
        Some(model) => PersonaConfig {
            model_preference: model.to_string(),
            ..persona
        },
        None => persona,
    }
}

/// Key-wise overwrite; keys absent from the payload are kept.
pub fn apply_weights(persona: PersonaConfig, weights: &BehaviorWeights) -> PersonaConfig {
    let mut behavior_weights = persona.behavior_weights.clone();
    behavior_weights.extend(weights.iter().map(|(k, v)| (k.clone(), *v)));
    PersonaConfig {
        behavior_weights,
        ..persona
    }
}

/// `append` unions new tools after the existing ones; otherwise the payload
/// replaces the tool set outright.
pub fn apply_tools(persona: PersonaConfig, tools: &[String], append: bool) -> PersonaConfig {
    let tools_access = if append {
        union_in_order(&persona.tools_access, tools)
    } else {
        union_in_order(&[], tools)
    };
    PersonaConfig {
        tools_access,
        ..persona
    }
}

pub fn apply_subjects(persona: PersonaConfig, subjects: &[String]) -> PersonaConfig {
    let nats_subjects = union_in_order(&persona.nats_subjects, subjects);
    PersonaConfig {
        nats_subjects,
        ..persona
    }
}

/// Appends after a blank line, or becomes the template when there is none.
pub fn apply_prompt(persona: PersonaConfig, text: Option<&str>) -> PersonaConfig {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return persona;
    };
    let system_prompt_template = match persona.system_prompt_template.as_deref() {
        Some(existing) if !existing.is_empty() => format!("{}\n\n{}", existing, text),
        _ => text.to_string(),
    };
    PersonaConfig {
        system_prompt_template: Some(system_prompt_template),
        ..persona
    }
}

pub fn apply_eval_gates(persona: PersonaConfig, gates: &StructuredMap) -> PersonaConfig {
    let mut eval_gates = persona.eval_gates.clone();
    eval_gates.extend(gates.iter().map(|(k, v)| (k.clone(), v.clone())));
    PersonaConfig {
        eval_gates,
        ..persona
    }
}

pub fn apply_geometry(
    persona: PersonaConfig,
    default_shape_id: &str,
    decode_mode: &str,
) -> PersonaConfig {
    let block = format!(
        "\n## CHIT Geometry Integration\n\n\
         You have access to CHIT (Compressed Hyper-dimensional Intelligence Transport) geometry:\n\
         - Use `geometry.jump` to navigate to related content via shape anchors\n\
         - Use `geometry.decode_text` to extract meaning from geometric encodings\n\
         - Default shape context: {}\n\
         - Decode mode: {}\n",
        default_shape_id, decode_mode
    );
    append_block(persona, &block)
}

pub fn apply_voice(
    persona: PersonaConfig,
    speaking_rate: &str,
    pitch_shift: &str,
    personality_traits: &[String],
) -> PersonaConfig {
    let block = format!(
        "\n## Voice Persona Settings\n\n\
         When generating text to be spoken:\n\
         - Speaking rate: {}x\n\
         - Pitch shift: {}\n\
         - Personality traits: {}\n",
        speaking_rate,
        pitch_shift,
        personality_traits.join(", ")
    );
    append_block(persona, &block)
}

/// Blocks start with their own newline, so they are glued on directly.
fn append_block(persona: PersonaConfig, block: &str) -> PersonaConfig {
    let mut template = persona.system_prompt_template.clone().unwrap_or_default();
    template.push_str(block);
    PersonaConfig {
        system_prompt_template: Some(template),
        ..persona
    }
}

/// `existing` followed by every item of `additions` not already present.
pub(crate) fn union_in_order(existing: &[String], additions: &[String]) -> Vec<String> {
    let mut out = existing.to_vec();
    for item in additions {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
