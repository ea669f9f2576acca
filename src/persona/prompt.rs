//! System prompt assembly.
//!
//! The prompt is the persona's instruction template (or a generated opening
//! sentence) followed by up to four fixed sections, each emitted only when its
//! backing collection is non-empty. Structured maps are dumped as two-space
//! pretty JSON in key order, so equal personas always yield identical bytes.

use crate::persona::domain::PersonaConfig;
use crate::types::StructuredMap;

/// Build the system prompt for a composed persona.
pub fn assemble(persona: &PersonaConfig) -> String {
    let mut prompt = match persona.system_prompt_template.as_deref() {
        Some(template) if !template.is_empty() => template.to_string(),
        _ => format!("You are {}, {}.", persona.name, persona.description),
    };

    if !persona.tools_access.is_empty() {
        prompt.push_str(&section(
            "Available Tools",
            "You have access to the following tools:",
            &bullets(&persona.tools_access),
        ));
    }

    if !persona.default_packs.is_empty() {
        prompt.push_str(&section(
            "Knowledge Access",
            "You can retrieve information from these grounding packs:",
            &bullets(&persona.default_packs),
        ));
    }

    if !persona.boosts.is_empty() {
        prompt.push_str(&section(
            "Retrieval Boosts",
            "Prioritize these entities and topics in retrieval:",
            &pretty(&persona.boosts),
        ));
    }

    if !persona.filters.is_empty() {
        prompt.push_str(&section(
            "Content Filters",
            "Apply these filters to retrieved content:",
            &pretty(&persona.filters),
        ));
    }

    prompt
}

/// Hex blake3 digest of an assembled prompt.
pub fn prompt_digest(prompt: &str) -> String {
    blake3::hash(prompt.as_bytes()).to_hex().to_string()
}

fn section(heading: &str, lead: &str, body: &str) -> String {
    format!("\n\n## {}\n\n{}\n{}\n", heading, lead, body)
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(map: &StructuredMap) -> String {
    // A map of JSON values always serializes.
    serde_json::to_string_pretty(map).unwrap_or_else(|_| "{}".to_string())
}
