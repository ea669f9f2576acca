//! Human-readable output for CLI commands.

use crate::config::AppConfig;
use crate::persona::{
    AgentCreation, HealthReport, HealthStatus, PersonaConfig, PersonaDetail, PersonaEnhancement,
    ThreadType,
};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Bold, underlined section heading.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

pub fn format_persona_list(personas: &[PersonaConfig]) -> String {
    if personas.is_empty() {
        return "No personas found.".to_string();
    }
    let mut t = table(vec!["ID", "Name", "Version", "Thread", "Model"]);
    for p in personas {
        t.add_row(vec![
            p.persona_id.clone(),
            p.name.clone(),
            p.version.clone(),
            p.thread_type.to_string(),
            p.model_preference.clone(),
        ]);
    }
    format!("{}\n{} persona(s)", t, personas.len())
}

pub fn format_persona(persona: &PersonaConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} v{}", persona.name, persona.version))
    ));
    out.push_str(&format!("  ID: {}\n", persona.persona_id));
    if !persona.description.is_empty() {
        out.push_str(&format!("  Description: {}\n", persona.description));
    }
    out.push_str(&format!("  Thread type: {}\n", persona.thread_type));
    out.push_str(&format!("  Model: {}\n", persona.model_preference));
    out.push_str(&format!("  Temperature: {}\n", persona.temperature));
    out.push_str(&format!("  Max tokens: {}\n", persona.max_tokens));
    out.push_str(&format!("  Tools: {}\n", join_or_dash(&persona.tools_access)));
    out.push_str(&format!("  Subjects: {}\n", join_or_dash(&persona.nats_subjects)));
    out.push_str(&format!("  Packs: {}\n", join_or_dash(&persona.default_packs)));

    let mut weights = table(vec!["Behavior", "Weight"]);
    for (behavior, weight) in &persona.behavior_weights {
        weights.add_row(vec![behavior.clone(), format!("{:.2}", weight)]);
    }
    out.push_str(&format!("\n{}\n", weights));
    out
}

pub fn format_enhancements(enhancements: &[PersonaEnhancement]) -> String {
    if enhancements.is_empty() {
        return "No enhancements found.".to_string();
    }
    let mut t = table(vec!["ID", "Type", "Name", "Priority"]);
    for e in enhancements {
        t.add_row(vec![
            e.enhancement_id.clone(),
            e.enhancement_type().to_string(),
            e.enhancement_name.clone(),
            e.priority.to_string(),
        ]);
    }
    t.to_string()
}

pub fn format_persona_detail(detail: &PersonaDetail) -> String {
    format!(
        "{}\n{}\n\n{}",
        format_persona(&detail.persona),
        format_section_heading("Enhancements"),
        format_enhancements(&detail.enhancements)
    )
}

pub fn format_creation(creation: &AgentCreation) -> String {
    let config = &creation.config;
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading("Agent Configuration")
    ));
    out.push_str(&format!("  Name: {}\n", config.name));
    out.push_str(&format!("  Persona: {}\n", config.persona_id));
    out.push_str(&format!("  Thread type: {}\n", config.thread_type));
    out.push_str(&format!("  Model: {}\n", config.model));
    out.push_str(&format!("  Temperature: {}\n", config.temperature));
    out.push_str(&format!("  Max tokens: {}\n", config.max_tokens));
    out.push_str(&format!("  Context allocation: {}\n", config.context_allocation));
    if let Some(ref parent) = config.parent_agent_id {
        out.push_str(&format!("  Parent agent: {}\n", parent));
    }
    out.push_str(&format!("  Tools: {}\n", join_or_dash(&config.tools)));
    out.push_str(&format!(
        "  Subscriptions: {}\n",
        join_or_dash(&config.nats_subscriptions)
    ));

    if !creation.enhancements_applied.is_empty() {
        out.push_str(&format!(
            "\n{}\n\n{}\n",
            format_section_heading("Applied Enhancements"),
            format_enhancements(&creation.enhancements_applied)
        ));
    }

    out.push_str(&format!(
        "\n{}\n\n{}\n\n  Digest: {}\n",
        format_section_heading("System Prompt"),
        config.system_prompt,
        creation.prompt_digest
    ));
    out
}

pub fn format_thread_types() -> String {
    let mut t = table(vec!["Type", "Description", "Use case", "Coordination"]);
    for thread_type in ThreadType::ALL {
        t.add_row(vec![
            thread_type.as_str(),
            thread_type.description(),
            thread_type.use_case(),
            thread_type.coordination(),
        ]);
    }
    t.to_string()
}

pub fn format_health(report: &HealthReport, config: &AppConfig) -> String {
    let status = match report.status {
        HealthStatus::Healthy => format!("{}", "healthy".green()),
        HealthStatus::Degraded => format!("{}", "degraded".yellow()),
        HealthStatus::Unhealthy => format!("{}", "unhealthy".red()),
    };
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Persona Store")));
    out.push_str(&format!("  Status: {}\n", status));
    out.push_str(&format!("  Store: {}\n", config.repository.kind.as_str()));
    out.push_str(&format!(
        "  Connected: {}\n",
        if report.store_connected { "yes" } else { "no" }
    ));
    out.push_str(&format!("  Personas: {}\n", report.total_personas));
    if report.invalid_personas > 0 {
        out.push_str(&format!("  Invalid rows: {}\n", report.invalid_personas));
    }
    if let Some(ref error) = report.error {
        out.push_str(&format!("  Error: {}\n", error));
    }
    out.push_str(&format!("  Event bus: {}\n", config.events.nats_url));
    out.push_str(&format!("  Checked at: {}\n", report.timestamp.to_rfc3339()));
    out
}
