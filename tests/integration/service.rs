use crate::support::{seeded_repository, service_with_events};
use persona_forge::events::NoopEventSink;
use persona_forge::persona::{
    CreateAgentRequest, EnhancementFilter, HealthStatus, PersonaFilter, PersonaService,
    ThreadType, AGENT_CREATED_SUBJECT,
};
use persona_forge::PersonaError;
use std::sync::Arc;

#[tokio::test]
async fn create_applies_stored_enhancements_in_priority_order() {
    let (service, mut events) = service_with_events();
    let creation = service
        .create_agent_config(&CreateAgentRequest::new("dev-1").with_context_allocation(0.5))
        .await
        .unwrap();

    let applied: Vec<&str> = creation
        .enhancements_applied
        .iter()
        .map(|e| e.enhancement_id.as_str())
        .collect();
    assert_eq!(applied, vec!["e-unknown", "e-voice", "e-tools", "e-model"]);

    let config = &creation.config;
    assert_eq!(config.model, "claude-opus-4-5");
    assert_eq!(config.tools, vec!["read_file", "search", "shell"]);
    assert_eq!(config.thread_type, ThreadType::Chained);
    assert_eq!(config.grounding_packs, vec!["rust-docs"]);
    assert_eq!(config.context_allocation, 0.5);

    // The voice block became the template, so it replaces the generated opening.
    assert!(config
        .system_prompt
        .starts_with("\n## Voice Persona Settings\n"));
    assert!(config.system_prompt.contains("- Speaking rate: 1.1x\n"));
    assert!(config.system_prompt.contains("## Available Tools"));
    assert!(config.system_prompt.contains("## Knowledge Access"));
    assert!(config.system_prompt.contains("## Retrieval Boosts"));
    assert!(!config.system_prompt.contains("## Content Filters"));

    let event = events.try_recv().unwrap();
    assert_eq!(event.subject, AGENT_CREATED_SUBJECT);
    assert_eq!(event.payload["model"], "claude-opus-4-5");
    assert_eq!(event.payload["enhancements_applied"], 4);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn requested_enhancements_must_exist_for_the_persona() {
    let (service, mut events) = service_with_events();

    let result = service
        .create_agent_config(
            &CreateAgentRequest::new("dev-1").with_enhancements(vec!["does-not-exist".to_string()]),
        )
        .await;
    match result {
        Err(PersonaError::NotFound(message)) => assert!(message.contains("does-not-exist")),
        other => panic!("expected NotFound, got {:?}", other.map(|c| c.enhancements_applied.len())),
    }

    // Another persona's enhancement is not found either.
    let result = service
        .create_agent_config(
            &CreateAgentRequest::new("legacy-1").with_enhancements(vec!["e-model".to_string()]),
        )
        .await;
    assert!(matches!(result, Err(PersonaError::NotFound(_))));
    assert!(events.try_recv().is_err());

    let creation = service
        .create_agent_config(
            &CreateAgentRequest::new("dev-1")
                .with_enhancements(vec!["e-model".to_string(), "e-tools".to_string()]),
        )
        .await
        .unwrap();
    assert_eq!(creation.enhancements_applied.len(), 2);
}

#[tokio::test]
async fn legacy_runtime_rows_normalize() {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));
    let persona = service.get_persona("legacy-1").await.unwrap().unwrap();

    assert_eq!(persona.model_preference, "claude-haiku-4-5");
    assert_eq!(persona.tools_access, vec!["archive"]);
    assert_eq!(persona.nats_subjects, vec!["archive.>"]);
    assert_eq!(persona.behavior_weights.len(), 1);
    assert_eq!(persona.behavior_weights["retrieve"], 0.8);
    assert_eq!(
        persona.system_prompt_template.as_deref(),
        Some("You file everything.")
    );
    assert_eq!(persona.temperature, 0.7);
    assert_eq!(persona.max_tokens, 4096);
    assert_eq!(persona.thread_type, ThreadType::Base);
}

#[tokio::test]
async fn listing_filters_inactive_and_thread_type() {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));

    let active = service.list_personas(&PersonaFilter::default()).await.unwrap();
    assert_eq!(active.len(), 2);

    let all = service
        .list_personas(&PersonaFilter {
            active_only: false,
            thread_type: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let chained = service
        .list_personas(&PersonaFilter {
            active_only: false,
            thread_type: Some(ThreadType::Chained),
        })
        .await
        .unwrap();
    assert_eq!(chained.len(), 1);
    assert_eq!(chained[0].persona_id, "dev-1");
}

#[tokio::test]
async fn enhancement_type_filter() {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));
    let enhancements = service
        .get_enhancements(
            "dev-1",
            &EnhancementFilter::with_types(vec!["tool".to_string(), "voice".to_string()]),
        )
        .await
        .unwrap();
    let ids: Vec<&str> = enhancements
        .iter()
        .map(|e| e.enhancement_id.as_str())
        .collect();
    assert_eq!(ids, vec!["e-tools", "e-voice"]);
}

#[tokio::test]
async fn detail_and_name_lookup() {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));

    let detail = service.persona_detail("dev-1").await.unwrap();
    assert_eq!(detail.persona.name, "Developer");
    assert_eq!(detail.enhancements.len(), 4);

    assert!(matches!(
        service.persona_detail("ghost").await,
        Err(PersonaError::NotFound(_))
    ));

    let archivist = service
        .get_persona_by_name("Archivist", Some("0.9"))
        .await
        .unwrap();
    assert_eq!(archivist.unwrap().persona_id, "legacy-1");
    assert!(service
        .get_persona_by_name("Archivist", None)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn health_counts_personas() {
    let service = PersonaService::new(seeded_repository(), Arc::new(NoopEventSink));
    let report = service.health().await;
    assert_eq!(report.status, HealthStatus::Healthy);
    assert!(report.store_connected);
    assert_eq!(report.total_personas, 3);
}
