use persona_forge::events::{ChannelEventSink, PublishedEvent};
use persona_forge::persona::{MemoryPersonaRepository, PersonaService, SeedDocument};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/personas.yaml")
}

pub fn seeded_repository() -> Arc<MemoryPersonaRepository> {
    let seed = SeedDocument::from_file(&fixture_path()).unwrap();
    Arc::new(MemoryPersonaRepository::from_seed(seed))
}

pub fn service_with_events() -> (PersonaService, UnboundedReceiver<PublishedEvent>) {
    let (sink, receiver) = ChannelEventSink::new();
    (
        PersonaService::new(seeded_repository(), Arc::new(sink)),
        receiver,
    )
}
