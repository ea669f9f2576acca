pub mod contract;
pub mod memory;
pub mod rest;

pub use contract::{EnhancementFilter, PersonaRepository};
pub use memory::{MemoryPersonaRepository, SeedDocument};
pub use rest::RestPersonaRepository;

use crate::config::{RepositoryConfig, RepositoryKind};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Build the repository selected by `config`.
pub fn open(config: &RepositoryConfig) -> Result<Arc<dyn PersonaRepository>> {
    match config.kind {
        RepositoryKind::Rest => Ok(Arc::new(RestPersonaRepository::new(
            &config.url,
            &config.service_key,
            Duration::from_secs(config.timeout_secs),
        )?)),
        RepositoryKind::Memory => match config.seed_file {
            Some(ref path) => Ok(Arc::new(MemoryPersonaRepository::from_file(path)?)),
            None => Ok(Arc::new(MemoryPersonaRepository::new())),
        },
    }
}
