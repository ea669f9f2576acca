//! Configuration
//!
//! Settings for the persona store, event publication, and logging. Loaded in
//! layers by [`ConfigLoader`]: defaults, a TOML file, `PERSONA_FORGE__*`
//! environment variables, then the legacy store variables.

pub mod loader;
pub mod paths;
pub mod sources;

pub use loader::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub repository: RepositoryConfig,
    pub events: EventsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryKind {
    /// PostgREST endpoint.
    #[default]
    Rest,
    /// In-process rows, optionally seeded from `seed_file`.
    Memory,
}

impl RepositoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryKind::Rest => "rest",
            RepositoryKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub kind: RepositoryKind,
    pub url: String,
    pub service_key: String,
    pub timeout_secs: u64,
    pub seed_file: Option<PathBuf>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            kind: RepositoryKind::Rest,
            url: String::new(),
            service_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSinkKind {
    /// Structured log line per event.
    #[default]
    Log,
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub sink: EventSinkKind,
    /// Message bus the runtime listens on; reported, not connected to.
    pub nats_url: String,
}
