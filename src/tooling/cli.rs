//! CLI Tooling
//!
//! Command-line interface over the persona service. Every command returns its
//! rendered output as a string; the binary only prints it.

use crate::config::{AppConfig, RepositoryKind};
use crate::error::{PersonaError, Result};
use crate::events;
use crate::persona::repository;
use crate::persona::{
    CreateAgentRequest, EnhancementFilter, Overrides, PersonaFilter, PersonaService, ThreadType,
};
use crate::tooling::format::{
    format_creation, format_enhancements, format_health, format_persona, format_persona_detail,
    format_persona_list, format_thread_types,
};
use crate::types::StructuredMap;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Persona Forge CLI - compose agent configurations from stored personas
#[derive(Parser)]
#[command(name = "persona-forge")]
#[command(about = "Compose agent configurations from stored personas and enhancements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read personas from a JSON, YAML or TOML seed file instead of the store
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List personas
    List {
        /// Include inactive personas
        #[arg(long)]
        all: bool,
        /// Only personas with this thread type
        #[arg(long)]
        thread_type: Option<ThreadType>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show a persona and its enhancements
    Get {
        persona_id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Look up a persona by name and version
    GetByName {
        name: String,
        /// Persona version (default: 1.0)
        #[arg(long)]
        version: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List a persona's enhancements, highest priority first
    Enhancements {
        persona_id: String,
        /// Only enhancements of this type (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Build an agent configuration from a persona
    Create {
        persona_id: String,
        /// Share of the parent's context window (0.0-1.0)
        #[arg(long, default_value_t = 0.3)]
        context_allocation: f64,
        /// Parent agent id
        #[arg(long)]
        parent: Option<String>,
        /// Apply only these enhancements (repeatable)
        #[arg(long = "enhancement")]
        enhancements: Vec<String>,
        /// Override model, temperature, max_tokens or tools (key=value, repeatable)
        #[arg(long = "set")]
        overrides: Vec<String>,
        /// Do not publish the created event
        #[arg(long)]
        no_event: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Describe the supported thread types
    ThreadTypes {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Check persona store connectivity
    Health {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Cli {
    /// Fold logging flags into the loaded config.
    pub fn apply_logging_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(ref format) = self.log_format {
            config.logging.format = format.parse()?;
        }
        if let Some(ref output) = self.log_output {
            config.logging.output = output.parse()?;
        }
        if let Some(ref file) = self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(())
    }

    /// `--seed` switches to the in-memory store.
    pub fn apply_store_overrides(&self, config: &mut AppConfig) {
        if let Some(ref seed) = self.seed {
            config.repository.kind = RepositoryKind::Memory;
            config.repository.seed_file = Some(seed.clone());
        }
    }
}

/// CLI context owning the runtime and the service.
pub struct CliContext {
    runtime: tokio::runtime::Runtime,
    service: PersonaService,
    config: AppConfig,
}

impl CliContext {
    /// Build the store and event sink named by `config`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let repository = repository::open(&config.repository)?;
        let sink = events::sink_for(&config.events);
        info!(
            store = config.repository.kind.as_str(),
            nats_url = %config.events.nats_url,
            "Persona service ready"
        );
        Self::with_service(PersonaService::new(repository, sink), config)
    }

    pub fn with_service(service: PersonaService, config: AppConfig) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            runtime,
            service,
            config,
        })
    }

    pub fn service(&self) -> &PersonaService {
        &self.service
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String> {
        let service = &self.service;
        match command {
            Commands::List {
                all,
                thread_type,
                format,
            } => {
                let filter = PersonaFilter {
                    active_only: !*all,
                    thread_type: *thread_type,
                };
                let personas = self.runtime.block_on(service.list_personas(&filter))?;
                render(*format, &personas, || format_persona_list(&personas))
            }
            Commands::Get { persona_id, format } => {
                let detail = self.runtime.block_on(service.persona_detail(persona_id))?;
                render(*format, &detail, || format_persona_detail(&detail))
            }
            Commands::GetByName {
                name,
                version,
                format,
            } => {
                let persona = self
                    .runtime
                    .block_on(service.get_persona_by_name(name, version.as_deref()))?
                    .ok_or_else(|| {
                        PersonaError::NotFound(format!(
                            "persona {}@{}",
                            name,
                            version.as_deref().unwrap_or(crate::persona::DEFAULT_VERSION)
                        ))
                    })?;
                render(*format, &persona, || format_persona(&persona))
            }
            Commands::Enhancements {
                persona_id,
                types,
                format,
            } => {
                let filter = EnhancementFilter {
                    types: (!types.is_empty()).then(|| types.clone()),
                    ids: None,
                };
                let enhancements = self
                    .runtime
                    .block_on(service.get_enhancements(persona_id, &filter))?;
                render(*format, &enhancements, || {
                    format_enhancements(&enhancements)
                })
            }
            Commands::Create {
                persona_id,
                context_allocation,
                parent,
                enhancements,
                overrides,
                no_event,
                format,
            } => {
                let mut request = CreateAgentRequest::new(persona_id.clone())
                    .with_context_allocation(*context_allocation);
                if let Some(parent) = parent {
                    request = request.with_parent(parent.clone());
                }
                if !enhancements.is_empty() {
                    request = request.with_enhancements(enhancements.clone());
                }
                let overrides = parse_overrides(overrides)?;
                if !overrides.is_empty() {
                    request = request.with_overrides(overrides);
                }
                if *no_event {
                    request = request.without_event();
                }

                let creation = self.runtime.block_on(service.create_agent_config(&request))?;
                render(*format, &creation, || format_creation(&creation))
            }
            Commands::ThreadTypes { format } => {
                let catalogue: Vec<Value> = ThreadType::ALL
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": t.as_str(),
                            "description": t.description(),
                            "use_case": t.use_case(),
                            "coordination": t.coordination(),
                        })
                    })
                    .collect();
                render(*format, &catalogue, format_thread_types)
            }
            Commands::Health { format } => {
                let report = self.runtime.block_on(service.health());
                render(*format, &report, || {
                    format_health(&report, &self.config)
                })
            }
        }
    }
}

fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(text()),
    }
}

/// Parse repeated `key=value` pairs into overrides.
///
/// Values are read as JSON when they parse (`0.9`, `["a","b"]`), otherwise as
/// plain strings. `tools=a,b` is accepted as a comma list.
pub fn parse_overrides(pairs: &[String]) -> Result<Overrides> {
    let mut map = StructuredMap::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            PersonaError::InvalidRequest(format!("Override must be key=value, got '{}'", pair))
        })?;
        let key = key.trim();
        let raw = raw.trim();
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(_) if key == "tools" => Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| Value::String(t.to_string()))
                    .collect(),
            ),
            Err(_) => Value::String(raw.to_string()),
        };
        map.insert(key.to_string(), value);
    }
    Overrides::from_map(&map)
}
