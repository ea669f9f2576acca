//! Logging System
//!
//! Structured logging through `tracing`. Level, format, and destination come
//! from the `[logging]` config section, with `PERSONA_FORGE_LOG*` environment
//! variables taking precedence.

use crate::error::{PersonaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const ENV_LOG: &str = "PERSONA_FORGE_LOG";
pub const ENV_LOG_FORMAT: &str = "PERSONA_FORGE_LOG_FORMAT";
pub const ENV_LOG_OUTPUT: &str = "PERSONA_FORGE_LOG_OUTPUT";
pub const ENV_LOG_FILE: &str = "PERSONA_FORGE_LOG_FILE";
pub const ENV_LOG_MODULES: &str = "PERSONA_FORGE_LOG_MODULES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(PersonaError::ConfigurationError(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr.
    #[serde(rename = "both")]
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(PersonaError::ConfigurationError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            ))),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
            LogOutput::Both => "both",
        };
        f.write_str(s)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file when output includes a file; None means the state-dir default.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream.
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module level overrides, e.g. `persona_forge::persona = "debug"`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Resolve the log file path: CLI flag, then `PERSONA_FORGE_LOG_FILE`, then
/// config, then the platform state directory.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf> {
    let env_file = std::env::var(ENV_LOG_FILE).ok().map(PathBuf::from);
    [cli_file, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
        .map(Ok)
        .unwrap_or_else(default_log_file_path)
}

fn default_log_file_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "persona-forge").ok_or_else(|| {
        PersonaError::ConfigurationError(
            "Could not determine platform directories for log file".to_string(),
        )
    })?;
    // macOS and Windows have no state dir.
    let dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("persona-forge.log"))
}

/// Install the global subscriber.
///
/// Precedence, highest first: environment variables, the given config,
/// defaults. Returns an error if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<()> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| PersonaError::ConfigurationError(e.to_string()));
    }

    let filter = build_env_filter(config)?;
    let format = match std::env::var(ENV_LOG_FORMAT) {
        Ok(value) => value.parse()?,
        Err(_) => config.format,
    };
    let output = match std::env::var(ENV_LOG_OUTPUT) {
        Ok(value) => value.parse()?,
        Err(_) => config.output,
    };
    let writer = make_writer(output, config.file.clone())?;
    let ansi = config.color && !output.writes_file();

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339());
    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry.with(layer.json().with_writer(writer)).try_init(),
        LogFormat::Text => registry
            .with(layer.with_ansi(ansi).with_writer(writer))
            .try_init(),
    };
    installed.map_err(|e| PersonaError::ConfigurationError(e.to_string()))
}

fn make_writer(output: LogOutput, file: Option<PathBuf>) -> Result<BoxMakeWriter> {
    Ok(match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(file)?),
        LogOutput::FileAndStderr => {
            BoxMakeWriter::new(open_log_file(file)?.and(std::io::stderr))
        }
    })
}

fn open_log_file(configured: Option<PathBuf>) -> Result<Arc<std::fs::File>> {
    let path = resolve_log_file_path(None, configured)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PersonaError::ConfigurationError(format!("Failed to create log directory: {}", e))
        })?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            PersonaError::ConfigurationError(format!(
                "Failed to open log file {}: {}",
                path.display(),
                e
            ))
        })?;
    Ok(Arc::new(file))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_LOG) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let env_modules = std::env::var(ENV_LOG_MODULES).unwrap_or_default();
    let directives = config
        .modules
        .iter()
        .map(|(module, level)| format!("{}={}", module, level))
        .chain(
            env_modules
                .split(',')
                .filter_map(|pair| pair.split_once('='))
                .map(|(module, level)| format!("{}={}", module.trim(), level.trim())),
        );

    let mut filter = EnvFilter::new(&config.level);
    for directive in directives {
        let parsed = directive.parse::<Directive>().map_err(|e| {
            PersonaError::ConfigurationError(format!("Invalid log directive '{}': {}", directive, e))
        })?;
        filter = filter.add_directive(parsed);
    }
    Ok(filter)
}
