//! Layered config loading.

use super::paths;
use super::sources;
use super::AppConfig;
use crate::error::{PersonaError, Result};
use config::{Config, File, FileFormat};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load with precedence, lowest first: defaults, the global config file
    /// (or `explicit` when given), `PERSONA_FORGE__*` variables, legacy
    /// variables for values still empty.
    ///
    /// A missing global file is fine; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
        Self::load_with(explicit, |name| std::env::var(name).ok())
    }

    pub(crate) fn load_with(
        explicit: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<AppConfig> {
        let mut builder = Config::builder();

        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(PersonaError::ConfigurationError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "Loading config file");
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Ok(global) = paths::global_config_path() {
                    debug!(path = %global.display(), "Loading global config if present");
                    builder = builder.add_source(
                        File::from(global.as_path())
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let builder = sources::add_environment(builder);
        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        sources::apply_legacy(&mut config, lookup);
        Ok(config)
    }
}
