//! XDG config locations.

use crate::error::{PersonaError, Result};
use std::path::PathBuf;

pub const APP_DIR: &str = "persona-forge";

/// `$XDG_CONFIG_HOME`, or `$HOME/.config`.
pub fn config_home() -> Result<PathBuf> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        PersonaError::ConfigurationError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/persona-forge/config.toml`
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_home()?.join(APP_DIR).join("config.toml"))
}
