//! Config sources beyond files: the `PERSONA_FORGE__` environment overlay and
//! the legacy store variables.

use super::{AppConfig, DEFAULT_NATS_URL};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "PERSONA_FORGE";
pub const LEGACY_URL: &str = "SUPABASE_URL";
pub const LEGACY_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const LEGACY_NATS_URL: &str = "NATS_URL";

/// `PERSONA_FORGE__REPOSITORY__URL` style variables, `__` between sections.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}

/// Fill empty store and bus settings from the legacy variables.
pub fn apply_legacy(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let fill = |slot: &mut String, var: &str| {
        if slot.trim().is_empty() {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    };
    fill(&mut config.repository.url, LEGACY_URL);
    fill(&mut config.repository.service_key, LEGACY_SERVICE_KEY);
    fill(&mut config.events.nats_url, LEGACY_NATS_URL);

    if config.events.nats_url.is_empty() {
        config.events.nats_url = DEFAULT_NATS_URL.to_string();
    }
}
