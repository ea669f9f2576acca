//! PostgREST persona store.
//!
//! Reads the `personas` and `persona_enhancements` tables through the REST
//! interface. Every request carries the service key as both `apikey` and
//! bearer token.

use super::contract::{EnhancementFilter, PersonaRepository};
use crate::error::{PersonaError, Result};
use crate::types::Row;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PERSONAS_TABLE: &str = "personas";
const ENHANCEMENTS_TABLE: &str = "persona_enhancements";

pub struct RestPersonaRepository {
    client: reqwest::Client,
    base_url: String,
}

impl RestPersonaRepository {
    /// Build a client for `base_url`. Fails when the URL or key is empty.
    pub fn new(base_url: &str, service_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(PersonaError::ConfigurationError(
                "Persona store URL must be configured".to_string(),
            ));
        }
        if service_key.trim().is_empty() {
            return Err(PersonaError::ConfigurationError(
                "Persona store service key must be configured".to_string(),
            ));
        }

        let header = |value: String| {
            HeaderValue::from_str(&value).map_err(|e| {
                PersonaError::ConfigurationError(format!("Invalid service key: {}", e))
            })
        };
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header(service_key.to_string())?);
        headers.insert(AUTHORIZATION, header(format!("Bearer {}", service_key))?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                PersonaError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn fetch_rows(&self, table: &str, params: &[(&str, String)]) -> Result<Vec<Row>> {
        let url = self.endpoint(table);
        debug!(url = %url, params = ?params, "Querying persona store");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Persona store request failed");
                PersonaError::RepositoryUnavailable(format!("Request to {} failed: {}", table, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PersonaError::RepositoryUnavailable(format!(
                "Persona store error ({}) on {}: {}",
                status, table, error_text
            )));
        }

        response.json::<Vec<Row>>().await.map_err(|e| {
            PersonaError::RepositoryUnavailable(format!(
                "Failed to parse {} response: {}",
                table, e
            ))
        })
    }
}

/// PostgREST `in.(a,b)` list.
fn in_list(values: &[String]) -> String {
    format!("in.({})", values.join(","))
}

#[async_trait]
impl PersonaRepository for RestPersonaRepository {
    async fn get_by_id(&self, persona_id: &str) -> Result<Option<Row>> {
        let rows = self
            .fetch_rows(
                PERSONAS_TABLE,
                &[
                    ("persona_id", format!("eq.{}", persona_id)),
                    ("select", "*".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_by_name_version(&self, name: &str, version: &str) -> Result<Option<Row>> {
        let rows = self
            .fetch_rows(
                PERSONAS_TABLE,
                &[
                    ("name", format!("eq.{}", name)),
                    ("version", format!("eq.{}", version)),
                    ("select", "*".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Row>> {
        let mut params = vec![("select", "*".to_string())];
        if active_only {
            params.push(("is_active", "eq.true".to_string()));
        }
        self.fetch_rows(PERSONAS_TABLE, &params).await
    }

    async fn get_enhancements(
        &self,
        persona_id: &str,
        filter: &EnhancementFilter,
    ) -> Result<Vec<Row>> {
        let mut params = vec![
            ("persona_id", format!("eq.{}", persona_id)),
            ("select", "*".to_string()),
            ("order", "priority.desc".to_string()),
        ];
        if let Some(types) = filter.types.as_deref().filter(|t| !t.is_empty()) {
            params.push(("enhancement_type", in_list(types)));
        }
        if let Some(ids) = filter.ids.as_deref().filter(|i| !i.is_empty()) {
            params.push(("enhancement_id", in_list(ids)));
        }
        self.fetch_rows(ENHANCEMENTS_TABLE, &params).await
    }
}
