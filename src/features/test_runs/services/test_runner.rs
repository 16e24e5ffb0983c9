//! Fan-out of one rendered prompt to several LLM endpoints.
//!
//! Each selected endpoint gets exactly one request, all issued concurrently.
//! A failing endpoint only affects its own result; the call as a whole never
//! fails because of an endpoint.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::endpoints::{EndpointDescriptor, EndpointRegistry};
use crate::shared::constants::MAX_ENDPOINTS;

/// Why a single endpoint call produced no response body
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {detail}")]
    Connection { detail: String },

    #[error("Endpoint returned HTTP {status}")]
    Http { status: u16, body: String },
}

/// Outcome of calling one endpoint. Exactly one of `response` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointResult {
    pub endpoint_name: String,
    pub model: String,
    pub elapsed_ms: u64,
    pub response: Option<String>,
    pub error: Option<EndpointError>,
}

impl EndpointResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Serialize)]
struct EndpointRequest<'a> {
    prompt: &'a str,
    model: &'a str,
}

/// Pick the text shown for a response: the `response` field of a JSON
/// object when it is a string, the raw body otherwise.
fn display_body(raw: String) -> String {
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => match map.get("response") {
            Some(Value::String(text)) => text.clone(),
            _ => raw,
        },
        _ => raw,
    }
}

fn classify(err: reqwest::Error) -> EndpointError {
    if err.is_timeout() {
        EndpointError::Timeout
    } else {
        EndpointError::Connection {
            detail: err.to_string(),
        }
    }
}

pub struct TestRunner {
    registry: Arc<EndpointRegistry>,
    http_client: reqwest::Client,
}

impl TestRunner {
    /// `request_timeout` bounds each endpoint call, body included.
    pub fn new(registry: Arc<EndpointRegistry>, request_timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            registry,
            http_client,
        })
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Resolve endpoint names against the registry.
    ///
    /// Between 1 and [`MAX_ENDPOINTS`] distinct names are accepted.
    pub fn select_endpoints(&self, names: &[String]) -> Result<Vec<EndpointDescriptor>> {
        if names.is_empty() {
            return Err(AppError::Validation(
                "Select at least one endpoint".to_string(),
            ));
        }
        if names.len() > MAX_ENDPOINTS {
            return Err(AppError::Validation(format!(
                "At most {} endpoints can be tested at once",
                MAX_ENDPOINTS
            )));
        }

        let mut seen = HashSet::new();
        names
            .iter()
            .map(|name| {
                if !seen.insert(name.as_str()) {
                    return Err(AppError::Validation(format!(
                        "Endpoint '{}' selected more than once",
                        name
                    )));
                }
                self.registry.get_endpoint(name).cloned()
            })
            .collect()
    }

    /// Send `rendered_prompt` to every endpoint and collect one result per
    /// endpoint, ordered by endpoint name.
    pub async fn run_test(
        &self,
        rendered_prompt: &str,
        endpoints: &[EndpointDescriptor],
    ) -> Result<Vec<EndpointResult>> {
        if endpoints.is_empty() || endpoints.len() > MAX_ENDPOINTS {
            return Err(AppError::Validation(format!(
                "Between 1 and {} endpoints must be selected",
                MAX_ENDPOINTS
            )));
        }

        tracing::info!(
            "Running prompt test against {} endpoint(s)",
            endpoints.len()
        );

        let mut results = join_all(
            endpoints
                .iter()
                .map(|endpoint| self.call_endpoint(rendered_prompt, endpoint)),
        )
        .await;
        results.sort_by(|a, b| a.endpoint_name.cmp(&b.endpoint_name));

        Ok(results)
    }

    async fn call_endpoint(&self, prompt: &str, endpoint: &EndpointDescriptor) -> EndpointResult {
        let started = Instant::now();
        let outcome = self.send(prompt, endpoint).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => tracing::info!(
                "Endpoint '{}' answered in {}ms",
                endpoint.name,
                elapsed_ms
            ),
            Err(e) => tracing::warn!(
                "Endpoint '{}' failed after {}ms: {}",
                endpoint.name,
                elapsed_ms,
                e
            ),
        }

        let (response, error) = match outcome {
            Ok(body) => (Some(body), None),
            Err(e) => (None, Some(e)),
        };

        EndpointResult {
            endpoint_name: endpoint.name.clone(),
            model: endpoint.model.clone(),
            elapsed_ms,
            response,
            error,
        }
    }

    async fn send(
        &self,
        prompt: &str,
        endpoint: &EndpointDescriptor,
    ) -> std::result::Result<String, EndpointError> {
        let response = self
            .http_client
            .post(&endpoint.url)
            .json(&EndpointRequest {
                prompt,
                model: &endpoint.model,
            })
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            return Err(EndpointError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(display_body(body))
    }
}
