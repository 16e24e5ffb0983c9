use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// An LLM endpoint prompts can be tested against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EndpointDescriptor {
    /// Unique display name (e.g. "local-llama")
    pub name: String,
    /// URL the rendered prompt is POSTed to
    pub url: String,
    /// Model identifier sent along with the prompt
    pub model: String,
    pub description: String,
}

/// Layout of the endpoints configuration file
#[derive(Debug, Deserialize)]
struct EndpointsFile {
    llm_endpoints: Vec<EndpointDescriptor>,
}

/// Errors raised while loading the endpoint configuration at startup
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read endpoint config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed endpoint config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid endpoint entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// Immutable list of configured endpoints, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: Vec<EndpointDescriptor>,
}

impl EndpointRegistry {
    pub fn new(endpoints: Vec<EndpointDescriptor>) -> std::result::Result<Self, RegistryError> {
        let mut seen = HashSet::new();

        for (index, endpoint) in endpoints.iter().enumerate() {
            let invalid = |reason: String| RegistryError::InvalidEntry {
                index: index + 1,
                reason,
            };

            for (field, value) in [
                ("name", &endpoint.name),
                ("url", &endpoint.url),
                ("model", &endpoint.model),
                ("description", &endpoint.description),
            ] {
                if value.trim().is_empty() {
                    return Err(invalid(format!("'{}' must not be empty", field)));
                }
            }

            let url = Url::parse(&endpoint.url)
                .map_err(|e| invalid(format!("invalid url '{}': {}", endpoint.url, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(format!(
                    "url '{}' must use http or https",
                    endpoint.url
                )));
            }

            if !seen.insert(endpoint.name.as_str()) {
                return Err(invalid(format!(
                    "duplicate endpoint name '{}'",
                    endpoint.name
                )));
            }
        }

        Ok(Self { endpoints })
    }

    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, RegistryError> {
        let file: EndpointsFile = serde_yaml::from_str(raw)?;
        Self::new(file.llm_endpoints)
    }

    pub fn load(path: &Path) -> std::result::Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_yaml_str(&raw)?;
        tracing::debug!(
            "Loaded endpoints from {}: {:?}",
            path.display(),
            registry.names()
        );
        Ok(registry)
    }

    pub fn list_endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    pub fn get_endpoint(&self, name: &str) -> Result<&EndpointDescriptor> {
        self.endpoints
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Endpoint '{}' not found", name)))
    }

    pub fn names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const VALID: &str = r#"
llm_endpoints:
  - name: local-llama
    url: http://localhost:8000/generate
    model: llama-3.1-8b
    description: Llama served locally
  - name: hosted
    url: https://llm.example.com/v1/generate
    model: big-model
    description: Hosted model
"#;

    #[test]
    fn test_load_valid_config() {
        let registry = assert_ok!(EndpointRegistry::from_yaml_str(VALID));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["local-llama", "hosted"]);

        let hosted = registry.get_endpoint("hosted").unwrap();
        assert_eq!(hosted.model, "big-model");
    }

    #[test]
    fn test_unknown_endpoint_is_not_found() {
        let registry = EndpointRegistry::from_yaml_str(VALID).unwrap();
        assert!(matches!(
            registry.get_endpoint("missing"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_field_fails() {
        let raw = r#"
llm_endpoints:
  - name: no-model
    url: http://localhost:8000
    description: missing model
"#;
        let err = assert_err!(EndpointRegistry::from_yaml_str(raw));
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn test_duplicate_names_fail() {
        let raw = r#"
llm_endpoints:
  - { name: a, url: "http://x.test", model: m, description: d }
  - { name: a, url: "http://y.test", model: m, description: d }
"#;
        let err = assert_err!(EndpointRegistry::from_yaml_str(raw));
        assert!(matches!(err, RegistryError::InvalidEntry { index: 2, .. }));
    }

    #[test]
    fn test_bad_urls_fail() {
        for url in ["not a url", "ftp://files.test/x"] {
            let endpoints = vec![EndpointDescriptor {
                name: "bad".to_string(),
                url: url.to_string(),
                model: "m".to_string(),
                description: "d".to_string(),
            }];
            assert_err!(EndpointRegistry::new(endpoints));
        }
    }

    #[test]
    fn test_blank_field_fails() {
        let endpoints = vec![EndpointDescriptor {
            name: "   ".to_string(),
            url: "http://x.test".to_string(),
            model: "m".to_string(),
            description: "d".to_string(),
        }];
        assert_err!(EndpointRegistry::new(endpoints));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = assert_err!(EndpointRegistry::load(Path::new(
            "/definitely/not/here/config.yaml"
        )));
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
