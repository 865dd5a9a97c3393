// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client and `LlmProvider` implementation for a local Ollama server.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use aida_config::OllamaConfig;
use aida_core::AidaError;
use aida_core::traits::adapter::PluginAdapter;
use aida_core::traits::provider::LlmProvider;
use aida_core::types::{AdapterType, HealthStatus};

use crate::types::{GenerateRequest, GenerateResponse};

/// LLM provider backed by Ollama's non-streaming generate endpoint.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Result<Self, AidaError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AidaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// True when the Ollama server answers on its base URL.
    pub async fn is_running(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, AidaError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AidaError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "generate response received");

        // A non-200 status is relayed to the user as a reply, not raised.
        if !status.is_success() {
            warn!(status = %status, "generation request rejected");
            return Ok(format!("Errore nella generazione: {}", status.as_u16()));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| AidaError::Provider {
            message: format!("malformed generate response: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(body.response.trim().to_string())
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AidaError> {
        if self.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!(
                "Ollama server not reachable at {}",
                self.base_url
            )))
        }
    }

    async fn shutdown(&self) -> Result<(), AidaError> {
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn respond(&self, prompt: &str, deadline: Duration) -> Result<String, AidaError> {
        match tokio::time::timeout(deadline, self.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AidaError::Timeout { duration: deadline }),
        }
    }
}
