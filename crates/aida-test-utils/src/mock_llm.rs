// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider for deterministic testing.
//!
//! `MockLlm` implements `LlmProvider` with pre-configured responses,
//! enabling fast, CI-runnable tests without a running Ollama server.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use aida_core::AidaError;
use aida_core::traits::adapter::PluginAdapter;
use aida_core::traits::provider::LlmProvider;
use aida_core::types::{AdapterType, HealthStatus};

/// A mock LLM provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned. A failing variant always
/// returns a provider error instead.
pub struct MockLlm {
    responses: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl MockLlm {
    /// Create a mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failing: false,
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failing: false,
        }
    }

    /// Create a mock provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            failing: true,
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Prompts received so far, in call order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockLlm {
    fn name(&self) -> &str {
        "mock-llm"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AidaError> {
        if self.failing {
            Ok(HealthStatus::Unhealthy("configured to fail".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), AidaError> {
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn respond(&self, prompt: &str, _deadline: Duration) -> Result<String, AidaError> {
        self.prompts.lock().await.push(prompt.to_string());
        if self.failing {
            return Err(AidaError::Provider {
                message: "mock provider configured to fail".to_string(),
                source: None,
            });
        }
        Ok(self.next_response().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let llm = MockLlm::new();
        let reply = llm.respond("ciao", Duration::from_secs(1)).await.unwrap();
        assert_eq!(reply, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let llm = MockLlm::with_responses(vec!["prima".to_string(), "seconda".to_string()]);
        let d = Duration::from_secs(1);
        assert_eq!(llm.respond("a", d).await.unwrap(), "prima");
        assert_eq!(llm.respond("b", d).await.unwrap(), "seconda");
        assert_eq!(llm.respond("c", d).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn prompts_are_captured() {
        let llm = MockLlm::new();
        let d = Duration::from_secs(1);
        llm.respond("uno", d).await.unwrap();
        llm.respond("due", d).await.unwrap();
        assert_eq!(llm.prompts().await, vec!["uno", "due"]);
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let llm = MockLlm::failing();
        let err = llm.respond("ciao", Duration::from_secs(1)).await;
        assert!(err.is_err());
    }
}
