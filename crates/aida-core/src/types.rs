// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Aida workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The stage of the router that produced a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Hybrid command dispatcher (keyword rules or embedding match).
    Semantic,
    /// Substring-keyword dispatcher.
    Traditional,
    /// LLM fallback with retrieved context.
    Llm,
    /// Correction side-channel; never enters the tier pipeline.
    Correction,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Embedding,
    Provider,
    Command,
}

/// One user/assistant exchange in the interaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// What the user said, verbatim.
    pub user: String,
    /// The assistant's reply.
    pub ai: String,
}

/// An asynchronous message from a command handler back to the transport
/// (e.g. "timer done"). Delivered over a one-way channel so handlers never
/// hold a reference to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

impl EmbeddingInput {
    /// Convenience constructor for a single text.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
        }
    }
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    /// One vector per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// Dimensionality of every vector.
    pub dimensions: usize,
}

impl EmbeddingOutput {
    /// Consume the output and return the first vector, if any.
    pub fn into_single(self) -> Option<Vec<f32>> {
        self.embeddings.into_iter().next()
    }
}
