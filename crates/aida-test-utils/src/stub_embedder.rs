// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedding adapter for tests.
//!
//! `StubEmbedder` implements `EmbeddingAdapter` without any model: a text
//! either maps to a vector pinned at construction time, or to a vector
//! derived from a hash of the text. Equal texts always embed equally, so
//! tests can reason about distances exactly.

use std::collections::HashMap;

use async_trait::async_trait;

use aida_core::AidaError;
use aida_core::traits::adapter::PluginAdapter;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// An embedding adapter that returns pinned or hash-derived vectors.
pub struct StubEmbedder {
    dim: usize,
    pinned: HashMap<String, Vec<f32>>,
}

impl StubEmbedder {
    /// Create a stub producing vectors of the given dimensionality.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            pinned: HashMap::new(),
        }
    }

    /// Pin an exact text to an exact vector.
    ///
    /// The vector must match the stub's dimensionality.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dim, "pinned vector has wrong dimension");
        self.pinned.insert(text.to_string(), vector);
        self
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.pinned.get(text) {
            return v.clone();
        }
        hash_vector(text, self.dim)
    }
}

/// Derive a unit-length vector from an FNV-1a style hash of the text.
fn hash_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    let mut raw = Vec::with_capacity(dim);
    for i in 0..dim {
        for byte in text.bytes().chain([i as u8]) {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x0000_0100_0000_01b3);
        }
        // Map the hash into [-1, 1).
        raw.push((state >> 11) as f32 / (1u64 << 53) as f32 * 2.0 - 1.0);
    }

    let norm: f32 = raw.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        raw.iter().map(|v| v / norm).collect()
    } else {
        raw
    }
}

#[async_trait]
impl PluginAdapter for StubEmbedder {
    fn name(&self) -> &str {
        "stub-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, AidaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AidaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for StubEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, AidaError> {
        let embeddings = input.texts.iter().map(|t| self.vector_for(t)).collect();
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dim,
        })
    }
}
