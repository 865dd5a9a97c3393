// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::AidaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for generating dense vector embeddings from text.
///
/// Embedding adapters power the semantic memory and the embedding stage of
/// the hybrid command dispatcher. Implementations must be deterministic for
/// a fixed model revision; empty input strings produce a defined (if
/// semantically unhelpful) vector rather than an error.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates one embedding per input text, in input order.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, AidaError>;
}
