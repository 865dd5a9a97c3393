// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for LLM text generation backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AidaError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for LLM text generation.
///
/// A single non-streaming call: prompt in, reply text out. The deadline is
/// caller-supplied; implementations return [`AidaError::Timeout`] when it
/// elapses so the router can surface a tier-3 failure without mutating
/// memory.
#[async_trait]
pub trait LlmProvider: PluginAdapter {
    /// Sends a prompt and returns the generated reply.
    async fn respond(&self, prompt: &str, deadline: Duration) -> Result<String, AidaError>;
}
