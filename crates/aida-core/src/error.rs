// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aida assistant.

use thiserror::Error;

/// The primary error type used across all Aida components.
#[derive(Debug, Error)]
pub enum AidaError {
    /// Configuration errors (invalid TOML, out-of-range values, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// Semantic memory errors (index I/O, mapping corruption, id conflicts).
    #[error("memory error: {source}")]
    Memory {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (endpoint unreachable, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AidaError {
    /// Wrap an arbitrary error as a memory error.
    pub fn memory<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AidaError::Memory {
            source: Box::new(source),
        }
    }
}
