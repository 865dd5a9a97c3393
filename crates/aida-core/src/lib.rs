// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Aida assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Aida workspace. The embedding provider,
//! the LLM provider, and the command handlers all implement traits defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AidaError;
pub use types::{AdapterType, HealthStatus, Interaction, Notification, Tier};

// Re-export all adapter traits at crate root.
pub use traits::{CommandHandler, EmbeddingAdapter, LlmProvider, PluginAdapter};
