// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every pluggable component implements [`PluginAdapter`] plus one of the
//! per-concern traits ([`EmbeddingAdapter`], [`LlmProvider`]). Command
//! handlers are simpler and only implement [`CommandHandler`].

pub mod adapter;
pub mod command;
pub mod embedding;
pub mod provider;

pub use adapter::PluginAdapter;
pub use command::CommandHandler;
pub use embedding::EmbeddingAdapter;
pub use provider::LlmProvider;
