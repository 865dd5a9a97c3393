// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama LLM provider adapter.
//!
//! Talks to a local Ollama server's `/api/generate` endpoint with
//! non-streaming requests. The server process itself is managed outside
//! this crate; the adapter only reports whether it is reachable.

pub mod provider;
pub mod types;

pub use provider::OllamaProvider;
