// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aida integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests that
//! need neither the ONNX model nor a running Ollama server.
//!
//! # Components
//!
//! - [`StubEmbedder`] - deterministic embedding adapter with optional pinned vectors
//! - [`MockLlm`] - mock LLM provider with pre-configured responses

pub mod mock_llm;
pub mod stub_embedder;

pub use mock_llm::MockLlm;
pub use stub_embedder::StubEmbedder;
