// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic memory for the Aida assistant.
//!
//! Provides local ONNX embedding inference (all-MiniLM-L6-v2, 384-dim), a
//! persistent id-mapped nearest-neighbor index over L2 distance, and the
//! domain layer that keeps the id→text mapping in lockstep with the index
//! while exposing context retrieval and an explicit correction primitive.
//!
//! ## Architecture
//!
//! - **SentenceEmbedder**: local ONNX model for embedding inference
//! - **IdMapIndex**: exact L2 index with two-file JSON persistence
//! - **SemanticMemory**: normalize / add / gated search / learn
//! - **ModelManager**: first-run model download from HuggingFace

pub mod embedder;
pub mod index;
pub mod model_manager;
pub mod semantic;

pub use embedder::{EMBEDDING_DIM, SentenceEmbedder};
pub use index::{IdMapIndex, NO_MATCH_ID};
pub use model_manager::ModelManager;
pub use semantic::{SemanticMemory, normalize};
