// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX embedding adapter for local inference using all-MiniLM-L6-v2.
//!
//! Produces 384-dimensional embeddings on CPU with zero external API calls.
//! Deterministic for a fixed model revision; an empty string tokenizes to
//! special tokens only and still yields a defined vector.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;

use aida_core::error::AidaError;
use aida_core::traits::adapter::PluginAdapter;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// Embedding dimensions for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Local sentence embedder backed by an ONNX session.
///
/// Loads the model and tokenizer eagerly; a load failure is a fatal
/// startup error. Inference runs on CPU with a single thread.
pub struct SentenceEmbedder {
    /// ONNX Runtime session (not Send, wrapped in Mutex for safety).
    session: Mutex<Session>,
    /// HuggingFace tokenizer.
    tokenizer: tokenizers::Tokenizer,
}

// Safety: Session is accessed through Mutex which provides synchronization.
// The tokenizer is thread-safe for encoding operations.
unsafe impl Send for SentenceEmbedder {}
unsafe impl Sync for SentenceEmbedder {}

impl SentenceEmbedder {
    /// Load the embedder from model files on disk.
    ///
    /// Expects `tokenizer.json` next to the given `model.onnx` path.
    pub fn load(model_path: &Path) -> Result<Self, AidaError> {
        let model_dir = model_path
            .parent()
            .ok_or_else(|| AidaError::Internal("invalid model path".to_string()))?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            AidaError::Internal(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;

        let session = Session::builder()
            .map_err(|e| AidaError::Internal(format!("failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| AidaError::Internal(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| AidaError::Internal(format!("failed to set thread count: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| {
                AidaError::Internal(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }

    /// Embed a single text, returning a 384-dim L2-normalized vector.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, AidaError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| AidaError::Internal(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let seq_len = input_ids.len();

        let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| AidaError::Internal(format!("failed to shape input_ids: {e}")))?;
        let attention_mask_array = Array2::from_shape_vec((1, seq_len), attention_mask.clone())
            .map_err(|e| AidaError::Internal(format!("failed to shape attention_mask: {e}")))?;
        let token_type_ids_array = Array2::from_shape_vec((1, seq_len), token_type_ids)
            .map_err(|e| AidaError::Internal(format!("failed to shape token_type_ids: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| AidaError::Internal(format!("failed to lock ONNX session: {e}")))?;

        let input_ids_tensor = TensorRef::from_array_view(&input_ids_array)
            .map_err(|e| AidaError::Internal(format!("failed to create input_ids tensor: {e}")))?;
        let attention_mask_tensor = TensorRef::from_array_view(&attention_mask_array)
            .map_err(|e| AidaError::Internal(format!("failed to create attention_mask tensor: {e}")))?;
        let token_type_ids_tensor = TensorRef::from_array_view(&token_type_ids_array)
            .map_err(|e| AidaError::Internal(format!("failed to create token_type_ids tensor: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            ])
            .map_err(|e| AidaError::Internal(format!("ONNX inference failed: {e}")))?;

        // Output shape is [1, seq_len, 384].
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AidaError::Internal(format!("failed to extract output tensor: {e}")))?;

        let hidden_size = shape[shape.len() - 1] as usize;
        let pooled = masked_mean_pool(data, &attention_mask, seq_len, hidden_size);

        Ok(l2_normalize(&pooled))
    }
}

/// Mean-pool token embeddings, counting only positions the attention mask
/// keeps.
fn masked_mean_pool(
    token_embeddings: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden_size];
    let mut kept = 0.0f32;

    for (pos, &mask) in attention_mask.iter().enumerate().take(seq_len) {
        if mask > 0 {
            let row = &token_embeddings[pos * hidden_size..(pos + 1) * hidden_size];
            for (acc, &value) in pooled.iter_mut().zip(row) {
                *acc += value;
            }
            kept += 1.0;
        }
    }

    if kept > 0.0 {
        for value in &mut pooled {
            *value /= kept;
        }
    }

    pooled
}

/// L2-normalize a vector; a zero vector is returned unchanged.
fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for SentenceEmbedder {
    fn name(&self) -> &str {
        "minilm-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, AidaError> {
        match self.session.lock() {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("session lock poisoned: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), AidaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for SentenceEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, AidaError> {
        let mut embeddings = Vec::with_capacity(input.texts.len());
        for text in &input.texts {
            embeddings.push(self.embed_text(text)?);
        }
        Ok(EmbeddingOutput {
            embeddings,
            dimensions: EMBEDDING_DIM,
        })
    }
}
