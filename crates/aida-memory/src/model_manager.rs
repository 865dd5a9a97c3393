// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run download of the ONNX embedding model.
//!
//! The quantized all-MiniLM-L6-v2 model and its tokenizer are fetched from
//! HuggingFace into the data directory once; later startups find them on
//! disk and skip the network entirely.

use std::path::{Path, PathBuf};

use tracing::info;

use aida_core::error::AidaError;

const MODEL_URL: &str =
    "https://huggingface.co/onnx-community/all-MiniLM-L6-v2-ONNX/resolve/main/onnx/model_quantized.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Resolves model file locations under the data directory and downloads
/// missing files on first run.
pub struct ModelManager {
    data_dir: PathBuf,
    model_name: String,
}

impl ModelManager {
    pub fn new(data_dir: PathBuf, model_name: impl Into<String>) -> Self {
        Self {
            data_dir,
            model_name: model_name.into(),
        }
    }

    /// Directory holding the model and tokenizer files.
    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("models").join(&self.model_name)
    }

    /// Path to the ONNX model file.
    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    /// Path to the tokenizer definition.
    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    /// True when both files are already on disk.
    pub fn is_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Make sure the model files exist, downloading any that are missing.
    ///
    /// Returns the model path. A failed download leaves no partial file
    /// behind.
    pub async fn ensure(&self) -> Result<PathBuf, AidaError> {
        if self.is_available() {
            return Ok(self.model_path());
        }

        info!(model = %self.model_name, "embedding model not found, downloading");

        let model_dir = self.model_dir();
        tokio::fs::create_dir_all(&model_dir)
            .await
            .map_err(|e| AidaError::Internal(format!("failed to create model directory: {e}")))?;

        for (filename, url) in [("model.onnx", MODEL_URL), ("tokenizer.json", TOKENIZER_URL)] {
            let dest = model_dir.join(filename);
            if dest.exists() {
                continue;
            }

            match download_file(url, &dest).await {
                Ok(size) => info!(filename, size, "downloaded model file"),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&dest).await;
                    return Err(e);
                }
            }
        }

        info!(dir = %model_dir.display(), "embedding model ready");
        Ok(self.model_path())
    }
}

async fn download_file(url: &str, dest: &Path) -> Result<usize, AidaError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| AidaError::Internal(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(AidaError::Internal(format!(
            "download of {url} failed with status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AidaError::Internal(format!("failed to read body of {url}: {e}")))?;

    let size = bytes.len();
    tokio::fs::write(dest, &bytes)
        .await
        .map_err(|e| AidaError::Internal(format!("failed to write {}: {e}", dest.display())))?;

    Ok(size)
}
