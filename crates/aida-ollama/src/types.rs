// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Ollama generate API.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// The subset of the generate response the assistant consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}
