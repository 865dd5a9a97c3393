// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Aida assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Aida configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AidaConfig {
    /// Assistant identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Semantic memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Command dispatch settings.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Ollama generator endpoint settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Assistant identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

/// Semantic memory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Directory holding the vector index, id mapping, interaction log,
    /// and downloaded model files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// L2 distance gate for context retrieval. The matched text is attached
    /// to the LLM prompt only when the nearest neighbor's distance exceeds
    /// this value.
    #[serde(default = "default_distance_gate")]
    pub context_distance_gate: f64,

    /// Name of the sentence embedding model.
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            context_distance_gate: default_distance_gate(),
            model_name: default_model_name(),
        }
    }
}

/// Command dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    /// Minimum cosine similarity for the embedding stage of the hybrid
    /// dispatcher (0.0-1.0).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// URL returned by the calendar handler.
    #[serde(default = "default_calendar_url")]
    pub calendar_url: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            calendar_url: default_calendar_url(),
        }
    }
}

/// Ollama generator endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name passed in the generate request.
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Deadline for a single generate call, in seconds.
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

fn default_agent_name() -> String {
    "aida".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("aida"))
        .unwrap_or_else(|| PathBuf::from(".aida"))
}

fn default_distance_gate() -> f64 {
    0.8
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_calendar_url() -> String {
    "https://calendar.google.com".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "mistral".to_string()
}

fn default_ollama_timeout_secs() -> u64 {
    120
}
