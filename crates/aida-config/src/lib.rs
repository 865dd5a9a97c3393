// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Aida assistant.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.

#![allow(clippy::result_large_err)]

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AgentConfig, AidaConfig, CommandsConfig, MemoryConfig, OllamaConfig};

use aida_core::AidaError;

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads from TOML files and env vars via
/// Figment, then runs the post-deserialization validation pass.
pub fn load_and_validate() -> Result<AidaConfig, AidaError> {
    let config = loader::load_config().map_err(|e| AidaError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<AidaConfig, AidaError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| AidaError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_and_validate_str("").expect("empty config should be valid");
        assert_eq!(config.agent.name, "aida");
        assert_eq!(config.ollama.timeout_secs, 120);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_and_validate_str(
            r#"
            [ollama]
            model = "llama3"
            timeout_secs = 30

            [memory]
            context_distance_gate = 0.5
            "#,
        )
        .expect("config should parse");
        assert_eq!(config.ollama.model, "llama3");
        assert_eq!(config.ollama.timeout_secs, 30);
        assert_eq!(config.memory.context_distance_gate, 0.5);
        // Untouched sections keep defaults.
        assert_eq!(config.commands.similarity_threshold, 0.6);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_and_validate_str(
            r#"
            [ollama]
            modle = "typo"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = load_and_validate_str(
            r#"
            [commands]
            similarity_threshold = 2.0
            "#,
        );
        assert!(result.is_err());
    }
}
