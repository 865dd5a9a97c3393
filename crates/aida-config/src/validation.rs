// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use aida_core::AidaError;

use crate::model::AidaConfig;

/// Validate value ranges that serde cannot express.
///
/// Collects every problem before failing so a user can fix their config in
/// one pass.
pub fn validate_config(config: &AidaConfig) -> Result<(), AidaError> {
    let mut problems = Vec::new();

    if config.agent.name.trim().is_empty() {
        problems.push("agent.name must not be empty".to_string());
    }

    if !(0.0..=1.0).contains(&config.commands.similarity_threshold) {
        problems.push(format!(
            "commands.similarity_threshold must be within 0.0-1.0, got {}",
            config.commands.similarity_threshold
        ));
    }

    if config.memory.context_distance_gate < 0.0 {
        problems.push(format!(
            "memory.context_distance_gate must be non-negative, got {}",
            config.memory.context_distance_gate
        ));
    }

    if config.memory.model_name.trim().is_empty() {
        problems.push("memory.model_name must not be empty".to_string());
    }

    if config.ollama.model.trim().is_empty() {
        problems.push("ollama.model must not be empty".to_string());
    }

    if config.ollama.timeout_secs == 0 {
        problems.push("ollama.timeout_secs must be greater than zero".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AidaError::Config(problems.join("; ")))
    }
}
