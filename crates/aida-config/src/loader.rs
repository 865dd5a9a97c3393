// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./aida.toml` > `~/.config/aida/aida.toml` >
//! `/etc/aida/aida.toml`, with environment variable overrides via the
//! `AIDA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AidaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/aida/aida.toml` (system-wide)
/// 3. `~/.config/aida/aida.toml` (user XDG config)
/// 4. `./aida.toml` (local directory)
/// 5. `AIDA_*` environment variables
pub fn load_config() -> Result<AidaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AidaConfig::default()))
        .merge(Toml::file("/etc/aida/aida.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("aida/aida.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("aida.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AidaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AidaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AidaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AidaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `AIDA_MEMORY_DATA_DIR` must map to
/// `memory.data_dir`, not `memory.data.dir`.
fn env_provider() -> Env {
    Env::prefixed("AIDA_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("commands_", "commands.", 1)
            .replacen("ollama_", "ollama.", 1);
        mapped.into()
    })
}
