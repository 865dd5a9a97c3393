// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only interaction log.
//!
//! Stored as a single JSON document `{"history": [{"user", "ai"}, …]}`. A
//! missing, empty, or unparseable file is equivalent to the empty form and
//! is replaced by it on the next append.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use aida_core::AidaError;
use aida_core::types::Interaction;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    history: Vec<Interaction>,
}

/// Ordered log of user/assistant exchanges, rewritten on every append.
pub struct InteractionLog {
    path: PathBuf,
    entries: Mutex<Vec<Interaction>>,
}

impl InteractionLog {
    /// Open the log at the given path, tolerating absent or damaged files.
    pub fn open(path: PathBuf) -> Self {
        let entries = load_entries(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Append one exchange and rewrite the file.
    pub async fn append(&self, interaction: Interaction) -> Result<(), AidaError> {
        let mut entries = self.entries.lock().await;
        entries.push(interaction);

        let file = HistoryFile {
            history: entries.clone(),
        };
        let payload = serde_json::to_vec_pretty(&file).map_err(AidaError::memory)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &payload).await.map_err(AidaError::memory)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(AidaError::memory)?;
        Ok(())
    }

    /// Snapshot of all exchanges in append order.
    pub async fn entries(&self) -> Vec<Interaction> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn load_entries(path: &Path) -> Vec<Interaction> {
    let Ok(bytes) = std::fs::read(path) else {
        return Vec::new();
    };
    if bytes.is_empty() {
        return Vec::new();
    }
    match serde_json::from_slice::<HistoryFile>(&bytes) {
        Ok(file) => file.history,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable interaction log, starting empty");
            Vec::new()
        }
    }
}
