// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer over the vector index: normalization, utterance recording,
//! gated context retrieval, and the learn(old → new) correction primitive.
//!
//! The memory exclusively owns its two on-disk files (vector index and
//! id→text mapping); both are rewritten together on every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use aida_core::error::AidaError;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::types::EmbeddingInput;

use crate::index::{IdMapIndex, NO_MATCH_ID, write_atomically};

/// File name of the vector index inside the memory directory.
pub const INDEX_FILE: &str = "index.json";
/// File name of the id→text mapping inside the memory directory.
pub const MAP_FILE: &str = "id_map.json";

/// Normalize an utterance: lowercase, NFKC Unicode form, surrounding
/// whitespace stripped.
pub fn normalize(text: &str) -> String {
    let folded: String = text.to_lowercase().nfkc().collect();
    folded.trim().to_string()
}

/// Inner state guarded by a single writer lock.
///
/// The mapping and the index are two views of one logical set; every id in
/// one must be present in the other.
struct MemoryState {
    index: IdMapIndex,
    id_map: BTreeMap<i64, String>,
}

/// Persistent semantic memory over an embedding adapter and a vector index.
///
/// Mutations (`add`, `learn`) serialize behind the write half of an
/// internal `RwLock`; concurrent `search` calls share the read half and
/// observe consistent snapshots.
pub struct SemanticMemory {
    embedder: Arc<dyn EmbeddingAdapter>,
    index_path: PathBuf,
    map_path: PathBuf,
    /// Squared L2 gate: the nearest text is recalled only when its distance
    /// is strictly greater than this value.
    gate: f32,
    state: RwLock<MemoryState>,
}

impl SemanticMemory {
    /// Open (or create) a semantic memory in the given directory using the
    /// standard file names.
    pub fn open_in_dir(
        embedder: Arc<dyn EmbeddingAdapter>,
        dir: &Path,
        dim: usize,
        gate: f32,
    ) -> Result<Self, AidaError> {
        std::fs::create_dir_all(dir).map_err(AidaError::memory)?;
        Self::open(
            embedder,
            dir.join(INDEX_FILE),
            dir.join(MAP_FILE),
            dim,
            gate,
        )
    }

    /// Open (or create) a semantic memory with explicit file paths.
    ///
    /// A legacy or corrupt index, or an index/mapping pair that disagrees on
    /// its id set, is discarded and both files are rewritten empty. An
    /// unwritable location is a fatal startup error.
    pub fn open(
        embedder: Arc<dyn EmbeddingAdapter>,
        index_path: PathBuf,
        map_path: PathBuf,
        dim: usize,
        gate: f32,
    ) -> Result<Self, AidaError> {
        let index = IdMapIndex::load(&index_path, dim)?;
        let id_map = load_map(&map_path)?;

        let consistent = index.len() == id_map.len()
            && index.ids().iter().all(|id| id_map.contains_key(id));

        let memory = Self {
            embedder,
            index_path,
            map_path,
            gate,
            state: RwLock::new(if consistent {
                MemoryState { index, id_map }
            } else {
                warn!("vector index and id mapping disagree, reinitializing empty");
                MemoryState {
                    index: IdMapIndex::new(dim),
                    id_map: BTreeMap::new(),
                }
            }),
        };

        // Write both files now so an unwritable directory fails at startup
        // rather than on the first mutation.
        {
            let state = memory
                .state
                .try_read()
                .map_err(|e| AidaError::Internal(format!("fresh memory lock unavailable: {e}")))?;
            memory.persist(&state)?;
        }

        Ok(memory)
    }

    /// Number of remembered utterances.
    pub async fn len(&self) -> usize {
        self.state.read().await.id_map.len()
    }

    /// True when nothing has been remembered yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of `(id, normalized text)` entries, for inspection and tests.
    pub async fn entries(&self) -> Vec<(i64, String)> {
        self.state
            .read()
            .await
            .id_map
            .iter()
            .map(|(&id, text)| (id, text.clone()))
            .collect()
    }

    /// Remember an utterance: normalize, embed, insert, persist.
    ///
    /// Returns the assigned id.
    pub async fn add(&self, text: &str) -> Result<i64, AidaError> {
        let norm = normalize(text);
        let embedding = self.embed(&norm).await?;

        let mut state = self.state.write().await;
        let id = next_id(&state.id_map);
        state.index.add(id, embedding)?;
        state.id_map.insert(id, norm.clone());
        self.persist(&state)?;

        debug!(id, text = %norm, "memory entry added");
        Ok(id)
    }

    /// Retrieve the remembered text nearest to the query, subject to the
    /// distance gate.
    ///
    /// Returns the empty string when the memory is empty or the nearest
    /// neighbor does not pass the gate.
    pub async fn search(&self, query: &str) -> Result<String, AidaError> {
        let norm = normalize(query);
        let embedding = self.embed(&norm).await?;

        let state = self.state.read().await;
        let (id, distance) = state.index.search(&embedding, 1)[0];
        if id == NO_MATCH_ID {
            return Ok(String::new());
        }

        if distance > self.gate {
            Ok(state.id_map.get(&id).cloned().unwrap_or_default())
        } else {
            Ok(String::new())
        }
    }

    /// Replace the remembered utterance nearest to `old_text` with
    /// `new_text`.
    ///
    /// The replacement is unconditional on distance: this is the user's
    /// explicit override. The removal is persisted before the freed id can
    /// be reassigned.
    pub async fn learn(&self, old_text: &str, new_text: &str) -> Result<(), AidaError> {
        let old_norm = normalize(old_text);
        let new_norm = normalize(new_text);
        let old_embedding = self.embed(&old_norm).await?;
        let new_embedding = self.embed(&new_norm).await?;

        let mut state = self.state.write().await;

        let (id, distance) = state.index.search(&old_embedding, 1)[0];
        if id != NO_MATCH_ID && state.id_map.contains_key(&id) {
            state.index.remove(id);
            state.id_map.remove(&id);
            self.persist(&state)?;
            debug!(id, distance, old = %old_norm, "memory entry removed for correction");
        }

        let new_id = next_id(&state.id_map);
        state.index.add(new_id, new_embedding)?;
        state.id_map.insert(new_id, new_norm.clone());
        self.persist(&state)?;

        debug!(id = new_id, text = %new_norm, "correction recorded");
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AidaError> {
        self.embedder
            .embed(EmbeddingInput::single(text))
            .await?
            .into_single()
            .ok_or_else(|| AidaError::Internal("embedder returned no vector".to_string()))
    }

    /// Rewrite both on-disk files from the given state snapshot.
    fn persist(&self, state: &MemoryState) -> Result<(), AidaError> {
        state.index.save(&self.index_path)?;
        let payload = serde_json::to_vec(&state.id_map).map_err(AidaError::memory)?;
        write_atomically(&self.map_path, &payload)
    }
}

/// Smallest unused id at or above the entry count.
///
/// Matches the count-based assignment of the original store while keeping
/// ids unique after interleaved removals.
fn next_id(id_map: &BTreeMap<i64, String>) -> i64 {
    let mut id = id_map.len() as i64;
    while id_map.contains_key(&id) {
        id += 1;
    }
    id
}

fn load_map(path: &Path) -> Result<BTreeMap<i64, String>, AidaError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let bytes = std::fs::read(path).map_err(AidaError::memory)?;
    match serde_json::from_slice(&bytes) {
        Ok(map) => Ok(map),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable id mapping, reinitializing empty");
            Ok(BTreeMap::new())
        }
    }
}
