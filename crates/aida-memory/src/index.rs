// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Id-mapped exact nearest-neighbor index over L2 distance.
//!
//! Vectors are stored flat and scanned on every search; at assistant scale
//! (thousands of remembered utterances) an exhaustive scan beats any
//! approximate structure for both simplicity and recall. Distances are
//! squared L2, which preserves ordering and matches the distance values the
//! rest of the system is calibrated against.
//!
//! The index stores vectors and ids only; the paired id-to-text mapping is
//! owned by [`crate::SemanticMemory`], which persists both files in lockstep
//! and checks their consistency at open.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use aida_core::error::AidaError;

/// Sentinel id returned by [`IdMapIndex::search`] on an empty index.
pub const NO_MATCH_ID: i64 = -1;

/// Format marker written into the on-disk index file. A file without this
/// marker is a legacy index that cannot support `remove` and is discarded.
const INDEX_KIND: &str = "id-map";

/// On-disk representation of the index.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    kind: String,
    dim: usize,
    ids: Vec<i64>,
    vectors: Vec<Vec<f32>>,
}

/// An id-mapped nearest-neighbor index over fixed-dimensional vectors.
///
/// Ids are caller-assigned and unique; rows are kept in insertion order.
#[derive(Debug)]
pub struct IdMapIndex {
    dim: usize,
    ids: Vec<i64>,
    vectors: Vec<Vec<f32>>,
}

impl IdMapIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    /// Dimensionality this index accepts.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no vectors are stored.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when the given id is present.
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Ids currently stored, in insertion order.
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    /// Insert a vector under a caller-assigned id.
    ///
    /// Fails on dimension mismatch or duplicate id.
    pub fn add(&mut self, id: i64, vector: Vec<f32>) -> Result<(), AidaError> {
        if vector.len() != self.dim {
            return Err(AidaError::Internal(format!(
                "vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dim
            )));
        }
        if self.contains(id) {
            return Err(AidaError::Internal(format!(
                "id {id} already present in index"
            )));
        }
        self.ids.push(id);
        self.vectors.push(vector);
        Ok(())
    }

    /// Remove the vector with the given id, if present. Idempotent.
    pub fn remove(&mut self, id: i64) {
        if let Some(pos) = self.ids.iter().position(|&stored| stored == id) {
            self.ids.remove(pos);
            self.vectors.remove(pos);
        }
    }

    /// Return up to `k` neighbors as `(id, squared L2 distance)` pairs in
    /// ascending distance. An empty index returns the single sentinel
    /// `(NO_MATCH_ID, f32::INFINITY)`.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(i64, f32)> {
        if self.is_empty() {
            return vec![(NO_MATCH_ID, f32::INFINITY)];
        }

        let mut scored: Vec<(i64, f32)> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .map(|(&id, vector)| (id, squared_l2(query, vector)))
            .collect();
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Persist the index to the given path.
    ///
    /// Writes to a temporary file in the same directory and renames it into
    /// place so a crash can never leave a torn index file.
    pub fn save(&self, path: &Path) -> Result<(), AidaError> {
        let file = IndexFile {
            kind: INDEX_KIND.to_string(),
            dim: self.dim,
            ids: self.ids.clone(),
            vectors: self.vectors.clone(),
        };
        let payload = serde_json::to_vec(&file).map_err(AidaError::memory)?;
        write_atomically(path, &payload)
    }

    /// Load an index from disk.
    ///
    /// A missing file yields an empty index. A file that is unparseable, has
    /// the wrong dimensionality, or lacks the id-map marker is a legacy
    /// index: it is discarded and an empty index is returned with a warning,
    /// because the legacy format cannot support `remove`.
    pub fn load(path: &Path, dim: usize) -> Result<Self, AidaError> {
        if !path.exists() {
            return Ok(Self::new(dim));
        }

        let bytes = fs::read(path).map_err(AidaError::memory)?;
        let parsed: Result<IndexFile, _> = serde_json::from_slice(&bytes);
        match parsed {
            Ok(file) if file.kind == INDEX_KIND && file.dim == dim => {
                if file.ids.len() != file.vectors.len() {
                    warn!(
                        path = %path.display(),
                        "index id/vector counts disagree, reinitializing empty"
                    );
                    return Ok(Self::new(dim));
                }
                Ok(Self {
                    dim,
                    ids: file.ids,
                    vectors: file.vectors,
                })
            }
            Ok(file) => {
                warn!(
                    path = %path.display(),
                    kind = %file.kind,
                    dim = file.dim,
                    "incompatible on-disk index, reinitializing empty"
                );
                Ok(Self::new(dim))
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "unreadable on-disk index, reinitializing empty"
                );
                Ok(Self::new(dim))
            }
        }
    }
}

/// Squared L2 distance between two vectors of equal length.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Write bytes to a temporary sibling file and rename it over the target.
pub(crate) fn write_atomically(path: &Path, payload: &[u8]) -> Result<(), AidaError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, payload).map_err(AidaError::memory)?;
    fs::rename(&tmp, path).map_err(AidaError::memory)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_at(x: f32) -> Vec<f32> {
        vec![x, 0.0, 0.0]
    }

    #[test]
    fn empty_index_returns_sentinel() {
        let index = IdMapIndex::new(3);
        let results = index.search(&vec_at(1.0), 1);
        assert_eq!(results, vec![(NO_MATCH_ID, f32::INFINITY)]);
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let mut index = IdMapIndex::new(3);
        index.add(0, vec_at(0.0)).unwrap();
        index.add(1, vec_at(5.0)).unwrap();
        index.add(2, vec_at(1.0)).unwrap();

        let results = index.search(&vec_at(0.9), 3);
        assert_eq!(results[0].0, 2);
        assert_eq!(results[1].0, 0);
        assert_eq!(results[2].0, 1);
        assert!(results[0].1 <= results[1].1 && results[1].1 <= results[2].1);
    }

    #[test]
    fn search_truncates_to_k() {
        let mut index = IdMapIndex::new(3);
        for i in 0..5 {
            index.add(i, vec_at(i as f32)).unwrap();
        }
        assert_eq!(index.search(&vec_at(0.0), 2).len(), 2);
    }

    #[test]
    fn distances_are_squared_l2() {
        let mut index = IdMapIndex::new(3);
        index.add(7, vec_at(0.0)).unwrap();
        let results = index.search(&vec_at(2.0), 1);
        assert_eq!(results[0].0, 7);
        assert!((results[0].1 - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn add_rejects_wrong_dimension() {
        let mut index = IdMapIndex::new(3);
        assert!(index.add(0, vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut index = IdMapIndex::new(3);
        index.add(0, vec_at(1.0)).unwrap();
        assert!(index.add(0, vec_at(2.0)).is_err());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut index = IdMapIndex::new(3);
        index.add(0, vec_at(1.0)).unwrap();
        index.remove(0);
        index.remove(0);
        assert!(index.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut index = IdMapIndex::new(3);
        index.add(0, vec_at(1.0)).unwrap();
        index.add(1, vec_at(2.0)).unwrap();
        index.save(&path).unwrap();

        let loaded = IdMapIndex::load(&path, 3).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains(0));
        assert!(loaded.contains(1));

        let results = loaded.search(&vec_at(1.1), 1);
        assert_eq!(results[0].0, 0);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = IdMapIndex::load(&dir.path().join("absent.json"), 3).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn load_discards_legacy_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        // A flat index from an older layout: no kind marker.
        std::fs::write(&path, br#"{"dim":3,"vectors":[[1.0,0.0,0.0]]}"#).unwrap();

        let index = IdMapIndex::load(&path, 3).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn load_discards_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let index = IdMapIndex::load(&path, 3).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn load_discards_wrong_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut index = IdMapIndex::new(2);
        index.add(0, vec![1.0, 0.0]).unwrap();
        index.save(&path).unwrap();

        let reloaded = IdMapIndex::load(&path, 3).unwrap();
        assert!(reloaded.is_empty());
    }
}
