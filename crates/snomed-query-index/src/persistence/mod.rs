//! Save/load index snapshots to/from disk.
//!
//! A snapshot lets a host build the index once from a release and reload it
//! on later starts without recomputing closures.
//!
//! # Directory Layout
//!
//! ```text
//! <dir>/manifest.json   SnapshotManifest (release, timestamp, count, checksum)
//! <dir>/concepts.json   Concept records in index order, with closures
//! ```
//!
//! Posting lists are rebuilt from the closures on load.
//!
//! # Example
//!
//! ```ignore
//! use snomed_query_index::persistence::Snapshot;
//!
//! let manifest = Snapshot::save(&index, "snapshots/20240101", "20240101")?;
//! let index = Snapshot::load("snapshots/20240101")?;
//! ```

mod manifest;

pub use manifest::SnapshotManifest;

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::concept::Concept;
use crate::error::{IndexError, IndexResult};
use crate::memory::MemoryConceptIndex;

/// Current snapshot layout version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Manifest file name inside a snapshot directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Concept data file name inside a snapshot directory.
pub const CONCEPTS_FILE: &str = "concepts.json";

/// Reads and writes snapshot directories.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot;

impl Snapshot {
    /// Writes `index` into `dir`, creating the directory if needed.
    ///
    /// Returns the manifest that was written.
    pub fn save<P: AsRef<Path>>(
        index: &MemoryConceptIndex,
        dir: P,
        snomed_release: &str,
    ) -> IndexResult<SnapshotManifest> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| IndexError::io_error(dir, e))?;

        let concepts: Vec<&Concept> = index.concepts().collect();
        let data =
            serde_json::to_vec(&concepts).map_err(|e| IndexError::Serialization(e.to_string()))?;

        let data_path = dir.join(CONCEPTS_FILE);
        fs::write(&data_path, &data).map_err(|e| IndexError::io_error(&data_path, e))?;

        let manifest = SnapshotManifest::new(
            snomed_release,
            SNAPSHOT_FORMAT_VERSION,
            concepts.len(),
            checksum(&data),
            CONCEPTS_FILE,
        );
        manifest.save(dir.join(MANIFEST_FILE))?;

        tracing::info!(
            path = %dir.display(),
            release = snomed_release,
            concepts = manifest.concept_count,
            "saved index snapshot"
        );
        Ok(manifest)
    }

    /// Loads the index stored in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> IndexResult<MemoryConceptIndex> {
        Self::load_with_manifest(dir).map(|(_, index)| index)
    }

    /// Loads the index stored in `dir` together with its manifest.
    ///
    /// The format version, checksum and concept count are all verified
    /// before the index is rebuilt.
    pub fn load_with_manifest<P: AsRef<Path>>(
        dir: P,
    ) -> IndexResult<(SnapshotManifest, MemoryConceptIndex)> {
        let dir = dir.as_ref();
        let manifest = SnapshotManifest::load(dir.join(MANIFEST_FILE))?;

        if manifest.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(IndexError::invalid_format(format!(
                "Unsupported version: {} (expected {})",
                manifest.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }

        let data_path = data_path(dir, &manifest.data_file)?;
        let data = fs::read(&data_path).map_err(|e| IndexError::io_error(&data_path, e))?;

        let actual = checksum(&data);
        if actual != manifest.checksum {
            return Err(IndexError::ChecksumMismatch {
                expected: manifest.checksum.clone(),
                actual,
            });
        }

        let concepts: Vec<Concept> =
            serde_json::from_slice(&data).map_err(|e| IndexError::Deserialization(e.to_string()))?;
        if concepts.len() != manifest.concept_count {
            return Err(IndexError::invalid_format(format!(
                "Concept count mismatch: expected {}, got {}",
                manifest.concept_count,
                concepts.len()
            )));
        }

        let index = MemoryConceptIndex::from_concepts(concepts)?;
        tracing::info!(
            path = %dir.display(),
            release = %manifest.snomed_release,
            concepts = manifest.concept_count,
            "loaded index snapshot"
        );
        Ok((manifest, index))
    }
}

/// SHA-256 of `data` as lowercase hex.
/// Resolves the manifest's data file, which must name a file directly
/// inside the snapshot directory.
fn data_path(dir: &Path, data_file: &str) -> IndexResult<PathBuf> {
    let mut components = Path::new(data_file).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(dir.join(name)),
        _ => Err(IndexError::invalid_format(format!(
            "Data file must be a plain file name: {}",
            data_file
        ))),
    }
}

fn checksum(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
