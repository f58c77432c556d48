//! Manifest file describing a saved index snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{IndexError, IndexResult};

/// Manifest written next to the concept data of a snapshot.
///
/// The manifest records which SNOMED CT release the snapshot holds, when it
/// was written, and enough about the data file to detect truncation or
/// tampering on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// SNOMED CT release version.
    pub snomed_release: String,
    /// Timestamp when the snapshot was written.
    pub created_at: DateTime<Utc>,
    /// Version of the crate that wrote it.
    pub writer_version: String,
    /// Snapshot layout version.
    pub format_version: u32,
    /// Number of concepts in the data file.
    pub concept_count: usize,
    /// SHA-256 of the data file, lowercase hex.
    pub checksum: String,
    /// Data file name (relative to the manifest).
    pub data_file: String,
}

impl SnapshotManifest {
    /// Creates a manifest stamped with the current time.
    pub fn new(
        snomed_release: &str,
        format_version: u32,
        concept_count: usize,
        checksum: String,
        data_file: &str,
    ) -> Self {
        Self {
            snomed_release: snomed_release.to_string(),
            created_at: Utc::now(),
            writer_version: env!("CARGO_PKG_VERSION").to_string(),
            format_version,
            concept_count,
            checksum,
            data_file: data_file.to_string(),
        }
    }

    /// Saves the manifest to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> IndexResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IndexError::io_error(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| IndexError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Loads a manifest from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| IndexError::io_error(path, e))?;
        let reader = BufReader::new(file);
        let manifest: Self = serde_json::from_reader(reader)
            .map_err(|e| IndexError::Deserialization(e.to_string()))?;
        Ok(manifest)
    }
}

impl std::fmt::Display for SnapshotManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Index Snapshot")?;
        writeln!(f, "  SNOMED Release:  {}", self.snomed_release)?;
        writeln!(f, "  Created:         {}", self.created_at)?;
        writeln!(f, "  Writer:          {}", self.writer_version)?;
        writeln!(f, "  Format:          v{}", self.format_version)?;
        writeln!(f, "  Total Concepts:  {}", self.concept_count)?;
        writeln!(f, "  Checksum:        {}", self.checksum)?;
        Ok(())
    }
}
