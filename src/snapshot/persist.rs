use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::graph::{CitationGraph, GraphError};
use crate::snapshot::schema::{SnapshotDocument, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot file already exists: {0}")]
    OutputExists(PathBuf),

    #[error("Unsupported schema version {found} (supported: {supported})")]
    SchemaVersion { found: u32, supported: u32 },

    #[error("Snapshot digest mismatch: file says {stored}, body hashes to {actual}")]
    DigestMismatch { stored: String, actual: String },

    #[error("Snapshot contains an invalid graph: {0}")]
    InvalidGraph(#[from] GraphError),
}

/// Write the graph's current state to `path` as versioned JSON. Goes
/// through a temp file plus atomic rename, so a crash mid-write leaves no
/// half-written snapshot behind. Refuses to overwrite an existing file.
pub fn save_snapshot(graph: &CitationGraph, path: &Path) -> Result<SnapshotDocument, SnapshotError> {
    if path.exists() {
        return Err(SnapshotError::OutputExists(path.to_path_buf()));
    }

    let document = SnapshotDocument::capture(graph)?;

    // Temp name derived from the digest, unique per content.
    let temp_suffix = format!("tmp.{}", &document.digest[7..19]);
    let temp_path = path.with_extension(temp_suffix);
    if temp_path.exists() {
        fs::remove_file(&temp_path)?;
    }

    let file = fs::File::create(&temp_path)?;
    serde_json::to_writer_pretty(&file, &document)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;
    debug!(
        cases = document.case_count,
        edges = document.edge_count,
        "snapshot saved"
    );
    Ok(document)
}

/// Load a snapshot file and rebuild the live graph from it. The schema
/// version and content digest are verified before anything is ingested;
/// rebuilding goes through the normal validated ingestion path, so a
/// corrupted file cannot smuggle in an invalid edge.
pub fn load_snapshot(path: &Path) -> Result<CitationGraph, SnapshotError> {
    let file = fs::File::open(path)?;
    let document: SnapshotDocument = serde_json::from_reader(file)?;

    if document.schema_version != SCHEMA_VERSION {
        return Err(SnapshotError::SchemaVersion {
            found: document.schema_version,
            supported: SCHEMA_VERSION,
        });
    }

    let actual = document.expected_digest()?;
    if actual != document.digest {
        return Err(SnapshotError::DigestMismatch {
            stored: document.digest,
            actual,
        });
    }

    let mut graph = CitationGraph::new();
    for case in document.cases {
        graph.add_case(case)?;
    }
    for edge in document.edges {
        let jurisdiction = graph
            .get_case(&edge.citer_id)
            .map(|c| c.jurisdiction.clone())
            .unwrap_or_default();
        graph.add_citation(
            edge.citer_id,
            edge.cited_id,
            edge.citer_decided_at,
            &jurisdiction,
        )?;
    }
    debug!(
        cases = graph.case_count(),
        edges = graph.edge_count(),
        "snapshot restored"
    );
    Ok(graph)
}
