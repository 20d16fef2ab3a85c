use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::case::Case;
use crate::graph::{CitationEdge, CitationGraph};
use crate::types::scores::ImportanceScore;

/// Bump on any incompatible change to the snapshot layout. Loaders refuse
/// versions they do not know.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk form of a graph snapshot. `digest` covers the canonically
/// ordered cases and edges, so a restored graph is verifiably the one that
/// was saved; `created_at` is informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub digest: String,
    pub case_count: usize,
    pub edge_count: usize,
    pub cases: Vec<Case>,
    pub edges: Vec<CitationEdge>,
}

impl SnapshotDocument {
    /// Capture the graph's current state. Cases come out sorted by id and
    /// edges by (citer, cited), making the serialized form canonical.
    pub fn capture(graph: &CitationGraph) -> Result<Self, serde_json::Error> {
        let cases: Vec<Case> = graph.cases().cloned().collect();
        let mut edges: Vec<CitationEdge> = graph.edges().to_vec();
        edges.sort_by(|a, b| {
            (&a.citer_id, &a.cited_id).cmp(&(&b.citer_id, &b.cited_id))
        });

        let digest = body_digest(&cases, &edges)?;

        Ok(SnapshotDocument {
            schema_version: SCHEMA_VERSION,
            created_at: Utc::now(),
            digest,
            case_count: cases.len(),
            edge_count: edges.len(),
            cases,
            edges,
        })
    }

    /// Recompute the digest over this document's body.
    pub fn expected_digest(&self) -> Result<String, serde_json::Error> {
        body_digest(&self.cases, &self.edges)
    }
}

fn body_digest(cases: &[Case], edges: &[CitationEdge]) -> Result<String, serde_json::Error> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(cases)?);
    hasher.update(serde_json::to_vec(edges)?);
    let hash = hasher.finalize();
    Ok(format!("sha256:{}", hex::encode(hash)))
}

/// Serialized batch of derived scores, for handing rankings across process
/// boundaries. Never re-imported as graph state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreExport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub scores: Vec<ImportanceScore>,
}

impl ScoreExport {
    pub fn new(scores: Vec<ImportanceScore>) -> Self {
        ScoreExport {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            scores,
        }
    }
}
