//! The only surface external collaborators call. Wraps one explicitly
//! owned graph instance — no process-wide singleton — behind a
//! single-writer/multiple-reader lock.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::prediction::LinkPredictor;
use crate::analysis::ranking::ImportanceRanker;
use crate::case::Case;
use crate::graph::{CitationGraph, GraphError, GraphSnapshot};
use crate::snapshot::{load_snapshot, save_snapshot, SnapshotDocument, SnapshotError};
use crate::types::filter::CaseFilter;
use crate::types::identifiers::CaseId;
use crate::types::scores::{ImportanceScore, LinkPrediction, RankingResponse};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Case not found: {0}")]
    CaseNotFound(CaseId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// One record of the ingestion feed, as supplied by the federated
/// legal-database adapter layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub citer_id: CaseId,
    pub cited_id: CaseId,
    pub citer_decided_at: NaiveDate,
    pub jurisdiction: String,
}

pub struct QueryService {
    graph: RwLock<CitationGraph>,
    ranker: ImportanceRanker,
    predictor: LinkPredictor,
    // Fixed "today" for reproducible tests; live deployments leave it unset.
    as_of_override: Option<NaiveDate>,
}

impl Default for QueryService {
    fn default() -> Self {
        QueryService::new(CitationGraph::new())
    }
}

impl QueryService {
    pub fn new(graph: CitationGraph) -> Self {
        QueryService {
            graph: RwLock::new(graph),
            ranker: ImportanceRanker::default(),
            predictor: LinkPredictor::new(),
            as_of_override: None,
        }
    }

    pub fn with_ranker(mut self, ranker: ImportanceRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of_override = Some(as_of);
        self
    }

    /// Restore a service from a snapshot file saved by [`save_to`].
    ///
    /// [`save_to`]: QueryService::save_to
    pub fn from_snapshot(path: &Path) -> Result<Self, SnapshotError> {
        Ok(QueryService::new(load_snapshot(path)?))
    }

    pub fn save_to(&self, path: &Path) -> Result<SnapshotDocument, SnapshotError> {
        save_snapshot(&self.read_graph(), path)
    }

    fn read_graph(&self) -> RwLockReadGuard<'_, CitationGraph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_graph(&self) -> RwLockWriteGuard<'_, CitationGraph> {
        self.graph.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn as_of(&self) -> NaiveDate {
        self.as_of_override
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn add_case(&self, case: Case) -> Result<(), GraphError> {
        self.write_graph().add_case(case)
    }

    pub fn add_citation(
        &self,
        citer_id: CaseId,
        cited_id: CaseId,
        citer_decided_at: NaiveDate,
        citer_jurisdiction: &str,
    ) -> Result<(), GraphError> {
        self.write_graph()
            .add_citation(citer_id, cited_id, citer_decided_at, citer_jurisdiction)
    }

    /// Ingest one feed record. Validation failures surface synchronously
    /// and are never auto-retried; the caller decides whether to skip,
    /// correct, or escalate.
    pub fn ingest(&self, record: CitationRecord) -> Result<(), GraphError> {
        self.add_citation(
            record.citer_id,
            record.cited_id,
            record.citer_decided_at,
            &record.jurisdiction,
        )
    }

    pub fn flag_overruled(&self, id: &CaseId, by: &CaseId) -> Result<(), GraphError> {
        self.write_graph().flag_overruled(id, by)
    }

    pub fn flag_superseded(&self, id: &CaseId, by: &CaseId) -> Result<(), GraphError> {
        self.write_graph().flag_superseded(id, by)
    }

    /// Clone an immutable snapshot under a brief read lock. Everything
    /// downstream of this call runs lock-free; edges ingested afterwards
    /// become visible at the next snapshot cycle.
    pub fn snapshot(&self) -> GraphSnapshot {
        self.read_graph().snapshot()
    }

    /// Rank the top `k` precedents. With a filter, scoring runs on the
    /// induced subgraph, so rank is relative to the filtered subset.
    /// Convergence warnings ride along in the response.
    pub fn rank_top_k(&self, k: usize, filter: Option<&CaseFilter>) -> RankingResponse {
        let snapshot = self.snapshot();
        let scoped = match filter {
            Some(f) => snapshot.filtered(f),
            None => snapshot,
        };
        let (rankings, warnings) = self.ranker.rank_top_k(&scoped, self.as_of(), k);
        RankingResponse {
            rankings,
            cases_considered: scoped.len(),
            warnings,
        }
    }

    /// Same as [`rank_top_k`], but computed on a worker thread so a large
    /// recomputation never blocks ingestion.
    ///
    /// [`rank_top_k`]: QueryService::rank_top_k
    pub fn rank_top_k_in_background(
        &self,
        k: usize,
        filter: Option<&CaseFilter>,
    ) -> thread::JoinHandle<RankingResponse> {
        let snapshot = self.snapshot();
        let scoped = match filter {
            Some(f) => snapshot.filtered(f),
            None => snapshot,
        };
        let ranker = self.ranker.clone();
        let as_of = self.as_of();
        thread::spawn(move || {
            let (rankings, warnings) = ranker.rank_top_k(&scoped, as_of, k);
            RankingResponse {
                rankings,
                cases_considered: scoped.len(),
                warnings,
            }
        })
    }

    /// Full score breakdown for one case, recomputed from the current
    /// snapshot.
    pub fn get_case_score(&self, case_id: &CaseId) -> Result<ImportanceScore, QueryError> {
        let snapshot = self.snapshot();
        let idx = snapshot
            .index_of(case_id)
            .ok_or_else(|| QueryError::CaseNotFound(case_id.clone()))?;
        let table = self.ranker.score_table(&snapshot, self.as_of());
        Ok(table.scores[idx].clone())
    }

    /// Estimate the probability of a future citation link between two
    /// cases. `embedding_similarity`, when supplied by an external NLP
    /// component, is blended in as an additional feature.
    pub fn predict_link(
        &self,
        case_a: &CaseId,
        case_b: &CaseId,
        embedding_similarity: Option<f64>,
    ) -> Result<LinkPrediction, QueryError> {
        let snapshot = self.snapshot();
        let a = snapshot
            .index_of(case_a)
            .ok_or_else(|| QueryError::CaseNotFound(case_a.clone()))?;
        let b = snapshot
            .index_of(case_b)
            .ok_or_else(|| QueryError::CaseNotFound(case_b.clone()))?;
        Ok(self.predictor.predict(&snapshot, a, b, embedding_similarity))
    }
}
