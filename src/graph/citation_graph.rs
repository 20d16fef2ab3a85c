use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::case::{Case, KEY_OVERRULED_BY, KEY_SUPERSEDED_BY};
use crate::graph::snapshot_view::GraphSnapshot;
use crate::types::identifiers::CaseId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Case {0} cannot cite itself")]
    SelfCitation(CaseId),

    #[error("Citation from {citer} ({citer_decided}) predates cited case {cited} ({cited_decided})")]
    TimeInverted {
        citer: CaseId,
        citer_decided: NaiveDate,
        cited: CaseId,
        cited_decided: NaiveDate,
    },

    #[error("Case {0} already registered with conflicting metadata")]
    CaseConflict(CaseId),

    #[error("Cited case {0} is not registered")]
    UnknownCase(CaseId),
}

/// A single citer→cited edge. The citer's decision date is carried on the
/// edge because it arrives with the ingestion record and anchors temporal
/// validation and velocity windows.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CitationEdge {
    pub citer_id: CaseId,
    pub cited_id: CaseId,
    pub citer_decided_at: NaiveDate,
}

/// Directed citation graph with bidirectional adjacency. Mutable, validated
/// at the boundary: every error path returns before any state changes, so a
/// failed ingestion can never leave a partial update behind.
///
/// Not internally synchronized — callers that share an instance across
/// threads wrap it in a lock (see `service::QueryService`).
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    cases: BTreeMap<CaseId, Case>,
    out_edges: BTreeMap<CaseId, Vec<CaseId>>,
    in_edges: BTreeMap<CaseId, Vec<CaseId>>,
    // Edge identity is the (citer, cited) pair; re-adding is a no-op.
    edge_set: BTreeSet<(CaseId, CaseId)>,
    edges: Vec<CitationEdge>,
}

impl CitationGraph {
    pub fn new() -> Self {
        CitationGraph::default()
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get_case(&self, id: &CaseId) -> Option<&Case> {
        self.cases.get(id)
    }

    pub fn contains_case(&self, id: &CaseId) -> bool {
        self.cases.contains_key(id)
    }

    /// Register a case. Re-registering an identical record is a no-op;
    /// a record that was first seen as an edge stub (no court) is upgraded
    /// in place; anything else conflicting is rejected.
    pub fn add_case(&mut self, case: Case) -> Result<(), GraphError> {
        match self.cases.get(&case.id) {
            None => {
                self.cases.insert(case.id.clone(), case);
                Ok(())
            }
            Some(existing) if existing.same_identity(&case) => Ok(()),
            Some(existing)
                if existing.court.is_empty()
                    && existing.decision_date == case.decision_date
                    && existing.jurisdiction == case.jurisdiction =>
            {
                self.cases.insert(case.id.clone(), case);
                Ok(())
            }
            Some(_) => {
                debug!(case_id = %case.id, "rejecting conflicting case registration");
                Err(GraphError::CaseConflict(case.id))
            }
        }
    }

    /// Ingest one citation. The cited case must already be registered (its
    /// decision date is needed to validate temporal order); the citer is
    /// created on first reference from the edge record. Idempotent: a repeat
    /// of an existing (citer, cited) pair with a consistent date is a no-op.
    pub fn add_citation(
        &mut self,
        citer_id: CaseId,
        cited_id: CaseId,
        citer_decided_at: NaiveDate,
        citer_jurisdiction: &str,
    ) -> Result<(), GraphError> {
        // Validation phase: nothing below this block mutates until every
        // check has passed.
        if citer_id == cited_id {
            debug!(case_id = %citer_id, "rejecting self-citation");
            return Err(GraphError::SelfCitation(citer_id));
        }

        let cited = self
            .cases
            .get(&cited_id)
            .ok_or_else(|| GraphError::UnknownCase(cited_id.clone()))?;

        if citer_decided_at < cited.decision_date {
            debug!(
                citer = %citer_id,
                cited = %cited_id,
                "rejecting time-inverted citation"
            );
            return Err(GraphError::TimeInverted {
                citer: citer_id,
                citer_decided: citer_decided_at,
                cited: cited_id,
                cited_decided: cited.decision_date,
            });
        }

        if let Some(citer) = self.cases.get(&citer_id) {
            if citer.decision_date != citer_decided_at {
                return Err(GraphError::CaseConflict(citer_id));
            }
        }

        if self
            .edge_set
            .contains(&(citer_id.clone(), cited_id.clone()))
        {
            return Ok(());
        }

        // Commit phase.
        if !self.cases.contains_key(&citer_id) {
            let stub = Case::stub(citer_id.clone(), citer_decided_at, citer_jurisdiction);
            self.cases.insert(citer_id.clone(), stub);
        }

        self.out_edges
            .entry(citer_id.clone())
            .or_default()
            .push(cited_id.clone());
        self.in_edges
            .entry(cited_id.clone())
            .or_default()
            .push(citer_id.clone());
        self.edge_set
            .insert((citer_id.clone(), cited_id.clone()));
        self.edges.push(CitationEdge {
            citer_id,
            cited_id,
            citer_decided_at,
        });
        Ok(())
    }

    /// Cases cited by `id`, in insertion order. Restartable: each call
    /// returns a fresh iterator.
    pub fn neighbors_out<'a>(&'a self, id: &CaseId) -> impl Iterator<Item = &'a CaseId> + 'a {
        self.out_edges.get(id).into_iter().flatten()
    }

    /// Cases citing `id`, in insertion order.
    pub fn neighbors_in<'a>(&'a self, id: &CaseId) -> impl Iterator<Item = &'a CaseId> + 'a {
        self.in_edges.get(id).into_iter().flatten()
    }

    pub fn out_degree(&self, id: &CaseId) -> usize {
        self.out_edges.get(id).map_or(0, Vec::len)
    }

    pub fn in_degree(&self, id: &CaseId) -> usize {
        self.in_edges.get(id).map_or(0, Vec::len)
    }

    pub fn edges(&self) -> &[CitationEdge] {
        &self.edges
    }

    pub fn cases(&self) -> impl Iterator<Item = &Case> {
        self.cases.values()
    }

    /// Flag a case as overruled. The case stays in the graph; downstream
    /// consumers read the flag from metadata.
    pub fn flag_overruled(&mut self, id: &CaseId, by: &CaseId) -> Result<(), GraphError> {
        let case = self
            .cases
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownCase(id.clone()))?;
        case.metadata.insert_string(KEY_OVERRULED_BY, by.as_str());
        Ok(())
    }

    /// Flag a case as superseded, e.g. by a later statute or consolidated
    /// opinion.
    pub fn flag_superseded(&mut self, id: &CaseId, by: &CaseId) -> Result<(), GraphError> {
        let case = self
            .cases
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownCase(id.clone()))?;
        case.metadata.insert_string(KEY_SUPERSEDED_BY, by.as_str());
        Ok(())
    }

    /// Freeze the current state into an immutable, densely indexed view.
    /// All iterative algorithms run on snapshots, never on the live graph,
    /// so concurrent ingestion cannot corrupt an in-flight computation.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::from_graph(self)
    }
}
