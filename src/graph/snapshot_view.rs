use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::case::Case;
use crate::graph::citation_graph::CitationGraph;
use crate::types::filter::CaseFilter;
use crate::types::identifiers::CaseId;

/// Immutable, densely indexed view of a citation graph at a point in time.
///
/// Cases are sorted by id and addressed by dense index, with adjacency held
/// as index vectors, so the PageRank/HITS hot loops never touch a hash map.
/// Snapshots are cheap to clone relative to a full recomputation and are
/// `Send`, so rankings can run on worker threads while ingestion continues
/// on the live graph.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    cases: Vec<Case>,
    index: BTreeMap<CaseId, usize>,
    out: Vec<Vec<usize>>,
    inn: Vec<Vec<usize>>,
    // Citer decision dates aligned with `inn`, for velocity windows.
    in_citer_dates: Vec<Vec<NaiveDate>>,
    edge_count: usize,
}

impl GraphSnapshot {
    pub(crate) fn from_graph(graph: &CitationGraph) -> Self {
        // BTreeMap iteration gives cases already sorted by id, which fixes
        // the index assignment deterministically.
        let cases: Vec<Case> = graph.cases().cloned().collect();
        let index: BTreeMap<CaseId, usize> = cases
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let n = cases.len();
        let mut out = vec![Vec::new(); n];
        let mut inn = vec![Vec::new(); n];
        let mut in_citer_dates = vec![Vec::new(); n];

        for edge in graph.edges() {
            let citer = index[&edge.citer_id];
            let cited = index[&edge.cited_id];
            out[citer].push(cited);
            inn[cited].push(citer);
            in_citer_dates[cited].push(edge.citer_decided_at);
        }
        canonicalize(&mut out, &mut inn, &mut in_citer_dates);
        let edge_count = graph.edge_count();

        GraphSnapshot {
            cases,
            index,
            out,
            inn,
            in_citer_dates,
            edge_count,
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn case(&self, idx: usize) -> &Case {
        &self.cases[idx]
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn index_of(&self, id: &CaseId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Indices of cases cited by `idx`.
    pub fn out_neighbors(&self, idx: usize) -> &[usize] {
        &self.out[idx]
    }

    /// Indices of cases citing `idx`.
    pub fn in_neighbors(&self, idx: usize) -> &[usize] {
        &self.inn[idx]
    }

    /// Decision dates of the citing cases, aligned with `in_neighbors`.
    pub fn in_citer_dates(&self, idx: usize) -> &[NaiveDate] {
        &self.in_citer_dates[idx]
    }

    pub fn in_degree(&self, idx: usize) -> usize {
        self.inn[idx].len()
    }

    pub fn out_degree(&self, idx: usize) -> usize {
        self.out[idx].len()
    }

    /// Induced subgraph of the cases matching `filter`. Edges with either
    /// endpoint outside the subset are dropped, so subsequent centrality and
    /// normalization are relative to the filtered set.
    pub fn filtered(&self, filter: &CaseFilter) -> GraphSnapshot {
        let keep: Vec<usize> = (0..self.cases.len())
            .filter(|&i| {
                let c = &self.cases[i];
                filter.matches(&c.jurisdiction, c.decision_date)
            })
            .collect();

        let mut remap = vec![usize::MAX; self.cases.len()];
        for (new_idx, &old_idx) in keep.iter().enumerate() {
            remap[old_idx] = new_idx;
        }

        let cases: Vec<Case> = keep.iter().map(|&i| self.cases[i].clone()).collect();
        let index: BTreeMap<CaseId, usize> = cases
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let n = cases.len();
        let mut out = vec![Vec::new(); n];
        let mut inn = vec![Vec::new(); n];
        let mut in_citer_dates = vec![Vec::new(); n];
        let mut edge_count = 0;

        for &old_citer in &keep {
            let new_citer = remap[old_citer];
            for &old_cited in &self.out[old_citer] {
                let new_cited = remap[old_cited];
                if new_cited != usize::MAX {
                    out[new_citer].push(new_cited);
                    inn[new_cited].push(new_citer);
                    in_citer_dates[new_cited].push(self.cases[old_citer].decision_date);
                    edge_count += 1;
                }
            }
        }
        canonicalize(&mut out, &mut inn, &mut in_citer_dates);

        GraphSnapshot {
            cases,
            index,
            out,
            inn,
            in_citer_dates,
            edge_count,
        }
    }
}

/// Sort adjacency lists by neighbor index (keeping citer dates aligned) so
/// a snapshot's layout depends only on graph content, not edge insertion
/// order. Floating-point accumulation in the iterative algorithms then
/// reproduces exactly across serialize/restore cycles.
fn canonicalize(
    out: &mut [Vec<usize>],
    inn: &mut [Vec<usize>],
    in_citer_dates: &mut [Vec<NaiveDate>],
) {
    for list in out.iter_mut() {
        list.sort_unstable();
    }
    for (citers, dates) in inn.iter_mut().zip(in_citer_dates.iter_mut()) {
        let mut paired: Vec<(usize, NaiveDate)> =
            citers.iter().copied().zip(dates.iter().copied()).collect();
        paired.sort_unstable();
        for (i, (citer, date)) in paired.into_iter().enumerate() {
            citers[i] = citer;
            dates[i] = date;
        }
    }
}
