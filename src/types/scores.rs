use serde::{Deserialize, Serialize};

use crate::types::identifiers::CaseId;

/// Per-case importance metrics. Always derived — recomputed from a graph
/// snapshot on demand, never persisted as canonical state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceScore {
    pub case_id: CaseId,
    pub pagerank: f64,
    pub hits_authority: f64,
    pub hits_hub: f64,
    pub temporal_influence: f64,
    pub in_degree: usize,
    pub composite: f64,
}

/// One entry of a ranking result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCase {
    pub case_id: CaseId,
    pub score: f64,
}

/// Non-fatal notice that an iterative algorithm hit its iteration budget
/// without converging. Rides along with results as metadata; callers decide
/// whether to trust the scores or request a later recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationWarning {
    pub algorithm: String,
    pub iterations: usize,
    pub detail: String,
}

/// The outcome of a ranking call: ordered results plus any convergence
/// warnings raised while computing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingResponse {
    pub rankings: Vec<RankedCase>,
    pub cases_considered: usize,
    pub warnings: Vec<ComputationWarning>,
}

/// Contribution of a single feature to a link prediction, for
/// explainability. `contribution = weight * value` before the logistic
/// squash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Estimated probability that one case will cite the other, plus the
/// per-feature breakdown that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPrediction {
    pub probability: f64,
    pub breakdown: Vec<FeatureContribution>,
}
