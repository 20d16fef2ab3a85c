use std::collections::{BTreeSet, VecDeque};

use crate::graph::GraphSnapshot;
use crate::types::scores::{FeatureContribution, LinkPrediction};

/// Fixed feature weights for the logistic combination. Inference only —
/// training these belongs to an external pipeline.
pub const WEIGHT_SHARED_CITERS: f64 = 2.0;
pub const WEIGHT_PATH_PROXIMITY: f64 = 1.0;
pub const WEIGHT_JURISDICTION_MATCH: f64 = 0.8;
pub const WEIGHT_TEMPORAL_PROXIMITY: f64 = 0.6;
pub const WEIGHT_EMBEDDING_SIMILARITY: f64 = 1.5;
pub const BIAS: f64 = -2.0;

/// Saturation constant for the shared-citer feature: value = n / (n + 3).
const SHARED_CITER_SCALE: f64 = 3.0;
/// Temporal proximity halves every 10 years of gap.
const TEMPORAL_GAP_HALF_LIFE_YEARS: f64 = 10.0;
/// BFS cutoff; beyond this the path feature contributes nothing.
const MAX_PATH_DEPTH: usize = 6;

const DAYS_PER_YEAR: f64 = 365.25;

/// Structural link predictor: estimates the probability that two cases will
/// become citation-linked, from graph features alone. An externally
/// computed embedding similarity in [0, 1] can be blended in as one more
/// feature, keeping this engine decoupled from any particular NLP model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkPredictor;

impl LinkPredictor {
    pub fn new() -> Self {
        LinkPredictor
    }

    /// `a` and `b` are snapshot indices. Returns the squashed probability
    /// and the per-feature contributions that produced it.
    pub fn predict(
        &self,
        snapshot: &GraphSnapshot,
        a: usize,
        b: usize,
        embedding_similarity: Option<f64>,
    ) -> LinkPrediction {
        let shared = shared_citer_count(snapshot, a, b) as f64;
        let shared_value = shared / (shared + SHARED_CITER_SCALE);

        let path_value = match undirected_shortest_path(snapshot, a, b, MAX_PATH_DEPTH) {
            Some(0) => 1.0,
            Some(len) => 1.0 / len as f64,
            None => 0.0,
        };

        let jurisdiction_value =
            if snapshot.case(a).jurisdiction == snapshot.case(b).jurisdiction {
                1.0
            } else {
                0.0
            };

        let gap_days = (snapshot.case(a).decision_date - snapshot.case(b).decision_date)
            .num_days()
            .abs() as f64;
        let gap_years = gap_days / DAYS_PER_YEAR;
        let temporal_value =
            (-(std::f64::consts::LN_2 / TEMPORAL_GAP_HALF_LIFE_YEARS) * gap_years).exp();

        let mut breakdown = vec![
            feature("shared_citers", shared_value, WEIGHT_SHARED_CITERS),
            feature("path_proximity", path_value, WEIGHT_PATH_PROXIMITY),
            feature(
                "jurisdiction_match",
                jurisdiction_value,
                WEIGHT_JURISDICTION_MATCH,
            ),
            feature(
                "temporal_proximity",
                temporal_value,
                WEIGHT_TEMPORAL_PROXIMITY,
            ),
        ];
        if let Some(similarity) = embedding_similarity {
            breakdown.push(feature(
                "embedding_similarity",
                similarity.clamp(0.0, 1.0),
                WEIGHT_EMBEDDING_SIMILARITY,
            ));
        }

        let logit = BIAS + breakdown.iter().map(|f| f.contribution).sum::<f64>();
        let probability = logistic(logit);

        LinkPrediction {
            probability,
            breakdown,
        }
    }
}

fn feature(name: &str, value: f64, weight: f64) -> FeatureContribution {
    FeatureContribution {
        feature: name.to_string(),
        value,
        weight,
        contribution: weight * value,
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Number of cases that cite both `a` and `b`.
fn shared_citer_count(snapshot: &GraphSnapshot, a: usize, b: usize) -> usize {
    let citers_a: BTreeSet<usize> = snapshot.in_neighbors(a).iter().copied().collect();
    snapshot
        .in_neighbors(b)
        .iter()
        .filter(|citer| citers_a.contains(citer))
        .count()
}

/// BFS over the undirected view of the citation graph, cut off at
/// `max_depth` hops.
fn undirected_shortest_path(
    snapshot: &GraphSnapshot,
    from: usize,
    to: usize,
    max_depth: usize,
) -> Option<usize> {
    if from == to {
        return Some(0);
    }
    let mut visited = vec![false; snapshot.len()];
    let mut queue = VecDeque::new();
    visited[from] = true;
    queue.push_back((from, 0usize));

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let neighbors = snapshot
            .out_neighbors(node)
            .iter()
            .chain(snapshot.in_neighbors(node).iter());
        for &next in neighbors {
            if next == to {
                return Some(depth + 1);
            }
            if !visited[next] {
                visited[next] = true;
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}
