use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::analysis::centrality::{hits, pagerank, CentralityConfig};
use crate::analysis::temporal::{temporal_influence, TemporalConfig};
use crate::graph::GraphSnapshot;
use crate::types::scores::{ComputationWarning, ImportanceScore, RankedCase};

/// Composite weights. Kept as named constants so the formula is testable
/// and tunable without touching the scoring code.
pub const WEIGHT_PAGERANK: f64 = 0.40;
pub const WEIGHT_HITS_AUTHORITY: f64 = 0.30;
pub const WEIGHT_TEMPORAL_INFLUENCE: f64 = 0.20;
pub const WEIGHT_IN_DEGREE: f64 = 0.10;

/// All importance metrics for one snapshot, indices aligned with it.
/// Normalization is recomputed on every call rather than cached, so a
/// table is always consistent with the snapshot it was computed from.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    pub scores: Vec<ImportanceScore>,
    pub warnings: Vec<ComputationWarning>,
}

#[derive(Debug, Clone)]
pub struct ImportanceRanker {
    centrality: CentralityConfig,
    temporal: TemporalConfig,
}

impl Default for ImportanceRanker {
    fn default() -> Self {
        ImportanceRanker {
            centrality: CentralityConfig::default(),
            temporal: TemporalConfig::default(),
        }
    }
}

impl ImportanceRanker {
    pub fn new(centrality: CentralityConfig, temporal: TemporalConfig) -> Self {
        ImportanceRanker {
            centrality,
            temporal,
        }
    }

    /// Compute every metric and the composite for all cases in the
    /// snapshot. Convergence shortfalls surface as warnings on the table,
    /// never as errors.
    pub fn score_table(&self, snapshot: &GraphSnapshot, as_of: NaiveDate) -> ScoreTable {
        let pr = pagerank(snapshot, &self.centrality);
        let ht = hits(snapshot, &self.centrality);
        let temporal = temporal_influence(snapshot, as_of, &self.temporal);
        let in_degrees: Vec<f64> = (0..snapshot.len())
            .map(|i| snapshot.in_degree(i) as f64)
            .collect();

        let pr_norm = min_max_normalize(&pr.scores);
        let auth_norm = min_max_normalize(&ht.authority);
        let temporal_norm = min_max_normalize(&temporal);
        let degree_norm = min_max_normalize(&in_degrees);

        let scores = (0..snapshot.len())
            .map(|i| {
                let composite = WEIGHT_PAGERANK * pr_norm[i]
                    + WEIGHT_HITS_AUTHORITY * auth_norm[i]
                    + WEIGHT_TEMPORAL_INFLUENCE * temporal_norm[i]
                    + WEIGHT_IN_DEGREE * degree_norm[i];
                ImportanceScore {
                    case_id: snapshot.case(i).id.clone(),
                    pagerank: pr.scores[i],
                    hits_authority: ht.authority[i],
                    hits_hub: ht.hub[i],
                    temporal_influence: temporal[i],
                    in_degree: snapshot.in_degree(i),
                    composite,
                }
            })
            .collect();

        let warnings = [pr.warning(), ht.warning()].into_iter().flatten().collect();

        ScoreTable { scores, warnings }
    }

    /// At most `k` cases by descending composite score. Ties break by
    /// higher raw in-degree, then lexicographic case id, so the output is
    /// fully deterministic.
    pub fn rank_top_k(
        &self,
        snapshot: &GraphSnapshot,
        as_of: NaiveDate,
        k: usize,
    ) -> (Vec<RankedCase>, Vec<ComputationWarning>) {
        let table = self.score_table(snapshot, as_of);
        let mut ordered = table.scores;

        ordered.sort_by(|a, b| {
            let score_cmp = b
                .composite
                .partial_cmp(&a.composite)
                .unwrap_or(Ordering::Equal);
            score_cmp
                .then_with(|| b.in_degree.cmp(&a.in_degree))
                .then_with(|| a.case_id.cmp(&b.case_id))
        });

        debug_assert!(ordered.windows(2).all(|w| {
            w[0].composite > w[1].composite
                || (w[0].composite == w[1].composite && w[0].in_degree >= w[1].in_degree)
        }));

        let rankings = ordered
            .into_iter()
            .take(k)
            .map(|s| RankedCase {
                case_id: s.case_id,
                score: s.composite,
            })
            .collect();

        (rankings, table.warnings)
    }
}

/// Min-max scaling to [0, 1] over the given slice. A degenerate range
/// (all values equal) maps everything to 0.0, which keeps the composite
/// bounded and deterministic.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}
