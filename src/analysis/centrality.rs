use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::graph::GraphSnapshot;
use crate::types::scores::ComputationWarning;

/// Shared iteration parameters for the power-iteration algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityConfig {
    pub damping: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        CentralityConfig {
            damping: 0.85,
            epsilon: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Output of one centrality run. `converged == false` means the iteration
/// budget ran out first; the scores are best-effort, not garbage, and the
/// condition is reported as a warning rather than an error.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct HitsResult {
    pub authority: Vec<f64>,
    pub hub: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

impl PageRankResult {
    pub fn warning(&self) -> Option<ComputationWarning> {
        non_convergence_warning("pagerank", self.converged, self.iterations)
    }
}

impl HitsResult {
    pub fn warning(&self) -> Option<ComputationWarning> {
        non_convergence_warning("hits", self.converged, self.iterations)
    }
}

fn non_convergence_warning(
    algorithm: &str,
    converged: bool,
    iterations: usize,
) -> Option<ComputationWarning> {
    if converged {
        return None;
    }
    Some(ComputationWarning {
        algorithm: algorithm.to_string(),
        iterations,
        detail: format!("{algorithm} hit its iteration budget without converging"),
    })
}

/// Power-iteration PageRank with uniform teleportation. Dangling nodes
/// (zero out-degree) redistribute their mass uniformly over all nodes each
/// iteration, so total mass stays at 1.0. Indices align with the snapshot.
pub fn pagerank(snapshot: &GraphSnapshot, config: &CentralityConfig) -> PageRankResult {
    let n = snapshot.len();
    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f = n as f64;
    let uniform = 1.0 / n_f;
    let mut scores = vec![uniform; n];
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let dangling_mass: f64 = (0..n)
            .filter(|&i| snapshot.out_degree(i) == 0)
            .map(|i| scores[i])
            .sum();

        let base = (1.0 - config.damping) / n_f + config.damping * dangling_mass / n_f;
        let mut next = vec![base; n];

        for citer in 0..n {
            let out = snapshot.out_neighbors(citer);
            if out.is_empty() {
                continue;
            }
            let share = config.damping * scores[citer] / out.len() as f64;
            for &cited in out {
                next[cited] += share;
            }
        }

        let delta: f64 = next
            .iter()
            .zip(scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        scores = next;

        if delta < config.epsilon {
            return PageRankResult {
                scores,
                iterations,
                converged: true,
            };
        }
    }

    warn!(iterations, "pagerank did not converge within budget");
    PageRankResult {
        scores,
        iterations,
        converged: false,
    }
}

/// HITS with L2 renormalization each round to prevent divergence.
/// hub(i) sums authority over out-edges; authority(i) sums hub over
/// in-edges. Same convergence policy as PageRank: best-effort scores with
/// `converged == false` when the budget runs out.
pub fn hits(snapshot: &GraphSnapshot, config: &CentralityConfig) -> HitsResult {
    let n = snapshot.len();
    if n == 0 {
        return HitsResult {
            authority: Vec::new(),
            hub: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let mut authority = vec![1.0; n];
    let mut hub = vec![1.0; n];
    l2_normalize(&mut authority);
    l2_normalize(&mut hub);
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let mut next_authority = vec![0.0; n];
        for i in 0..n {
            for &citer in snapshot.in_neighbors(i) {
                next_authority[i] += hub[citer];
            }
        }
        l2_normalize(&mut next_authority);

        let mut next_hub = vec![0.0; n];
        for i in 0..n {
            for &cited in snapshot.out_neighbors(i) {
                next_hub[i] += next_authority[cited];
            }
        }
        l2_normalize(&mut next_hub);

        let delta: f64 = next_authority
            .iter()
            .zip(authority.iter())
            .chain(next_hub.iter().zip(hub.iter()))
            .map(|(a, b)| (a - b).abs())
            .sum();

        authority = next_authority;
        hub = next_hub;

        if delta < config.epsilon {
            return HitsResult {
                authority,
                hub,
                iterations,
                converged: true,
            };
        }
    }

    warn!(iterations, "hits did not converge within budget");
    HitsResult {
        authority,
        hub,
        iterations,
        converged: false,
    }
}

fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}
