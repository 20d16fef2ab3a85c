use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::graph::GraphSnapshot;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalConfig {
    /// Half-life of a citation's weight, in years.
    pub half_life_years: f64,
    /// Rolling window for citation velocity, in years.
    pub velocity_window_years: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        TemporalConfig {
            half_life_years: 10.0,
            velocity_window_years: 5.0,
        }
    }
}

impl TemporalConfig {
    fn lambda(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_years
    }
}

fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Age-decayed citation weight per case: each incoming citation contributes
/// `exp(-λ · years since the cited case was decided)`, so a heavily cited
/// but old precedent fades against a recent one with the same in-degree.
/// Pure function of (snapshot, as_of); indices align with the snapshot.
pub fn temporal_influence(
    snapshot: &GraphSnapshot,
    as_of: NaiveDate,
    config: &TemporalConfig,
) -> Vec<f64> {
    let lambda = config.lambda();
    (0..snapshot.len())
        .map(|i| {
            let age_years = years_between(snapshot.case(i).decision_date, as_of).max(0.0);
            let weight = (-lambda * age_years).exp();
            snapshot.in_degree(i) as f64 * weight
        })
        .collect()
}

/// Citations received within the rolling window divided by total citations
/// received — above ~0.5 a case's relevance is rising, near zero it is
/// fading. Windows are keyed on the citing cases' decision dates.
/// Uncited cases score 0.
pub fn citation_velocity(
    snapshot: &GraphSnapshot,
    as_of: NaiveDate,
    config: &TemporalConfig,
) -> Vec<f64> {
    (0..snapshot.len())
        .map(|i| {
            let dates = snapshot.in_citer_dates(i);
            if dates.is_empty() {
                return 0.0;
            }
            let recent = dates
                .iter()
                .filter(|&&d| {
                    let age = years_between(d, as_of);
                    (0.0..=config.velocity_window_years).contains(&age)
                })
                .count();
            recent as f64 / dates.len() as f64
        })
        .collect()
}
