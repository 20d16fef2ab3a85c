use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Restricts a ranking call to a subset of the graph. The filter is applied
/// BEFORE scoring: centrality and normalization run on the induced subgraph,
/// so rank is relative to the filtered set. That is deliberate — "top
/// precedents within the Ninth Circuit" should be normalized against the
/// Ninth Circuit, not the whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFilter {
    pub jurisdiction: Option<String>,
    pub decided_after: Option<NaiveDate>,
    pub decided_before: Option<NaiveDate>,
}

impl CaseFilter {
    pub fn jurisdiction(jurisdiction: impl Into<String>) -> Self {
        CaseFilter {
            jurisdiction: Some(jurisdiction.into()),
            ..CaseFilter::default()
        }
    }

    pub fn decided_between(after: NaiveDate, before: NaiveDate) -> Self {
        CaseFilter {
            jurisdiction: None,
            decided_after: Some(after),
            decided_before: Some(before),
        }
    }

    /// Inclusive on both date bounds.
    pub fn matches(&self, jurisdiction: &str, decided: NaiveDate) -> bool {
        if let Some(j) = &self.jurisdiction {
            if j != jurisdiction {
                return false;
            }
        }
        if let Some(after) = self.decided_after {
            if decided < after {
                return false;
            }
        }
        if let Some(before) = self.decided_before {
            if decided > before {
                return false;
            }
        }
        true
    }
}
