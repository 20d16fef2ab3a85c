use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metadata::Metadata;
use crate::types::identifiers::CaseId;

/// Authoritative case record: identity, decision date, forum. Immutable
/// after registration except for status metadata (overruled/superseded
/// flags); derived citation counts live on the graph, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub decision_date: NaiveDate,
    pub court: String,
    pub jurisdiction: String,
    pub metadata: Metadata,
}

impl Case {
    pub fn new(
        id: CaseId,
        decision_date: NaiveDate,
        court: impl Into<String>,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Case {
            id,
            decision_date,
            court: court.into(),
            jurisdiction: jurisdiction.into(),
            metadata: Metadata::new(),
        }
    }

    /// A case created from an ingestion-feed edge record, before its full
    /// metadata has been seen. Court is unknown at that point.
    pub fn stub(id: CaseId, decision_date: NaiveDate, jurisdiction: impl Into<String>) -> Self {
        Case::new(id, decision_date, "", jurisdiction)
    }

    /// True when the two records describe the same case: identical identity
    /// fields, status metadata excluded. Used to distinguish a harmless
    /// re-registration from a conflict.
    pub fn same_identity(&self, other: &Case) -> bool {
        self.id == other.id
            && self.decision_date == other.decision_date
            && self.court == other.court
            && self.jurisdiction == other.jurisdiction
    }
}
