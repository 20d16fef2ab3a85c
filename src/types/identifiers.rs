use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, unique identifier of a case (e.g. a neutral citation or a
/// database-assigned docket key). Ordering is lexicographic and drives the
/// deterministic tie-break in ranking output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(String);

#[derive(Debug, Error)]
pub enum CaseIdError {
    #[error("Case id must not be empty")]
    Empty,
    #[error("Case id must not contain whitespace: {0:?}")]
    Whitespace(String),
}

impl CaseId {
    /// Create a CaseId from a raw string, normalizing to lowercase so that
    /// the same case reported with different capitalization maps to one node.
    pub fn new(raw: impl Into<String>) -> Result<Self, CaseIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CaseIdError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(CaseIdError::Whitespace(raw));
        }
        Ok(CaseId(raw.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
