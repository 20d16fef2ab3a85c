pub mod filter;
pub mod identifiers;
pub mod scores;

pub use filter::CaseFilter;
pub use identifiers::{CaseId, CaseIdError};
pub use scores::{
    ComputationWarning, FeatureContribution, ImportanceScore, LinkPrediction, RankedCase,
    RankingResponse,
};
