pub mod centrality;
pub mod prediction;
pub mod ranking;
pub mod temporal;

pub use centrality::{hits, pagerank, CentralityConfig, HitsResult, PageRankResult};
pub use prediction::LinkPredictor;
pub use ranking::{
    ImportanceRanker, ScoreTable, WEIGHT_HITS_AUTHORITY, WEIGHT_IN_DEGREE, WEIGHT_PAGERANK,
    WEIGHT_TEMPORAL_INFLUENCE,
};
pub use temporal::{citation_velocity, temporal_influence, TemporalConfig};
