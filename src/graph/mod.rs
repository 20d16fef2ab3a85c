pub mod citation_graph;
pub mod snapshot_view;

pub use citation_graph::{CitationEdge, CitationGraph, GraphError};
pub use snapshot_view::GraphSnapshot;
