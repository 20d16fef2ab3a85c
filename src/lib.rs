//! Deterministic precedent-citation graph engine.
//!
//! `precedent-core` provides validated citation ingestion, immutable graph
//! snapshots, PageRank/HITS centrality, temporal influence modeling,
//! composite importance ranking, and structural link prediction. All ranking
//! operations are deterministic — identical inputs always produce identical
//! outputs, ties included.
//!
//! The natural-language reasoning layer, federated database adapters, and
//! access control live outside this crate; they talk to it through
//! [`service::QueryService`].

pub mod analysis;
pub mod case;
pub mod graph;
pub mod service;
pub mod snapshot;
pub mod types;
