pub mod persist;
pub mod schema;

pub use persist::{load_snapshot, save_snapshot, SnapshotError};
pub use schema::{ScoreExport, SnapshotDocument, SCHEMA_VERSION};
