pub mod case;
pub mod metadata;

pub use case::Case;
pub use metadata::{Metadata, MetadataValue, KEY_OVERRULED_BY, KEY_SUPERSEDED_BY};
