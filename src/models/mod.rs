mod metadata;

pub use metadata::{FallbackMetadata, Metadata, MetadataQuery, MetadataRequest, MetadataResponse};
