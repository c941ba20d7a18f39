//! Schema extraction: fetch raw documents, merge them per bucket and persist
//! one combined document per bucket.

pub mod cache;
pub mod merge;
pub mod metadata;

pub use cache::Extractor;
pub use merge::{BucketStrategy, MergedSchema, SchemaMerger, merge};
pub use metadata::{BUCKET_BY_TITLE, SchemaMetadata};
