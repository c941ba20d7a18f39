use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::metadata::SchemaMetadata;
use crate::error::ExtractError;
use crate::parse::spec::RawDocument;

/// How documents are assigned to output buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketStrategy {
    /// Bucket by document title; unknown titles are skipped.
    ByTitle,
    /// Every OpenAPI 3.x document goes into the one named bucket.
    Single(String),
}

impl BucketStrategy {
    /// Bucket for a release tag, with dots replaced so the name is a valid
    /// module segment (`v1.30.2` → `v1_30_2`).
    pub fn for_release(tag: &str) -> Self {
        Self::Single(tag.replace('.', "_"))
    }

    fn bucket_for(&self, metadata: &SchemaMetadata) -> Option<String> {
        if !metadata.is_openapi_v3() {
            return None;
        }
        match self {
            Self::ByTitle => metadata.bucket().map(str::to_string),
            Self::Single(name) => Some(name.clone()),
        }
    }
}

/// All schemas collected for one output bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSchema {
    /// Metadata of the first document that contributed to the bucket.
    pub metadata: SchemaMetadata,
    pub schemas: IndexMap<String, Value>,
}

impl MergedSchema {
    /// The persisted form: `{openapi, info: {title, version}, components: {schemas}}`.
    pub fn to_document(&self) -> MergedDocument<'_> {
        MergedDocument {
            openapi: &self.metadata.openapi,
            info: MergedInfo {
                title: &self.metadata.title,
                version: &self.metadata.version,
            },
            components: MergedComponents {
                schemas: &self.schemas,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MergedDocument<'a> {
    pub openapi: &'a str,
    pub info: MergedInfo<'a>,
    pub components: MergedComponents<'a>,
}

#[derive(Debug, Serialize)]
pub struct MergedInfo<'a> {
    pub title: &'a str,
    pub version: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MergedComponents<'a> {
    pub schemas: &'a IndexMap<String, Value>,
}

/// Accumulates documents into per-bucket schema maps.
///
/// Later documents overwrite earlier schemas of the same name within a
/// bucket; buckets never share entries.
#[derive(Debug)]
pub struct SchemaMerger {
    strategy: BucketStrategy,
    buckets: IndexMap<String, MergedSchema>,
}

impl SchemaMerger {
    pub fn new(strategy: BucketStrategy) -> Self {
        Self {
            strategy,
            buckets: IndexMap::new(),
        }
    }

    /// Merge one document. Returns the bucket it landed in, or `None` when
    /// it was skipped as unsupported or had no schemas.
    pub fn add(&mut self, doc: RawDocument) -> Option<&str> {
        let metadata = SchemaMetadata::from_document(&doc);

        let bucket = self.bucket_for(&metadata)?;

        if doc.components.schemas.is_empty() {
            log::debug!("Spec {} has no schemas", metadata.title);
            return None;
        }

        self.buckets
            .entry(bucket.clone())
            .or_insert_with(|| MergedSchema {
                metadata,
                schemas: IndexMap::new(),
            })
            .schemas
            .extend(doc.components.schemas);

        self.buckets
            .get_key_value(&bucket)
            .map(|(name, _)| name.as_str())
    }

    /// Bucket a document with `metadata` would be merged into. Unsupported
    /// documents are logged and get `None`.
    pub fn bucket_for(&self, metadata: &SchemaMetadata) -> Option<String> {
        let bucket = self.strategy.bucket_for(metadata);
        if bucket.is_none() {
            log::warn!(
                "Skipping unsupported spec {} (openapi {})",
                metadata.title,
                metadata.openapi
            );
        }
        bucket
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finish merging; an empty result is an error.
    pub fn finish(self) -> Result<IndexMap<String, MergedSchema>, ExtractError> {
        if self.buckets.is_empty() {
            return Err(ExtractError::NoSchemaFound);
        }
        Ok(self.buckets)
    }
}

/// Merge a whole document stream in order.
pub fn merge<I>(
    documents: I,
    strategy: BucketStrategy,
) -> Result<IndexMap<String, MergedSchema>, ExtractError>
where
    I: IntoIterator<Item = RawDocument>,
{
    let mut merger = SchemaMerger::new(strategy);
    for doc in documents {
        merger.add(doc);
    }
    merger.finish()
}
