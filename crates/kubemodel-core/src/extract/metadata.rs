use serde_json::Value;

use crate::error::ParseError;
use crate::parse::{self, spec::RawDocument};

/// Document titles the extractor knows how to bucket, with their bucket path.
pub const BUCKET_BY_TITLE: &[(&str, &str)] = &[
    // Built-in Kubernetes API groups.
    ("Kubernetes", "k8s"),
    // Groups served by CustomResourceDefinitions.
    ("Kubernetes CRD Swagger", "crd"),
];

/// Identity of a fetched document, taken from its `openapi` and `info` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMetadata {
    pub openapi: String,
    pub title: String,
    pub version: String,
}

impl SchemaMetadata {
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            openapi: doc.openapi.clone(),
            title: doc.info.title.clone(),
            version: doc.info.version.clone(),
        }
    }

    /// Metadata of a document that has not been parsed yet. Only the
    /// required `openapi` and `info` keys are checked.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let header = parse::header(value)?;
        Ok(Self {
            openapi: header.openapi,
            title: header.info.title,
            version: header.info.version,
        })
    }

    pub fn is_openapi_v3(&self) -> bool {
        self.openapi.starts_with("3.")
    }

    /// OpenAPI 3.x with a title from [`BUCKET_BY_TITLE`].
    pub fn is_supported(&self) -> bool {
        self.is_openapi_v3() && self.bucket().is_some()
    }

    /// Output bucket for this document's title, if the title is known.
    pub fn bucket(&self) -> Option<&'static str> {
        BUCKET_BY_TITLE
            .iter()
            .find(|(title, _)| *title == self.title)
            .map(|(_, bucket)| *bucket)
    }
}
