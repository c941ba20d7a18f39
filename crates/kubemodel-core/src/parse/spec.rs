use serde::{Deserialize, Serialize};

use super::components::Components;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One OpenAPI v3 document as fetched from a schema source.
///
/// Only the parts the merger looks at are typed; schema bodies stay as raw
/// JSON so they are written back out exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub openapi: String,

    pub info: Info,

    #[serde(default)]
    pub components: Components,
}

/// Just the identifying fields of a document. Everything else, `components`
/// included, is left unread.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentHeader {
    pub openapi: String,

    pub info: Info,
}

impl RawDocument {
    pub fn schema_count(&self) -> usize {
        self.components.schemas.len()
    }
}
