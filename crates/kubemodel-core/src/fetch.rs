use std::path::Path;

use serde_json::Value;

use crate::error::FetchError;

/// Document names that are never worth fetching.
pub const SKIP_DOCUMENTS: &[&str] = &[
    "version_openapi.json",
    "apis__resource.k8s.io__v1alpha2_openapi.json",
    "apis__internal.apiserver.k8s.io__v1alpha1_openapi.json",
    "apis__storagemigration.k8s.io__v1alpha1_openapi.json",
];

/// A schema document advertised by a source, not yet downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub name: String,
    pub path: String,
    pub url: String,
}

impl DocumentRef {
    /// Whether this entry is a version marker, a denylisted document or not
    /// a JSON schema document at all.
    pub fn should_skip(&self) -> bool {
        let path = Path::new(self.path.split('?').next().unwrap_or_default());
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let last_segment = stem.rsplit("__").next().unwrap_or_default();
        let wrong_extension = path
            .extension()
            .is_some_and(|ext| ext.to_str() != Some("json"));

        !last_segment.starts_with('v')
            || stem == "version"
            || SKIP_DOCUMENTS.contains(&self.name.as_str())
            || wrong_extension
    }
}

/// Where raw OpenAPI documents come from.
///
/// Implementations perform blocking I/O; every failure is fatal for the run.
pub trait SchemaSource {
    /// Enumerate candidate documents. Entries for which
    /// [`DocumentRef::should_skip`] holds are filtered out by the caller.
    fn list_documents(&self) -> Result<Vec<DocumentRef>, FetchError>;

    /// Download one document as JSON.
    fn fetch(&self, document: &DocumentRef) -> Result<Value, FetchError>;

    /// Resolve the release tag the documents belong to.
    fn resolve_version(&self) -> Result<String, FetchError>;
}
