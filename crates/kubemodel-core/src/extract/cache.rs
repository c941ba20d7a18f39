use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use walkdir::WalkDir;

use super::merge::{BucketStrategy, MergedSchema, SchemaMerger};
use super::metadata::SchemaMetadata;
use crate::error::{ExtractError, ParseError};
use crate::fetch::SchemaSource;
use crate::parse;

/// Runs fetch and merge against a [`SchemaSource`] and persists the result,
/// reusing an existing output directory instead of fetching again.
pub struct Extractor<S> {
    source: S,
    /// `None` means one bucket named after the source's release tag,
    /// resolved only when a fetch actually happens.
    strategy: Option<BucketStrategy>,
}

impl<S: SchemaSource> Extractor<S> {
    pub fn new(source: S, strategy: BucketStrategy) -> Self {
        Self {
            source,
            strategy: Some(strategy),
        }
    }

    /// Single-bucket extraction named after [`SchemaSource::resolve_version`].
    pub fn for_release(source: S) -> Self {
        Self {
            source,
            strategy: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Produce the merged documents under `output_dir`.
    ///
    /// If the directory already exists nothing is fetched and every `*.json`
    /// file below it is returned, sorted by path. Otherwise the source is read
    /// in full, merged, and one `<bucket>.json` per bucket is written. Returned
    /// paths are absolute.
    pub fn extract(&self, output_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        if output_dir.is_dir() {
            log::debug!("Reusing extracted specs in {}", output_dir.display());
            return cached_documents(output_dir);
        }

        let buckets = self.fetch_and_merge()?;

        let mut written = Vec::with_capacity(buckets.len());
        for (bucket, merged) in &buckets {
            let path = output_dir.join(format!("{bucket}.json"));
            write_merged(&path, merged)?;
            log::info!("Wrote {}", path.display());
            written.push(absolute(&path)?);
        }
        Ok(written)
    }

    /// Fetch every listed document in order and merge them.
    pub fn fetch_and_merge(&self) -> Result<IndexMap<String, MergedSchema>, ExtractError> {
        let strategy = match &self.strategy {
            Some(strategy) => strategy.clone(),
            None => BucketStrategy::for_release(&self.source.resolve_version()?),
        };
        let mut merger = SchemaMerger::new(strategy);

        for document in self.source.list_documents()? {
            if document.should_skip() {
                log::debug!("Skipping {}", document.name);
                continue;
            }
            log::info!("Fetching specs for {}", document.name);
            let value = self.source.fetch(&document)?;
            let malformed = |source: ParseError| ExtractError::Malformed {
                name: document.name.clone(),
                source,
            };

            // Classify from the header alone; an unsupported document's
            // components are never parsed.
            let metadata = SchemaMetadata::from_value(&value).map_err(malformed)?;
            if merger.bucket_for(&metadata).is_none() {
                continue;
            }
            let doc = parse::from_value(value).map_err(malformed)?;
            merger.add(doc);
        }

        merger.finish()
    }
}

/// Every `*.json` file below `dir`, sorted, as absolute paths.
fn cached_documents(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ExtractError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            found.push(absolute(entry.path())?);
        }
    }
    Ok(found)
}

/// Serialize with 4-space indentation and write, creating parent directories.
fn write_merged(path: &Path, merged: &MergedSchema) -> Result<(), ExtractError> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    merged.to_document().serialize(&mut ser)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ExtractError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, buf).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn absolute(path: &Path) -> Result<PathBuf, ExtractError> {
    std::path::absolute(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::{Value, json};

    use super::*;
    use crate::error::FetchError;
    use crate::fetch::DocumentRef;

    struct StaticSource {
        documents: Vec<(String, Value)>,
        fetches: Cell<usize>,
    }

    impl StaticSource {
        fn new(documents: Vec<(&str, Value)>) -> Self {
            Self {
                documents: documents
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
                fetches: Cell::new(0),
            }
        }
    }

    impl SchemaSource for StaticSource {
        fn list_documents(&self) -> Result<Vec<DocumentRef>, FetchError> {
            Ok(self
                .documents
                .iter()
                .map(|(name, _)| DocumentRef {
                    name: name.clone(),
                    path: format!("/openapi/v3/{name}"),
                    url: format!("memory:///openapi/v3/{name}"),
                })
                .collect())
        }

        fn fetch(&self, document: &DocumentRef) -> Result<Value, FetchError> {
            self.fetches.set(self.fetches.get() + 1);
            self.documents
                .iter()
                .find(|(name, _)| *name == document.name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| FetchError::Status {
                    url: document.url.clone(),
                    status: 404,
                })
        }

        fn resolve_version(&self) -> Result<String, FetchError> {
            Ok("v1.30.2".to_string())
        }
    }

    fn document(title: &str, schemas: Value) -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": title, "version": "unversioned"},
            "components": {"schemas": schemas}
        })
    }

    #[test]
    fn test_writes_one_file_per_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("specs");
        let extractor = Extractor::new(
            StaticSource::new(vec![
                ("api/v1", document("Kubernetes", json!({"Pod": {"type": "object"}}))),
                (
                    "apis/example.com/v1",
                    document("Kubernetes CRD Swagger", json!({"Widget": {"type": "object"}})),
                ),
            ]),
            BucketStrategy::ByTitle,
        );

        let paths = extractor.extract(&out).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.is_absolute()));
        assert!(paths[0].ends_with("specs/k8s.json"));
        assert!(paths[1].ends_with("specs/crd.json"));
    }

    #[test]
    fn test_persisted_layout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("specs");
        let extractor = Extractor::new(
            StaticSource::new(vec![(
                "api/v1",
                document("Kubernetes", json!({"Pod": {"type": "object"}})),
            )]),
            BucketStrategy::ByTitle,
        );
        let paths = extractor.extract(&out).unwrap();
        insta::assert_snapshot!(fs::read_to_string(&paths[0]).unwrap(), @r#"
{
    "openapi": "3.0.0",
    "info": {
        "title": "Kubernetes",
        "version": "unversioned"
    },
    "components": {
        "schemas": {
            "Pod": {
                "type": "object"
            }
        }
    }
}
"#);
    }

    #[test]
    fn test_existing_directory_skips_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("specs");
        let extractor = Extractor::new(
            StaticSource::new(vec![(
                "api/v1",
                document("Kubernetes", json!({"Pod": {"type": "object"}})),
            )]),
            BucketStrategy::ByTitle,
        );

        let first = extractor.extract(&out).unwrap();
        assert_eq!(extractor.source().fetches.get(), 1);

        let second = extractor.extract(&out).unwrap();
        assert_eq!(extractor.source().fetches.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_scans_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("nested/a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let extractor = Extractor::new(StaticSource::new(vec![]), BucketStrategy::ByTitle);
        let paths = extractor.extract(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("b.json"));
        assert!(paths[1].ends_with("nested/a.json"));
        assert_eq!(extractor.source().fetches.get(), 0);
    }

    #[test]
    fn test_only_unsupported_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("specs");
        let extractor = Extractor::new(
            StaticSource::new(vec![("api/v1", document("Istio", json!({"A": {}})))]),
            BucketStrategy::ByTitle,
        );
        assert!(matches!(
            extractor.extract(&out),
            Err(ExtractError::NoSchemaFound)
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(
            StaticSource::new(vec![("api/v1", json!({"openapi": "3.0.0"}))]),
            BucketStrategy::ByTitle,
        );
        let err = extractor.extract(&dir.path().join("specs")).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed { ref name, .. } if name == "api/v1"));
    }

    #[test]
    fn test_skipped_entries_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(
            StaticSource::new(vec![
                ("version", document("Kubernetes", json!({"Info": {}}))),
                ("api/v1", document("Kubernetes", json!({"Pod": {}}))),
            ]),
            BucketStrategy::ByTitle,
        );
        extractor.extract(&dir.path().join("specs")).unwrap();
        assert_eq!(extractor.source().fetches.get(), 1);
    }

    #[test]
    fn test_release_bucket_resolved_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::for_release(StaticSource::new(vec![(
            "api/v1",
            document("Kubernetes", json!({"Pod": {}})),
        )]));
        let paths = extractor.extract(&dir.path().join("specs")).unwrap();
        assert!(paths[0].ends_with("specs/v1_30_2.json"));
    }
}
