use std::cell::Cell;
use std::fs;

use kubemodel_core::error::{ExtractError, FetchError};
use kubemodel_core::extract::{BucketStrategy, Extractor};
use kubemodel_core::fetch::{DocumentRef, SchemaSource};
use kubemodel_core::parse;
use serde_json::{Value, json};

const APPS_V1: &str = include_str!("fixtures/apps_v1.json");
const CORE_V1: &str = include_str!("fixtures/core_v1.json");
const CRD_WIDGETS: &str = include_str!("fixtures/crd_widgets.json");
const UNSUPPORTED: &str = include_str!("fixtures/unsupported.json");
const SWAGGER_V2: &str = include_str!("fixtures/swagger_v2.json");

/// Serves fixture documents the way a cluster's discovery index would.
struct FixtureSource {
    documents: Vec<(String, String)>,
    fetches: Cell<usize>,
}

impl FixtureSource {
    fn new(documents: Vec<(&str, &str)>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
            fetches: Cell::new(0),
        }
    }
}

impl SchemaSource for FixtureSource {
    fn list_documents(&self) -> Result<Vec<DocumentRef>, FetchError> {
        Ok(self
            .documents
            .iter()
            .map(|(name, _)| DocumentRef {
                name: name.to_string(),
                path: format!("/openapi/v3/{name}?hash=0"),
                url: format!("http://127.0.0.1:8001/openapi/v3/{name}?hash=0"),
            })
            .collect())
    }

    fn fetch(&self, document: &DocumentRef) -> Result<Value, FetchError> {
        self.fetches.set(self.fetches.get() + 1);
        let (_, body) = self
            .documents
            .iter()
            .find(|(name, _)| *name == document.name)
            .ok_or_else(|| FetchError::Status {
                url: document.url.clone(),
                status: 404,
            })?;
        serde_json::from_str(body).map_err(|e| FetchError::Body {
            url: document.url.clone(),
            message: e.to_string(),
        })
    }

    fn resolve_version(&self) -> Result<String, FetchError> {
        Ok("v1.30.2".to_string())
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn extract_buckets_by_title() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let pod = json!({
        "openapi": "3.0.0",
        "info": {"title": "Kubernetes", "version": "v1.30.2"},
        "components": {"schemas": {"io.k8s.api.core.v1.Pod": {"type": "object"}}}
    })
    .to_string();
    let widget = json!({
        "openapi": "3.0.0",
        "info": {"title": "Kubernetes CRD Swagger", "version": "v0.1.0"},
        "components": {"schemas": {"com.example.v1.Widget": {"type": "object"}}}
    })
    .to_string();
    let source = FixtureSource::new(vec![("api/v1", pod.as_str()), ("apis/example.com/v1", widget.as_str())]);

    let written = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap();

    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|p| p.is_absolute()));
    assert!(written[0].ends_with("specs/k8s.json"));
    assert!(written[1].ends_with("specs/crd.json"));

    let k8s = read_json(&written[0]);
    assert_eq!(
        k8s["components"]["schemas"],
        json!({"io.k8s.api.core.v1.Pod": {"type": "object"}})
    );
    let crd = read_json(&written[1]);
    assert_eq!(
        crd["components"]["schemas"],
        json!({"com.example.v1.Widget": {"type": "object"}})
    );

    // The persisted documents are themselves valid input.
    let reparsed = parse::from_json(&fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(reparsed.info.title, "Kubernetes CRD Swagger");
}

#[test]
fn extract_merges_groups_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let source = FixtureSource::new(vec![("apis/apps/v1", APPS_V1), ("api/v1", CORE_V1)]);

    let written = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap();
    assert_eq!(written.len(), 1);

    let merged = parse::from_json(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert!(merged.components.schemas.contains_key("io.k8s.api.apps.v1.Deployment"));
    assert!(merged.components.schemas.contains_key("io.k8s.api.core.v1.Pod"));

    // core/v1 came second, so its ObjectMeta replaced the apps/v1 copy.
    let meta = &merged.components.schemas["io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta"];
    assert!(meta["properties"].get("uid").is_some());
    assert!(meta["properties"].get("annotations").is_none());

    // Metadata is taken from the first contributing document.
    assert_eq!(merged.info.version, "v1.30.2");
}

#[test]
fn extract_skips_unsupported_documents() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let source = FixtureSource::new(vec![
        ("apis/networking.istio.io/v1", UNSUPPORTED),
        ("api/v1", CORE_V1),
        ("apis/legacy/v1", SWAGGER_V2),
    ]);

    let written = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("k8s.json"));

    let merged = read_json(&written[0]);
    let schemas = merged["components"]["schemas"].as_object().unwrap();
    assert!(!schemas.contains_key("io.istio.networking.v1.Gateway"));
    assert_eq!(schemas.len(), 3);
}

#[test]
fn extract_skips_unsupported_before_reading_components() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let istio = json!({
        "openapi": "3.0.0",
        "info": {"title": "Istio", "version": "v1"},
        "components": {"schemas": []}
    })
    .to_string();
    let source = FixtureSource::new(vec![
        ("apis/networking.istio.io/v1", istio.as_str()),
        ("api/v1", CORE_V1),
    ]);

    let written = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("k8s.json"));
}

#[test]
fn extract_missing_info_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let source = FixtureSource::new(vec![
        ("api/v1", CORE_V1),
        ("apis/broken/v1", r#"{"openapi": "3.0.0", "components": {}}"#),
    ]);

    let err = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap_err();
    assert!(matches!(err, ExtractError::Malformed { ref name, .. } if name == "apis/broken/v1"));
    assert!(!specs.exists());
}

#[test]
fn extract_nothing_supported() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let source = FixtureSource::new(vec![("apis/networking.istio.io/v1", UNSUPPORTED)]);

    let err = Extractor::new(source, BucketStrategy::ByTitle)
        .extract(&specs)
        .unwrap_err();
    assert!(matches!(err, ExtractError::NoSchemaFound));
    assert!(!specs.exists());
}

#[test]
fn extract_reuses_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");

    let extractor = Extractor::new(
        FixtureSource::new(vec![("api/v1", CORE_V1), ("apis/example.com/v1", CRD_WIDGETS)]),
        BucketStrategy::ByTitle,
    );
    let first = extractor.extract(&specs).unwrap();
    assert_eq!(extractor.source().fetches.get(), 2);

    let second = extractor.extract(&specs).unwrap();
    assert_eq!(extractor.source().fetches.get(), 2);

    // Cached results come back in path order.
    let mut expected = first.clone();
    expected.sort();
    assert_eq!(second, expected);
}

#[test]
fn extract_release_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let specs = dir.path().join("specs");
    let extractor = Extractor::for_release(FixtureSource::new(vec![
        ("api/v1", CORE_V1),
        ("apis/example.com/v1", CRD_WIDGETS),
    ]));

    let written = extractor.extract(&specs).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("v1_30_2.json"));

    let merged = read_json(&written[0]);
    let schemas = merged["components"]["schemas"].as_object().unwrap();
    assert!(schemas.contains_key("io.k8s.api.core.v1.Pod"));
    assert!(schemas.contains_key("com.example.v1.Widget"));
}
