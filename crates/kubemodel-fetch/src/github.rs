use kubemodel_core::config::{GithubConfig, TimeoutConfig};
use kubemodel_core::error::FetchError;
use kubemodel_core::fetch::{DocumentRef, SchemaSource};
use serde::Deserialize;
use serde_json::Value;

use crate::client::HttpClient;

/// Version name that follows the newest published release.
pub const LATEST_VERSION: &str = "master";

/// Repository directory holding one OpenAPI v3 document per group version.
const SPEC_DIR: &str = "api/openapi-spec/v3";

/// One entry of the repository contents API.
#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Reads the documents checked into a Kubernetes source repository.
pub struct GithubSource {
    api_url: String,
    owner: String,
    repo: String,
    version: String,
    client: HttpClient,
}

impl GithubSource {
    pub fn new(config: &GithubConfig, timeouts: &TimeoutConfig) -> Self {
        let client = HttpClient::new(timeouts).with_header("Accept", "application/vnd.github+json");
        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            version: config.version.clone(),
            client,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.api_url, self.owner, self.repo)
    }

    fn contents_url(&self) -> String {
        self.repo_url(&format!("contents/{SPEC_DIR}"))
    }

    fn release_url(&self) -> String {
        if self.version == LATEST_VERSION {
            self.repo_url("releases/latest")
        } else {
            self.repo_url(&format!("releases/tags/{}", self.version))
        }
    }
}

/// Files only; directories and entries without a download URL are dropped.
fn document_refs(entries: Vec<ContentEntry>) -> Vec<DocumentRef> {
    entries
        .into_iter()
        .filter(|entry| entry.kind == "file")
        .filter_map(|entry| {
            Some(DocumentRef {
                url: entry.download_url?,
                name: entry.name,
                path: entry.path,
            })
        })
        .collect()
}

impl SchemaSource for GithubSource {
    fn list_documents(&self) -> Result<Vec<DocumentRef>, FetchError> {
        let entries: Vec<ContentEntry> = self
            .client
            .get_json(&self.contents_url(), &[("ref", self.version.as_str())])?;
        Ok(document_refs(entries))
    }

    fn fetch(&self, document: &DocumentRef) -> Result<Value, FetchError> {
        self.client.get_json(&document.url, &[])
    }

    fn resolve_version(&self) -> Result<String, FetchError> {
        let tag = if self.version == LATEST_VERSION {
            "latest"
        } else {
            self.version.as_str()
        };
        log::info!("Fetching release {tag}");
        let release: Release = self.client.get_json(&self.release_url(), &[])?;
        log::info!("Resolved k8s version: {}", release.tag_name);
        Ok(release.tag_name)
    }
}
