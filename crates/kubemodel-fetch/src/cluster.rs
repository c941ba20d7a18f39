use indexmap::IndexMap;
use kubemodel_core::config::{ClusterConfig, TimeoutConfig};
use kubemodel_core::error::{ConfigError, FetchError};
use kubemodel_core::fetch::{DocumentRef, SchemaSource};
use serde::Deserialize;
use serde_json::Value;

use crate::client::HttpClient;

/// Body of `GET /openapi/v3`.
#[derive(Debug, Deserialize)]
struct DiscoveryIndex {
    #[serde(default)]
    paths: IndexMap<String, DiscoveryPath>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryPath {
    #[serde(rename = "serverRelativeURL")]
    server_relative_url: String,
}

/// Body of `GET /version`.
#[derive(Debug, Deserialize)]
struct ServerVersion {
    #[serde(rename = "gitVersion")]
    git_version: String,
}

/// Reads the group-version documents a live API server publishes.
pub struct ClusterSource {
    server: String,
    client: HttpClient,
}

impl ClusterSource {
    pub fn new(config: &ClusterConfig, timeouts: &TimeoutConfig) -> Result<Self, ConfigError> {
        let token = config.bearer_token()?;
        let client = HttpClient::new(timeouts).with_bearer_token(token.as_deref());
        Ok(Self {
            server: config.server.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn url(&self, relative: &str) -> String {
        format!("{}/{}", self.server, relative.trim_start_matches('/'))
    }

    fn document_refs(&self, index: DiscoveryIndex) -> Vec<DocumentRef> {
        index
            .paths
            .into_iter()
            .map(|(name, path)| DocumentRef {
                url: self.url(&path.server_relative_url),
                path: path.server_relative_url,
                name,
            })
            .collect()
    }
}

impl SchemaSource for ClusterSource {
    fn list_documents(&self) -> Result<Vec<DocumentRef>, FetchError> {
        let index: DiscoveryIndex = self.client.get_json(&self.url("openapi/v3"), &[])?;
        log::debug!("Cluster advertises {} documents", index.paths.len());
        Ok(self.document_refs(index))
    }

    fn fetch(&self, document: &DocumentRef) -> Result<Value, FetchError> {
        self.client.get_json(&document.url, &[])
    }

    fn resolve_version(&self) -> Result<String, FetchError> {
        let version: ServerVersion = self.client.get_json(&self.url("version"), &[])?;
        log::info!("Resolved cluster version: {}", version.git_version);
        Ok(version.git_version)
    }
}
