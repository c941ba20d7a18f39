use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration loaded from `.kubemodel.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KubemodelConfig {
    /// Directory generated models are written to.
    pub output_path: String,
    /// Directory merged OpenAPI documents are cached in.
    pub specs_path: String,
    pub source: SourceConfig,
    pub timeouts: TimeoutConfig,
}

impl Default for KubemodelConfig {
    fn default() -> Self {
        Self {
            output_path: "kubemodel_models".to_string(),
            specs_path: "kubemodel_specs".to_string(),
            source: SourceConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Which schema source to read and how to reach it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub cluster: ClusterConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A live API server's `/openapi/v3` discovery endpoint.
    #[default]
    Cluster,
    /// The `api/openapi-spec/v3` directory of a GitHub repository.
    Github,
}

/// API server connection. The default targets `kubectl proxy`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub server: String,
    pub token: Option<String>,
    /// File holding a bearer token, read when `token` is unset.
    pub token_file: Option<PathBuf>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:8001".to_string(),
            token: None,
            token_file: None,
        }
    }
}

impl ClusterConfig {
    /// The bearer token to send, if any. An inline token wins over `token_file`.
    pub fn bearer_token(&self) -> Result<Option<String>, ConfigError> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }
        let Some(path) = &self.token_file else {
            return Ok(None);
        };
        let token = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(token.trim().to_string()))
    }
}

/// Repository holding published OpenAPI documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    /// Git ref to read; `master` resolves to the latest release tag.
    pub version: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: "kubernetes".to_string(),
            repo: "kubernetes".to_string(),
            version: "master".to_string(),
        }
    }
}

/// HTTP timeouts in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect_secs: u64,
    pub read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 3,
            read_secs: 30,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".kubemodel.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<KubemodelConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: KubemodelConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}
