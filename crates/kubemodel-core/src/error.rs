use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response body from {url}: {message}")]
    Body { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed document {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("no schema found")]
    NoSchemaFound,

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize merged schema: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema {name}: {source}")]
    InvalidSchema {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unresolved reference {reference} in {schema}")]
    UnresolvedRef { schema: String, reference: String },

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Template(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
