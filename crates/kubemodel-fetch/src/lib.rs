//! Schema sources that read OpenAPI v3 documents over HTTP.
//!
//! [`ClusterSource`] walks a live API server's discovery index, while
//! [`GithubSource`] lists the checked-in documents of a Kubernetes release.

mod client;
mod cluster;
mod github;

pub use client::{HttpClient, USER_AGENT};
pub use cluster::ClusterSource;
pub use github::{GithubSource, LATEST_VERSION};
