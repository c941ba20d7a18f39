use std::time::Duration;

use kubemodel_core::config::TimeoutConfig;
use kubemodel_core::error::FetchError;
use serde::de::DeserializeOwned;

pub const USER_AGENT: &str = concat!("kubemodel/", env!("CARGO_PKG_VERSION"));

/// Blocking JSON client shared by the sources.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    headers: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(timeouts.connect_secs))
            .timeout_read(Duration::from_secs(timeouts.read_secs))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            headers: Vec::new(),
        }
    }

    /// Send `header: value` with every request.
    pub fn with_header(mut self, header: &str, value: &str) -> Self {
        self.headers.push((header.to_string(), value.to_string()));
        self
    }

    pub fn with_bearer_token(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with_header("Authorization", &format!("Bearer {token}")),
            None => self,
        }
    }

    /// GET `url` and decode the body as JSON.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        log::debug!("GET {url}");
        let mut request = self.agent.get(url);
        for (header, value) in &self.headers {
            request = request.set(header, value);
        }
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|err| request_error(url, err))?;
        response.into_json().map_err(|err| FetchError::Body {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

fn request_error(url: &str, err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(status, _) => FetchError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => FetchError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}
