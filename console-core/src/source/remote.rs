//! HTTP data source backed by reqwest.
//!
//! Every failure (connection refused, non-2xx, unparsable body) is surfaced
//! as a `ConsoleError`; nothing is retried here.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{DataSource, Endpoint, Method};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};

#[derive(Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> ConsoleResult<Self> {
        Self::build(base_url, None)
    }

    pub fn from_config(config: &ConsoleConfig) -> ConsoleResult<Self> {
        Self::build(&config.api.base_url, config.request_timeout())
    }

    fn build(base_url: &str, timeout: Option<std::time::Duration>) -> ConsoleResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent("backlog-console");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConsoleError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn send(&self, endpoint: &Endpoint, body: Option<Value>) -> ConsoleResult<Value> {
        if !endpoint.is_remote() {
            return Err(ConsoleError::Unsupported(endpoint.to_string()));
        }

        let url = self.url(endpoint);
        let request = match endpoint.method() {
            Method::Get => self.client.get(&url).query(&endpoint.query()),
            Method::Post => self.client.post(&url).json(&body.unwrap_or(Value::Null)),
        };

        debug!("{} {}", endpoint.method(), endpoint);
        let response = request.send().await.map_err(|source| ConsoleError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConsoleError::Status {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(|source| ConsoleError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn get(&self, endpoint: &Endpoint) -> ConsoleResult<Value> {
        self.send(endpoint, None).await
    }

    async fn post(&self, endpoint: &Endpoint, body: Value) -> ConsoleResult<Value> {
        self.send(endpoint, Some(body)).await
    }
}
