//! HTTP graph source backed by a blocking `reqwest` client.

use super::GraphSource;
use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, PROTOBUF_CONTENT_TYPE};
use crate::utils::error::SourceError;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;

/// Fetches graph payloads from an HTTP endpoint
///
/// Sends a POST with a JSON body when one is set, a GET otherwise.
pub struct HttpSource {
    client: Client,
    url: String,
    body: Option<serde_json::Value>,
}

impl HttpSource {
    /// Create a source with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a source with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::RequestFailed)?;

        Ok(Self {
            client,
            url: url.into(),
            body: None,
        })
    }

    /// Send `body` as the JSON payload of a POST request
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GraphSource for HttpSource {
    fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        info!("Fetching graph data from: {}", self.url);

        let request = match &self.body {
            Some(body) => {
                debug!("POST body: {}", body);
                self.client.post(&self.url).json(body)
            }
            None => self.client.get(&self.url),
        };

        let response = request
            .header(ACCEPT, PROTOBUF_CONTENT_TYPE)
            .send()
            .map_err(SourceError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        let bytes = response.bytes().map_err(SourceError::RequestFailed)?;
        debug!("Received {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_keeps_url_and_body() {
        let body = serde_json::json!({ "eventType": "jdk.ExecutionSample" });
        let url = "http://localhost:8585/flamegraph";
        let source = HttpSource::with_timeout(url, Duration::from_secs(2))
            .unwrap()
            .with_body(body.clone());

        assert_eq!(source.url(), url);
        assert_eq!(source.describe(), url);
        assert_eq!(source.body, Some(body));
    }

    #[test]
    fn test_malformed_url_fails_before_connecting() {
        let source = HttpSource::new("not a url").unwrap();
        assert!(matches!(source.fetch(), Err(SourceError::RequestFailed(_))));
    }
}
