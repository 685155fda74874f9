//! Shared HTTP plumbing for source adapters

use curator_common::config::HttpClientConfig;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::types::SourceError;

/// Build the outbound client every adapter shares
///
/// The per-request timeout bounds how long one slow museum can hold up an
/// aggregate search.
pub fn build_client(config: &HttpClientConfig) -> reqwest::Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
}

/// GET `url` with `query` and decode the JSON body
///
/// `label` names the request in errors and logs; the query string is never
/// logged since it may carry an API key.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    label: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, SourceError> {
    debug!(request = label, "Upstream request");

    let response = client.get(url).query(query).send().await.map_err(|e| {
        if e.is_timeout() {
            SourceError::UpstreamUnavailable(format!("{} timed out", label))
        } else {
            SourceError::UpstreamUnavailable(format!("{} request failed: {}", label, e.without_url()))
        }
    })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(label.to_string()));
    }
    if !status.is_success() {
        return Err(SourceError::UpstreamUnavailable(format!(
            "{} returned {}",
            label, status
        )));
    }

    let body = response.bytes().await.map_err(|e| {
        SourceError::UpstreamUnavailable(format!("{} body read failed: {}", label, e.without_url()))
    })?;

    serde_json::from_slice(&body)
        .map_err(|e| SourceError::MalformedResponse(format!("{}: {}", label, e)))
}
