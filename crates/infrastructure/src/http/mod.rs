//! HTTP clients for the control plane and the service registry
//!
//! Both clients hold an immutable base header set (JSON accept plus optional
//! bearer token) built once at construction and cloned per request; per-call
//! additions never mutate the base set.

mod controller_client;
mod registry_client;

use application::ApplicationError;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use thiserror::Error;

pub use controller_client::ControllerClient;
pub use registry_client::RegistryClient;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Remote endpoint could not be contacted
    #[error("could not contact {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote endpoint answered with an unexpected status
    #[error("{method} {url} -> {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body could not be decoded
    #[error("invalid response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// Client could not be constructed
    #[error("client construction failed: {0}")]
    Build(String),
}

impl From<ClientError> for ApplicationError {
    fn from(err: ClientError) -> Self {
        Self::transport(err.to_string())
    }
}

/// Build the immutable base header set shared by every request
fn base_headers(token: Option<&str>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::Build(format!("invalid token: {e}")))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Fail unless the response carries the expected status, preserving the raw
/// response body as error context
async fn expect_status(
    method: &'static str,
    url: &str,
    response: reqwest::Response,
    expected: reqwest::StatusCode,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        method,
        url: url.to_string(),
        status,
        body,
    })
}

fn connection_error(url: &str) -> impl FnOnce(reqwest::Error) -> ClientError + '_ {
    move |source| ClientError::Connection {
        url: url.to_string(),
        source,
    }
}

fn parse_error(url: &str) -> impl FnOnce(reqwest::Error) -> ClientError + '_ {
    move |source| ClientError::Parse {
        url: url.to_string(),
        reason: source.to_string(),
    }
}
