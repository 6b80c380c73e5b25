//! Service registry HTTP client
//!
//! Read-only client for the registry API: service names and registered
//! instances with optional version metadata.

use application::{ApplicationError, ServiceRegistryPort};
use async_trait::async_trait;
use domain::ServiceInstance;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::RegistryConfig;

use super::{ClientError, base_headers, connection_error, expect_status, parse_error};

/// Client for the service registry
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

#[derive(Deserialize)]
struct ServicesEnvelope {
    services: Vec<String>,
}

#[derive(Deserialize)]
struct InstancesEnvelope {
    instances: Vec<ServiceInstance>,
}

impl RegistryClient {
    /// Create a client from registry settings
    pub fn new(config: &RegistryConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: base_headers(config.token.as_deref())?,
        })
    }
}

#[async_trait]
impl ServiceRegistryPort for RegistryClient {
    #[instrument(skip(self))]
    async fn list_services(&self) -> Result<Vec<String>, ApplicationError> {
        let url = format!("{}/api/v1/services", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        let response = expect_status("GET", &url, response, StatusCode::OK).await?;
        let envelope: ServicesEnvelope = response.json().await.map_err(parse_error(&url))?;
        debug!(services = envelope.services.len(), "fetched service list");
        Ok(envelope.services)
    }

    #[instrument(skip(self))]
    async fn service_instances(
        &self,
        service: &str,
    ) -> Result<Vec<ServiceInstance>, ApplicationError> {
        let url = self.service_href(service);
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        let response = expect_status("GET", &url, response, StatusCode::OK).await?;
        let envelope: InstancesEnvelope = response.json().await.map_err(parse_error(&url))?;
        Ok(envelope.instances)
    }

    fn service_href(&self, service: &str) -> String {
        format!("{}/api/v1/services/{service}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_href_points_at_instance_listing() {
        let client = RegistryClient::new(&RegistryConfig {
            base_url: "http://registry.mesh/".to_string(),
            token: None,
        })
        .unwrap();
        assert_eq!(
            client.service_href("reviews"),
            "http://registry.mesh/api/v1/services/reviews"
        );
    }
}
