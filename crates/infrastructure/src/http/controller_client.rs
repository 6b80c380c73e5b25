//! Control-plane HTTP client
//!
//! Implements the routing policy store and fault rule store ports against
//! the controller REST API:
//!
//! - `GET/PUT/DELETE /v1/versions[/{service}]` — routing policy
//! - `GET/POST/DELETE /v1/rules` — fault-injection rules (batch create
//!   answers 201 with the assigned ids; delete accepts an optional `id`
//!   query parameter, deleting everything without it)

use std::time::Duration;

use application::{ApplicationError, FaultRuleStorePort, RoutingStorePort};
use async_trait::async_trait;
use domain::{FaultInjectionRule, RoutingPolicy};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ControllerConfig;

use super::{ClientError, base_headers, connection_error, expect_status, parse_error};

/// Client for the mesh control plane
#[derive(Debug, Clone)]
pub struct ControllerClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

#[derive(Deserialize)]
struct VersionsEnvelope {
    versions: Vec<RoutingPolicy>,
}

#[derive(Serialize)]
struct RoutingBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selectors: Option<&'a str>,
}

#[derive(Serialize)]
struct RuleBatch<'a> {
    rules: &'a [FaultInjectionRule],
}

#[derive(Deserialize)]
struct IdsEnvelope {
    ids: Vec<String>,
}

#[derive(Deserialize)]
struct RulesEnvelope {
    rules: Vec<FaultInjectionRule>,
}

impl ControllerClient {
    /// Create a client from controller settings
    pub fn new(config: &ControllerConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: base_headers(config.token.as_deref())?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl RoutingStorePort for ControllerClient {
    #[instrument(skip(self))]
    async fn list_policies(&self) -> Result<Vec<RoutingPolicy>, ApplicationError> {
        let url = self.url("/v1/versions");
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        let response = expect_status("GET", &url, response, StatusCode::OK).await?;
        let envelope: VersionsEnvelope =
            response.json().await.map_err(parse_error(&url))?;
        debug!(policies = envelope.versions.len(), "fetched routing policies");
        Ok(envelope.versions)
    }

    #[instrument(skip(self, policy), fields(service = %policy.service))]
    async fn set_policy(&self, policy: &RoutingPolicy) -> Result<(), ApplicationError> {
        let url = self.url(&format!("/v1/versions/{}", policy.service));
        let body = RoutingBody {
            default: policy.default_version.as_deref(),
            selectors: policy.selectors.as_deref(),
        };
        let response = self
            .client
            .put(&url)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await
            .map_err(connection_error(&url))?;
        expect_status("PUT", &url, response, StatusCode::OK).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_policy(&self, service: &str) -> Result<(), ApplicationError> {
        let url = self.url(&format!("/v1/versions/{service}"));
        let response = self
            .client
            .delete(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        expect_status("DELETE", &url, response, StatusCode::OK).await?;
        Ok(())
    }
}

#[async_trait]
impl FaultRuleStorePort for ControllerClient {
    #[instrument(skip(self, rules), fields(count = rules.len()))]
    async fn create_rules(
        &self,
        rules: &[FaultInjectionRule],
    ) -> Result<Vec<String>, ApplicationError> {
        let url = self.url("/v1/rules");
        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(&RuleBatch { rules })
            .send()
            .await
            .map_err(connection_error(&url))?;
        let response = expect_status("POST", &url, response, StatusCode::CREATED).await?;
        let envelope: IdsEnvelope = response.json().await.map_err(parse_error(&url))?;
        debug!(ids = envelope.ids.len(), "installed fault rules");
        Ok(envelope.ids)
    }

    #[instrument(skip(self))]
    async fn list_rules(&self) -> Result<Vec<FaultInjectionRule>, ApplicationError> {
        let url = self.url("/v1/rules");
        let response = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        let response = expect_status("GET", &url, response, StatusCode::OK).await?;
        let envelope: RulesEnvelope = response.json().await.map_err(parse_error(&url))?;
        Ok(envelope.rules)
    }

    #[instrument(skip(self))]
    async fn delete_rule(&self, id: &str) -> Result<(), ApplicationError> {
        let url = self.url("/v1/rules");
        let response = self
            .client
            .delete(&url)
            .headers(self.headers.clone())
            .query(&[("id", id)])
            .send()
            .await
            .map_err(connection_error(&url))?;
        expect_status("DELETE", &url, response, StatusCode::OK).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_rules(&self) -> Result<(), ApplicationError> {
        let url = self.url("/v1/rules");
        let response = self
            .client
            .delete(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(connection_error(&url))?;
        expect_status("DELETE", &url, response, StatusCode::OK).await?;
        Ok(())
    }
}
