//! Log-store assertion checker
//!
//! Evaluates checklist assertions by posting bounded-time-window count
//! queries to the log store: an assertion passes when the store reports no
//! violating log entries inside the experiment window. With
//! continue-on-error, a failed query becomes a FAIL result carrying the
//! error instead of aborting the remaining assertions.

use application::{ApplicationError, AssertionCheckerPort};
use async_trait::async_trait;
use domain::{
    Assertion, AssertionOutcome, AssertionResult, Checklist, ExperimentWindow,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::http::ClientError;

/// Assertion checker backed by the external log store
#[derive(Debug, Clone, Default)]
pub struct LogStoreAssertionChecker {
    client: reqwest::Client,
}

impl LogStoreAssertionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn check_one(
        &self,
        log_server: &str,
        header: &str,
        pattern: &str,
        window: &ExperimentWindow,
        assertion: &Assertion,
    ) -> Result<AssertionResult, ClientError> {
        let url = format!("{}/logs/_count", log_server.trim_end_matches('/'));
        let query = CountQuery {
            check: &assertion.name,
            source: &assertion.source,
            destination: &assertion.destination,
            header,
            pattern: &format!(".*?{pattern}"),
            start_time: window.start_rfc3339(),
            end_time: window.end_rfc3339(),
            params: &assertion.params,
        };

        let response = self
            .client
            .post(&url)
            .json(&query)
            .send()
            .await
            .map_err(|source| ClientError::Connection {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                method: "POST",
                url,
                status,
                body,
            });
        }
        let count: CountResponse =
            response.json().await.map_err(|source| ClientError::Parse {
                url,
                reason: source.to_string(),
            })?;

        debug!(check = %assertion.name, violations = count.count, "assertion evaluated");
        let (outcome, error_message) = if count.count == 0 {
            (AssertionOutcome::Pass, None)
        } else {
            (
                AssertionOutcome::Fail,
                Some(format!("{} violating log entries in window", count.count)),
            )
        };
        Ok(AssertionResult {
            name: assertion.name.clone(),
            source: assertion.source.clone(),
            destination: assertion.destination.clone(),
            outcome,
            error_message,
        })
    }
}

#[derive(Serialize)]
struct CountQuery<'a> {
    check: &'a str,
    source: &'a str,
    destination: &'a str,
    header: &'a str,
    pattern: &'a str,
    start_time: String,
    end_time: String,
    #[serde(flatten)]
    params: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[async_trait]
impl AssertionCheckerPort for LogStoreAssertionChecker {
    #[instrument(skip(self, window, checklist), fields(assertions = checklist.assertions.len()))]
    async fn check_assertions(
        &self,
        log_server: &str,
        header: &str,
        pattern: &str,
        window: &ExperimentWindow,
        checklist: &Checklist,
        continue_on_error: bool,
    ) -> Result<Vec<AssertionResult>, ApplicationError> {
        let mut results = Vec::with_capacity(checklist.assertions.len());
        for assertion in &checklist.assertions {
            match self
                .check_one(log_server, header, pattern, window, assertion)
                .await
            {
                Ok(result) => results.push(result),
                Err(err) if continue_on_error => {
                    warn!(check = %assertion.name, error = %err, "assertion evaluation failed");
                    results.push(AssertionResult {
                        name: assertion.name.clone(),
                        source: assertion.source.clone(),
                        destination: assertion.destination.clone(),
                        outcome: AssertionOutcome::Fail,
                        error_message: Some(err.to_string()),
                    });
                },
                Err(err) => return Err(err.into()),
            }
        }
        Ok(results)
    }
}
