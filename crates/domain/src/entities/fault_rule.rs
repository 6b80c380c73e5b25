//! Fault-injection rule model and validator
//!
//! A rule probabilistically injects a delay or an abort between a source and
//! destination service for requests whose scoping header matches a pattern.
//! Rules are validated and normalized before they ever reach the network.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Pattern matching every header value
pub const MATCH_ALL: &str = ".*";

/// A normalized fault-injection rule, ready for submission to the rule store.
///
/// Wire-name quirks of the rule store API: the header pattern travels as
/// `pattern` and the abort code as `return_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultInjectionRule {
    /// Assigned by the rule store; absent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Calling service
    pub source: String,
    /// Called service
    pub destination: String,
    /// Scoping header name
    pub header: String,
    /// Header match pattern (non-anchored)
    #[serde(rename = "pattern")]
    pub header_pattern: String,
    /// Probability of injecting the delay, in `[0, 1]`
    #[serde(default)]
    pub delay_probability: f64,
    /// Injected delay in seconds
    #[serde(default)]
    pub delay: f64,
    /// Probability of injecting the abort, in `[0, 1]`
    #[serde(default)]
    pub abort_probability: f64,
    /// HTTP status returned on abort
    #[serde(default, rename = "return_code", skip_serializing_if = "Option::is_none")]
    pub abort_code: Option<u16>,
}

/// Unvalidated fault-rule input, as collected from the CLI or a scenario.
///
/// `validate` normalizes it into a [`FaultInjectionRule`] or rejects it.
#[derive(Debug, Clone, Default)]
pub struct FaultRuleRequest {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub header: Option<String>,
    pub header_pattern: Option<String>,
    pub delay: f64,
    pub delay_probability: f64,
    pub abort_probability: f64,
    pub abort_code: Option<u16>,
}

impl FaultRuleRequest {
    /// Validate and normalize into a submission-ready rule.
    ///
    /// Rejects when `source`, `destination` or `header` is absent, when a
    /// probability or delay is out of range, or when neither effect pair is
    /// fully specified: `(delay > 0 AND delay_probability > 0)` or
    /// (`abort_code` set AND `abort_probability > 0`). Both pairs may be set
    /// at once.
    ///
    /// A supplied `header_pattern` becomes a non-anchored "contains" match
    /// (`.*?<pattern>`); an omitted one defaults to match-all.
    pub fn validate(self) -> Result<FaultInjectionRule, DomainError> {
        let source = self.source.ok_or_else(|| DomainError::missing_field("source"))?;
        let destination = self
            .destination
            .ok_or_else(|| DomainError::missing_field("destination"))?;
        let header = self.header.ok_or_else(|| DomainError::missing_field("header"))?;

        if !(0.0..=1.0).contains(&self.delay_probability) {
            return Err(DomainError::Validation(
                "delay_probability must be within [0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.abort_probability) {
            return Err(DomainError::Validation(
                "abort_probability must be within [0, 1]".to_string(),
            ));
        }
        if self.delay < 0.0 {
            return Err(DomainError::Validation("delay must be non-negative".to_string()));
        }

        let delay_pair = self.delay > 0.0 && self.delay_probability > 0.0;
        let abort_pair = self.abort_code.is_some() && self.abort_probability > 0.0;
        if !delay_pair && !abort_pair {
            return Err(DomainError::Validation("no effect specified".to_string()));
        }

        let header_pattern = match self.header_pattern {
            Some(pattern) => format!(".*?{pattern}"),
            None => MATCH_ALL.to_string(),
        };

        Ok(FaultInjectionRule {
            id: None,
            source,
            destination,
            header,
            header_pattern,
            delay_probability: self.delay_probability,
            delay: self.delay,
            abort_probability: self.abort_probability,
            abort_code: self.abort_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> FaultRuleRequest {
        FaultRuleRequest {
            source: Some("gateway".to_string()),
            destination: Some("reviews".to_string()),
            header: Some("X-Request-ID".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_missing_source() {
        let request = FaultRuleRequest {
            source: None,
            ..base_request()
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("missing required field: source"));
    }

    #[test]
    fn rejects_missing_destination() {
        let request = FaultRuleRequest {
            destination: None,
            ..base_request()
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("missing required field: destination"));
    }

    #[test]
    fn rejects_missing_header() {
        let request = FaultRuleRequest {
            header: None,
            ..base_request()
        };
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("missing required field: header"));
    }

    #[test]
    fn rejects_rule_with_no_effect() {
        // delay=0, delay_probability=0, abort_code=None
        let err = base_request().validate().unwrap_err();
        assert!(err.to_string().contains("no effect specified"));
    }

    #[test]
    fn rejects_delay_without_probability() {
        let request = FaultRuleRequest {
            delay: 2.0,
            ..base_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn rejects_abort_code_without_probability() {
        let request = FaultRuleRequest {
            abort_code: Some(503),
            ..base_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn accepts_abort_pair_alone() {
        let request = FaultRuleRequest {
            abort_code: Some(503),
            abort_probability: 0.5,
            ..base_request()
        };
        let rule = request.validate().unwrap();
        assert_eq!(rule.abort_code, Some(503));
        assert!((rule.abort_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(rule.delay, 0.0);
    }

    #[test]
    fn accepts_delay_pair_alone() {
        let request = FaultRuleRequest {
            delay: 7.0,
            delay_probability: 1.0,
            ..base_request()
        };
        let rule = request.validate().unwrap();
        assert!((rule.delay - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_both_pairs() {
        let request = FaultRuleRequest {
            delay: 2.0,
            delay_probability: 0.3,
            abort_code: Some(503),
            abort_probability: 0.1,
            ..base_request()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let request = FaultRuleRequest {
            delay: 1.0,
            delay_probability: 1.5,
            ..base_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn pattern_defaults_to_match_all() {
        let request = FaultRuleRequest {
            abort_code: Some(503),
            abort_probability: 0.5,
            ..base_request()
        };
        let rule = request.validate().unwrap();
        assert_eq!(rule.header_pattern, ".*");
    }

    #[test]
    fn pattern_becomes_contains_match() {
        let request = FaultRuleRequest {
            header_pattern: Some("test-123".to_string()),
            abort_code: Some(503),
            abort_probability: 0.5,
            ..base_request()
        };
        let rule = request.validate().unwrap();
        assert_eq!(rule.header_pattern, ".*?test-123");
    }

    #[test]
    fn validated_rule_has_no_id() {
        let request = FaultRuleRequest {
            abort_code: Some(503),
            abort_probability: 0.5,
            ..base_request()
        };
        assert_eq!(request.validate().unwrap().id, None);
    }

    #[test]
    fn wire_names_for_pattern_and_return_code() {
        let request = FaultRuleRequest {
            abort_code: Some(404),
            abort_probability: 0.5,
            ..base_request()
        };
        let json = serde_json::to_value(request.validate().unwrap()).unwrap();
        assert_eq!(json["pattern"], ".*");
        assert_eq!(json["return_code"], 404);
        assert!(json.get("abort_code").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn deserializes_store_response() {
        let rule: FaultInjectionRule = serde_json::from_str(
            r#"{"id":"r-1","source":"gateway","destination":"reviews",
                "header":"X-Request-ID","pattern":".*","delay_probability":0.0,
                "delay":0.0,"abort_probability":0.5,"return_code":503}"#,
        )
        .unwrap();
        assert_eq!(rule.id.as_deref(), Some("r-1"));
        assert_eq!(rule.abort_code, Some(503));
    }
}
