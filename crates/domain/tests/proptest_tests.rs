//! Property-based tests for the domain layer
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{FaultRuleRequest, VersionSelector, decode_selectors, encode_selectors};
use proptest::prelude::*;

fn base_request() -> FaultRuleRequest {
    FaultRuleRequest {
        source: Some("gateway".to_string()),
        destination: Some("reviews".to_string()),
        header: Some("X-Request-ID".to_string()),
        header_pattern: None,
        delay: 0.0,
        delay_probability: 0.0,
        abort_probability: 0.0,
        abort_code: None,
    }
}

mod selector_codec_tests {
    use super::*;

    proptest! {
        // rule bodies are opaque but may not contain braces or '#'
        #[test]
        fn selector_lists_round_trip(
            pairs in proptest::collection::vec(
                ("[a-z][a-z0-9]{0,6}", "[a-zA-Z0-9_=.;+-]{1,16}"),
                0..4,
            )
        ) {
            let selectors: Vec<VersionSelector> = pairs
                .into_iter()
                .map(|(version, rule)| VersionSelector::new(version, rule))
                .collect();
            let encoded = encode_selectors(&selectors);
            let decoded = decode_selectors(&encoded).unwrap();
            prop_assert_eq!(decoded, selectors);
        }

        #[test]
        fn short_form_display_round_trips(
            version in "[a-z][a-z0-9]{0,6}",
            rule in "[a-zA-Z0-9_=.;+-]{1,16}",
        ) {
            let selector = VersionSelector::new(version, rule);
            let parsed = VersionSelector::parse_short_form(&selector.to_string()).unwrap();
            prop_assert_eq!(parsed, selector);
        }
    }

    #[test]
    fn empty_list_encodes_empty_and_back() {
        let encoded = encode_selectors(&[]);
        assert_eq!(encoded, "");
        assert!(decode_selectors(&encoded).unwrap().is_empty());
    }
}

mod fault_rule_tests {
    use super::*;

    proptest! {
        #[test]
        fn abort_rules_with_valid_probability_validate(
            probability in 0.01f64..=1.0,
            code in 400u16..600,
        ) {
            let mut request = base_request();
            request.abort_probability = probability;
            request.abort_code = Some(code);
            prop_assert!(request.validate().is_ok());
        }

        #[test]
        fn out_of_range_probabilities_are_rejected(
            probability in prop_oneof![-10.0f64..-0.001, 1.001f64..10.0],
        ) {
            let mut request = base_request();
            request.abort_probability = probability;
            request.abort_code = Some(503);
            prop_assert!(request.validate().is_err());
        }

        #[test]
        fn delay_rules_scope_the_header_pattern(pattern in "[a-z0-9-]{1,12}") {
            let mut request = base_request();
            request.delay = 0.5;
            request.delay_probability = 1.0;
            request.header_pattern = Some(pattern.clone());
            let rule = request.validate().unwrap();
            prop_assert_eq!(rule.header_pattern, format!(".*?{pattern}"));
        }

        #[test]
        fn effectless_requests_never_validate(
            delay in 0.0f64..=5.0,
        ) {
            // a delay with zero probability is not an effect
            let mut request = base_request();
            request.delay = delay;
            prop_assert!(request.validate().is_err());
        }
    }
}
