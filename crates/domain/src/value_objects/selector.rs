//! Version selector mini-language
//!
//! A selector routes traffic matching a rule to a specific service version.
//! The routing policy store persists an ordered selector list as a compact
//! string: `{v1={rule1},v2={rule2}}`. The human-facing short form on input
//! is `version(rule)`.
//!
//! Decoding strips the outer braces, splits on top-level commas, normalizes
//! each segment's inner braces to the `#` delimiter pair and parses
//! `version=#rule#`. A malformed segment fails with an error naming the
//! fragment; data is never silently dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A `(version, rule)` pair routing matching traffic to a service version.
///
/// `rule` is an opaque matching predicate (for example a header-match
/// expression). Order matters in a selector list: evaluation is first-match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSelector {
    /// Target version for matching traffic
    pub version: String,
    /// Opaque matching predicate
    pub rule: String,
}

impl VersionSelector {
    /// Create a selector from version and rule parts
    pub fn new(version: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            rule: rule.into(),
        }
    }

    /// Parse the human-facing short form `version(rule)`
    pub fn parse_short_form(text: &str) -> Result<Self, DomainError> {
        let (version, rest) = text
            .split_once('(')
            .ok_or_else(|| DomainError::format(text, "expected 'version(rule)'"))?;
        let rule = rest
            .strip_suffix(')')
            .ok_or_else(|| DomainError::format(text, "missing closing ')'"))?;
        if version.is_empty() {
            return Err(DomainError::format(text, "empty version"));
        }
        Ok(Self::new(version, rule))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.version, self.rule)
    }
}

/// Encode an ordered selector list into its stored form.
///
/// An empty list encodes to an empty string, not `{}`: presence of policy
/// is distinguished from an empty selector list at the routing-view layer.
pub fn encode_selectors(selectors: &[VersionSelector]) -> String {
    if selectors.is_empty() {
        return String::new();
    }
    let segments: Vec<String> = selectors
        .iter()
        .map(|s| format!("{}={{{}}}", s.version, s.rule))
        .collect();
    format!("{{{}}}", segments.join(","))
}

/// Decode the stored form back into an ordered selector list
pub fn decode_selectors(text: &str) -> Result<Vec<VersionSelector>, DomainError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| DomainError::format(text, "missing outer braces"))?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(inner).into_iter().map(decode_segment).collect()
}

/// Split on commas at inner-brace depth zero
fn split_top_level(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&s[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }
    segments.push(&s[start..]);
    segments
}

fn decode_segment(segment: &str) -> Result<VersionSelector, DomainError> {
    let normalized = segment.replace(['{', '}'], "#");
    let (version, delimited) = normalized
        .split_once('=')
        .ok_or_else(|| DomainError::format(segment, "missing '='"))?;
    let rule = delimited
        .strip_prefix('#')
        .and_then(|r| r.strip_suffix('#'))
        .ok_or_else(|| DomainError::format(segment, "rule body not '#'-delimited"))?;
    if rule.contains('#') {
        return Err(DomainError::format(segment, "unbalanced rule delimiters"));
    }
    if version.is_empty() {
        return Err(DomainError::format(segment, "empty version"));
    }
    Ok(VersionSelector::new(version, rule))
}
