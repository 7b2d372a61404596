//! This module defines the `FilterCriteria` record consumed by the filter
//! pipeline.

use serde::{Deserialize, Serialize};

use super::{AlertStatus, Severity};

/// The set of criteria an alert must satisfy to survive filtering.
///
/// All fields are optional; criteria are combined with logical AND, and an
/// absent or empty criterion always passes (the "all" default, not "none").
///
/// Note the inherited asymmetry: `location_contains` matches
/// case-insensitively while `source_contains` matches case-sensitively.
/// This mirrors the existing product contract and is preserved as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Severities to include. Empty means all severities pass.
    #[serde(default)]
    pub severities: Vec<Severity>,

    /// Statuses to include. Empty means all statuses pass.
    #[serde(default)]
    pub statuses: Vec<AlertStatus>,

    /// Case-insensitive substring match against `Alert::location`.
    #[serde(default)]
    pub location_contains: Option<String>,

    /// Case-sensitive substring match against `Alert::source`.
    #[serde(default)]
    pub source_contains: Option<String>,
}

impl FilterCriteria {
    /// Creates a match-everything criteria record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts matching to the given severities.
    pub fn with_severities(mut self, severities: Vec<Severity>) -> Self {
        self.severities = severities;
        self
    }

    /// Restricts matching to the given statuses.
    pub fn with_statuses(mut self, statuses: Vec<AlertStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Restricts matching to alerts whose location contains `needle`
    /// (case-insensitive).
    pub fn with_location_contains(mut self, needle: impl Into<String>) -> Self {
        self.location_contains = Some(needle.into());
        self
    }

    /// Restricts matching to alerts whose source contains `needle`
    /// (case-sensitive).
    pub fn with_source_contains(mut self, needle: impl Into<String>) -> Self {
        self.source_contains = Some(needle.into());
        self
    }

    /// Whether no criterion is present, i.e. every alert passes.
    pub fn is_empty(&self) -> bool {
        self.severities.is_empty()
            && self.statuses.is_empty()
            && self.location_contains.is_none()
            && self.source_contains.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_is_empty() {
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn builder_style_setters_populate_fields() {
        let criteria = FilterCriteria::new()
            .with_severities(vec![Severity::Critical])
            .with_location_contains("Beijing");
        assert!(!criteria.is_empty());
        assert_eq!(criteria.severities, vec![Severity::Critical]);
        assert_eq!(criteria.location_contains.as_deref(), Some("Beijing"));
        assert!(criteria.source_contains.is_none());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let criteria: FilterCriteria = serde_json::from_str("{}").unwrap();
        assert!(criteria.is_empty());
    }
}
