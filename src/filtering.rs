//! The filter pipeline: a pure, deterministic narrowing of an alert
//! collection by a [`FilterCriteria`] record.
//!
//! Criteria combine with logical AND; an absent or empty criterion always
//! passes. The filter is stable: surviving alerts keep their relative input
//! order. Unrecognized severity or status values never match a non-empty set
//! criterion, so filtering is total over its input and never errors.

use crate::models::{Alert, FilterCriteria};

/// Returns the alerts matching every present criterion, in input order.
pub fn apply(alerts: &[Alert], criteria: &FilterCriteria) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|alert| matches(alert, criteria))
        .cloned()
        .collect()
}

/// Whether a single alert satisfies every present criterion.
pub fn matches(alert: &Alert, criteria: &FilterCriteria) -> bool {
    if !criteria.severities.is_empty() {
        // An Unknown value on either side of the comparison matches nothing.
        if !alert.severity.is_recognized() || !criteria.severities.contains(&alert.severity) {
            return false;
        }
    }

    if !criteria.statuses.is_empty() {
        if !alert.status.is_recognized() || !criteria.statuses.contains(&alert.status) {
            return false;
        }
    }

    if let Some(needle) = &criteria.location_contains {
        let location = alert.location.to_lowercase();
        if !location.contains(&needle.to_lowercase()) {
            return false;
        }
    }

    if let Some(needle) = &criteria.source_contains {
        if !alert.source.contains(needle.as_str()) {
            return false;
        }
    }

    true
}
