//! This module defines the `Alert` record and its enumerated fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The severity of an alert. Ordinal, with no numeric coercion implied.
///
/// Wire input outside the recognized set deserializes to `Unknown` rather
/// than failing; `Unknown` never matches a non-empty severity criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    /// Immediate action required.
    Critical,
    /// High-priority threat.
    High,
    /// Medium-priority threat.
    Medium,
    /// Low-priority or informational.
    Low,
    /// Catch-all for unrecognized wire values.
    Unknown,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }
}

impl Severity {
    /// Whether this value is one of the recognized severities.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unknown)
    }
}

/// The handling status of an alert. The only field the core mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AlertStatus {
    /// The threat is ongoing and unhandled.
    Active,
    /// An analyst is investigating.
    Investigating,
    /// The alert has been resolved.
    Resolved,
    /// Catch-all for unrecognized wire values.
    Unknown,
}

impl From<String> for AlertStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => AlertStatus::Active,
            "investigating" => AlertStatus::Investigating,
            "resolved" => AlertStatus::Resolved,
            _ => AlertStatus::Unknown,
        }
    }
}

impl AlertStatus {
    /// Whether this value is one of the recognized statuses.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AlertStatus::Unknown)
    }
}

/// A single security alert as produced by a refresh cycle.
///
/// Immutable once produced, except for `status`, which is replaced in place
/// by the status-update entry point. `id` is expected to be stable across
/// refreshes for a given real-world alert; sources that regenerate ids break
/// status updates and selection across a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Opaque unique identifier, stable across refreshes.
    pub id: String,

    /// Severity of the threat.
    pub severity: Severity,

    /// Short human-readable title.
    pub title: String,

    /// Longer description of the detection.
    pub description: String,

    /// Originating network address (e.g. an IP).
    pub source: String,

    /// Free-text location of the affected asset.
    pub location: String,

    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,

    /// Current handling status.
    pub status: AlertStatus,
}
