//! A set of helpers for testing.

use chrono::Utc;

use crate::models::{Alert, AlertStatus, Severity};

/// A builder for creating `Alert` instances in tests.
pub struct AlertBuilder {
    id: String,
    severity: Severity,
    title: Option<String>,
    description: Option<String>,
    source: Option<String>,
    location: Option<String>,
    status: AlertStatus,
}

impl AlertBuilder {
    /// Creates a new `AlertBuilder` with the given id.
    pub fn new(id: &str) -> Self {
        AlertBuilder {
            id: id.to_string(),
            severity: Severity::Medium,
            title: None,
            description: None,
            source: None,
            location: None,
            status: AlertStatus::Active,
        }
    }

    /// Sets the severity for the alert.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the title for the alert.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Sets the source address for the alert.
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Sets the location for the alert.
    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Sets the status for the alert.
    pub fn status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    /// Builds the `Alert`.
    pub fn build(self) -> Alert {
        Alert {
            title: self.title.unwrap_or_else(|| format!("Alert {}", self.id)),
            description: self.description.unwrap_or_else(|| "test alert".to_string()),
            source: self.source.unwrap_or_else(|| "10.0.0.1".to_string()),
            location: self.location.unwrap_or_else(|| "datacenter-1".to_string()),
            timestamp: Utc::now(),
            id: self.id,
            severity: self.severity,
            status: self.status,
        }
    }
}
