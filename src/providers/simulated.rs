//! A stand-in alert source used in place of a real backend.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;

use super::traits::{AlertSource, AlertSourceError};
use crate::models::{Alert, AlertStatus, Severity};

/// A simulated alert source seeded with representative alerts.
///
/// Every fetch returns the seed alerts with jittered recency timestamps so a
/// dashboard polling it looks live. Ids are fixed, so status updates and
/// selection keep working across refreshes. Swapping in a real backend means
/// implementing [`AlertSource`] elsewhere; nothing in the engine changes.
pub struct SimulatedAlertSource {
    seeds: Vec<Alert>,
}

impl SimulatedAlertSource {
    /// Creates a source with the default seed alerts.
    pub fn new() -> Self {
        Self { seeds: seed_alerts() }
    }

    /// Creates a source with a caller-provided seed collection.
    pub fn with_seeds(seeds: Vec<Alert>) -> Self {
        Self { seeds }
    }
}

impl Default for SimulatedAlertSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSource for SimulatedAlertSource {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, AlertSourceError> {
        let mut rng = rand::thread_rng();
        let alerts = self
            .seeds
            .iter()
            .cloned()
            .map(|mut alert| {
                let minutes_ago = rng.gen_range(1..45);
                alert.timestamp = Utc::now() - ChronoDuration::minutes(minutes_ago);
                alert
            })
            .collect();
        Ok(alerts)
    }
}

fn seed_alerts() -> Vec<Alert> {
    let now = Utc::now();
    vec![
        Alert {
            id: "1".into(),
            severity: Severity::Critical,
            title: "DDoS attack detected".into(),
            description: "High volume of anomalous requests from multiple IP addresses".into(),
            source: "192.168.1.100".into(),
            location: "Beijing".into(),
            timestamp: now - ChronoDuration::minutes(2),
            status: AlertStatus::Active,
        },
        Alert {
            id: "2".into(),
            severity: Severity::High,
            title: "Malware infection".into(),
            description: "Trojan found on host, attempted access to sensitive files".into(),
            source: "192.168.1.156".into(),
            location: "Shanghai".into(),
            timestamp: now - ChronoDuration::minutes(8),
            status: AlertStatus::Investigating,
        },
        Alert {
            id: "3".into(),
            severity: Severity::Medium,
            title: "Anomalous login attempts".into(),
            description: "Repeated failed logins from an unknown geolocation".into(),
            source: "203.45.67.89".into(),
            location: "United States".into(),
            timestamp: now - ChronoDuration::minutes(15),
            status: AlertStatus::Investigating,
        },
        Alert {
            id: "4".into(),
            severity: Severity::Low,
            title: "Port scan".into(),
            description: "Scanning behavior observed across multiple ports".into(),
            source: "172.16.0.45".into(),
            location: "Shenzhen".into(),
            timestamp: now - ChronoDuration::minutes(23),
            status: AlertStatus::Resolved,
        },
        Alert {
            id: "5".into(),
            severity: Severity::Medium,
            title: "Data exfiltration risk".into(),
            description: "Sensitive data observed in transit over an unauthorized channel".into(),
            source: "10.0.0.88".into(),
            location: "Guangzhou".into(),
            timestamp: now - ChronoDuration::minutes(35),
            status: AlertStatus::Active,
        },
    ]
}
