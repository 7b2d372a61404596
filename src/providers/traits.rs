//! This module defines the interface for fetching alert data.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::Alert;

/// Custom error type for alert source operations.
#[derive(Error, Debug)]
pub enum AlertSourceError {
    /// The underlying source failed to produce a result.
    #[error("Source error: {0}")]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// The source can describe its own outage.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// A producer of alert collections.
///
/// Implementations may be a local generator or a remote fetch; the refresh
/// engine does not care, it only needs `fetch_alerts` to complete and hands
/// back its result as the new data set. Implementations should keep alert
/// ids stable across fetches so status updates and selection survive a
/// refresh.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetches the current, full alert collection.
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, AlertSourceError>;
}
