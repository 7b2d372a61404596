//! Data model for the alert feed.

mod alert;
mod criteria;

pub use alert::{Alert, AlertStatus, Severity};
pub use criteria::FilterCriteria;
