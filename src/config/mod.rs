//! Configuration module for alertfeed.

mod app_config;
mod helpers;

pub use app_config::AppConfig;
pub use helpers::{deserialize_duration_from_ms, serialize_duration_to_ms};
