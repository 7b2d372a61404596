#![warn(missing_docs)]
//! Alertfeed is the data layer for a security-alert dashboard: a periodic,
//! cancellable refresh engine paired with a deterministic multi-criterion
//! filter pipeline. Presentation (layout, charts, the detail modal) sits on
//! top as an external consumer of the filtered data.

pub mod config;
pub mod engine;
pub mod filtering;
pub mod models;
pub mod providers;
pub mod test_helpers;
