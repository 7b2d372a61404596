//! Alert data sources: the producer seam consumed by the refresh engine.

mod simulated;
mod traits;

pub use simulated::SimulatedAlertSource;
pub use traits::{AlertSource, AlertSourceError};

#[cfg(test)]
pub use traits::MockAlertSource;
