//! The refresh engine: periodic, cancellable alert fetching.

mod refresh;

pub use refresh::{RefreshController, SelectionHandler};
