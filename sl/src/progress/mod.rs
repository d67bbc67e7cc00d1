//! Progress indication while a batch is in flight
//!
//! The `ProgressIndicator` trait abstracts the visual indicator, with
//! `Spinner` as the terminal implementation. `SpinnerTask` drives an
//! indicator from its own task until told to stop.

mod indicator;
mod spinner;
mod task;

pub use indicator::ProgressIndicator;
pub use spinner::Spinner;
pub use task::{DEFAULT_TICK_INTERVAL, SpinnerTask};

#[cfg(test)]
pub use indicator::mock;
