//! Evaluation runs: gate by the alert window, evaluate every ticker, notify,
//! persist. Plus the interval loop that repeats runs.

pub mod engine;
pub mod poller;
pub mod types;

pub use engine::EvaluationLoop;
pub use poller::run_periodically;
pub use types::*;
