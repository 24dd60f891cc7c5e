pub mod alert_machine;
pub mod clock_gate;
pub mod delta;
pub mod types;

pub use alert_machine::{AlertDecision, evaluate, target_direction};
pub use clock_gate::{WindowCheck, check_trading_window, is_trading_window};
pub use delta::{DeltaError, compute_delta};
pub use types::*;
