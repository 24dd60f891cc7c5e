//! Pure decision core: market-window gating, delta computation and the
//! per-ticker anti-spam state machine. No async, no IO.

pub mod decision;

pub use decision::*;
