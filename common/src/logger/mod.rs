mod init;
mod macros;
mod trace_id;

pub use init::{LogConfig, init_logger, parse_level};
pub use macros::{annotate_ticker, run_span, warn_if_slow};
pub use trace_id::RunId;
