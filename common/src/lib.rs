pub mod logger;
pub mod secrets;

pub use logger::{
    LogConfig, RunId, annotate_ticker, init_logger, parse_level, run_span, warn_if_slow,
};
pub use secrets::mask_secret;
