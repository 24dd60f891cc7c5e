pub mod client;
pub mod errors;
pub mod parser;

pub use client::GoogleNewsClient;
pub use errors::NewsError;
pub use parser::{NewsQuery, select_headlines};
