pub mod client;
pub mod errors;
pub mod types;

pub use client::YahooClient;
pub use errors::YahooError;
