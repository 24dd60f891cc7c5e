pub mod client;
pub mod errors;

pub use client::{NtfyNotifier, render_message};
pub use errors::NtfyError;
