use thiserror::Error;

#[derive(Error, Debug)]
pub enum NtfyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}
