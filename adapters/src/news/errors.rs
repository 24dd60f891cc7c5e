use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(#[from] rss::Error),
}
