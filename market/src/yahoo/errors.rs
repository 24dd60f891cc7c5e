use thiserror::Error;

#[derive(Error, Debug)]
pub enum YahooError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no price data available for {0}")]
    NoData(String),

    #[error("yahoo api error {code}: {description}")]
    Api { code: String, description: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
