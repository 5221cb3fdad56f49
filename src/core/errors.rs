use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render failed for {url}: {message}")]
    Render { url: Url, message: String },

    #[error("renderer session error: {0}")]
    Session(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("search discovery failed: {0}")]
    Discovery(String),
}

pub type CrawlResult<T> = Result<T, CrawlError>;
