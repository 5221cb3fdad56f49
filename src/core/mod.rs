mod cancel;
mod config;
mod crawler;
mod errors;
mod events;

pub use cancel::CancelToken;
pub use config::{CrawlConfig, RetryPolicy, SEARCH_ENDPOINT};
pub use crawler::Crawler;
pub use errors::{CrawlError, CrawlResult};
pub use events::{CrawlEvent, EventSink, LogSink};
