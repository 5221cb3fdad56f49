pub mod core;
pub mod fetch;
pub mod labels;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod stats;

pub use crate::core::Crawler;
pub use crate::core::{CancelToken, CrawlConfig, CrawlError, CrawlResult, RetryPolicy};
pub use crate::core::{CrawlEvent, EventSink, LogSink};
pub use crate::fetch::{DocumentFetcher, DownloadOutcome};
pub use crate::labels::LabelMatcher;
pub use crate::render::Renderer;
pub use crate::stats::{CrawlSummary, RunStats};
