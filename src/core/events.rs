use std::path::PathBuf;

use log::{info, warn};
use url::Url;

use crate::stats::CrawlSummary;

/// Structured progress events emitted during a run. How they are
/// displayed (console, UI widget, file) is up to the injected sink.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    PageStarted(u32),
    CaseMatched(Url),
    DocumentSaved(PathBuf),
    DocumentFailed { url: Url, reason: String },
    PageCompleted(u32),
    RunCompleted(CrawlSummary),
}

/// Observer for crawl progress. Owned by the caller of the crawler and
/// shared with every component that reports progress.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

/// Default sink: forwards every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: CrawlEvent) {
        match event {
            CrawlEvent::PageStarted(page) => info!("page {page} started"),
            CrawlEvent::CaseMatched(url) => info!("case matched: {url}"),
            CrawlEvent::DocumentSaved(path) => info!("document saved as {}", path.display()),
            CrawlEvent::DocumentFailed { url, reason } => {
                warn!("failed to download {url}: {reason}")
            }
            CrawlEvent::PageCompleted(page) => info!("page {page} completed"),
            CrawlEvent::RunCompleted(summary) => info!(
                "run completed: {} pages processed, {} cases matched, {} documents saved, {} failed",
                summary.pages_processed,
                summary.cases_matched,
                summary.documents_saved,
                summary.documents_failed
            ),
        }
    }
}
