use std::sync::Arc;

use log::{info, warn};

use crate::fetch::DocumentFetcher;
use crate::labels::LabelMatcher;
use crate::parse::parse_results_page;
use crate::pipeline::{CaseProcessor, ResultPageProcessor};
use crate::render::Renderer;
use crate::stats::{CrawlSummary, RunStats};

use super::{CancelToken, CrawlConfig, CrawlError, CrawlEvent, CrawlResult, EventSink, LogSink};

/// Orchestrates one crawl run: discovers the page count from page 1,
/// iterates the remaining pages on the single renderer session, and
/// aggregates every downstream outcome into the final summary.
pub struct Crawler {
    renderer: Box<dyn Renderer>,
    fetcher: DocumentFetcher,
    matcher: LabelMatcher,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(renderer: Box<dyn Renderer>, config: CrawlConfig) -> CrawlResult<Self> {
        let fetcher = DocumentFetcher::new(config.retry.clone())?;
        Ok(Self {
            renderer,
            fetcher,
            matcher: LabelMatcher::default(),
            sink: Arc::new(LogSink),
            cancel: CancelToken::new(),
            config,
        })
    }

    pub fn with_matcher(mut self, matcher: LabelMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Handle for requesting cooperative cancellation between pages.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs to completion. Page, case and document failures are absorbed
    /// into the summary; only an invalid configuration or a page-1
    /// discovery failure after retries is fatal.
    pub async fn run(&self) -> CrawlResult<CrawlSummary> {
        if let Err(err) = self.config.validate() {
            self.close_session().await;
            return Err(err);
        }

        let stats = RunStats::new(&self.config.query);
        let outcome = self.crawl(&stats).await;

        // The session is released on every exit path.
        self.close_session().await;

        stats.finish(outcome.is_err());
        let summary = stats.snapshot();
        self.sink.emit(CrawlEvent::RunCompleted(summary.clone()));
        info!(
            "run finished: {} cases matched, {} documents saved, {} failed",
            summary.cases_matched, summary.documents_saved, summary.documents_failed
        );

        outcome.map(|()| summary)
    }

    async fn close_session(&self) {
        if let Err(err) = self.renderer.close().await {
            warn!("failed to close renderer session: {err}");
        }
    }

    async fn crawl(&self, stats: &RunStats) -> CrawlResult<()> {
        let case_processor = CaseProcessor::new(
            self.renderer.as_ref(),
            &self.fetcher,
            &self.matcher,
            self.sink.as_ref(),
            &self.config,
        );
        let processor = ResultPageProcessor::new(case_processor, self.sink.as_ref());

        // Page 1 doubles as pagination discovery and is processed from
        // this same render; its failure is the only one that aborts the
        // run.
        let first_url = self.config.page_url(1)?;
        info!("fetching {first_url}");
        let html = self
            .renderer
            .render(&first_url, &self.config.retry)
            .await
            .map_err(|err| CrawlError::Discovery(err.to_string()))?;

        let total_pages = parse_results_page(&html).total_pages;
        stats.set_total_pages(total_pages);
        info!("total pages found: {total_pages}");

        self.sink.emit(CrawlEvent::PageStarted(1));
        processor.process(&html, stats).await;
        stats.record_page_processed();
        self.sink.emit(CrawlEvent::PageCompleted(1));

        for page_no in 2..=total_pages {
            if self.cancel.is_cancelled() {
                info!("cancellation requested, stopping before page {page_no}");
                break;
            }

            let url = self.config.page_url(page_no)?;
            info!("processing page {page_no} of {total_pages} - {url}");
            self.sink.emit(CrawlEvent::PageStarted(page_no));
            match self.renderer.render(&url, &self.config.retry).await {
                Ok(html) => {
                    processor.process(&html, stats).await;
                    stats.record_page_processed();
                }
                Err(err) => {
                    warn!("page {page_no} failed after retries: {err}");
                    stats.record_page_failure(page_no, err.to_string());
                }
            }
            self.sink.emit(CrawlEvent::PageCompleted(page_no));
        }

        Ok(())
    }
}
