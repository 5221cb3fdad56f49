use futures::stream::{self, StreamExt};
use log::{debug, info};
use url::Url;

use crate::core::{CrawlConfig, CrawlEvent, CrawlResult, EventSink};
use crate::fetch::{DocumentFetcher, DownloadOutcome, DOCUMENT_EXTENSION};
use crate::labels::LabelMatcher;
use crate::parse::parse_case_page;
use crate::render::Renderer;
use crate::stats::RunStats;

/// Documents saved and failed for one case page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseOutcome {
    pub saved: usize,
    pub failed: usize,
}

/// Renders one case-detail page, classifies its document links and
/// downloads the accepted ones.
pub struct CaseProcessor<'a> {
    renderer: &'a dyn Renderer,
    fetcher: &'a DocumentFetcher,
    matcher: &'a LabelMatcher,
    sink: &'a dyn EventSink,
    config: &'a CrawlConfig,
}

impl<'a> CaseProcessor<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        fetcher: &'a DocumentFetcher,
        matcher: &'a LabelMatcher,
        sink: &'a dyn EventSink,
        config: &'a CrawlConfig,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            matcher,
            sink,
            config,
        }
    }

    /// A render failure surfaces as `Err` so the caller can record it
    /// against this one case and move on to the remaining entries.
    pub async fn process(&self, case_url: &Url, stats: &RunStats) -> CrawlResult<CaseOutcome> {
        let html = self.renderer.render(case_url, &self.config.retry).await?;

        let documents = parse_case_page(&html, self.matcher);
        debug!("{} labeled documents on {case_url}", documents.len());

        // Links carrying an accepted label but no document extension are
        // listed noise (press pages and the like), not failures.
        let (retrievable, ignored): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|doc| doc.url.path().ends_with(DOCUMENT_EXTENSION));
        for doc in &ignored {
            debug!("ignoring non-document link {} ({})", doc.url, doc.label);
        }

        // Document downloads carry no renderer session state, so a
        // bounded pool fetches them concurrently.
        let outcomes: Vec<_> = stream::iter(retrievable)
            .map(|doc| async move {
                let outcome = self.fetcher.fetch(&doc.url, &self.config.destination).await;
                (doc, outcome)
            })
            .buffer_unordered(self.config.download_concurrency.max(1))
            .collect()
            .await;

        let mut result = CaseOutcome::default();
        for (doc, outcome) in outcomes {
            match outcome {
                DownloadOutcome::Saved(path) => {
                    result.saved += 1;
                    stats.record_document_saved();
                    self.sink.emit(CrawlEvent::DocumentSaved(path));
                }
                DownloadOutcome::Skipped(reason) => {
                    debug!("skipped {}: {reason}", doc.url);
                }
                DownloadOutcome::Failed(reason) => {
                    result.failed += 1;
                    stats.record_document_failure(&doc.url, reason.clone());
                    self.sink.emit(CrawlEvent::DocumentFailed {
                        url: doc.url,
                        reason,
                    });
                }
            }
        }
        info!(
            "case {case_url}: {} saved, {} failed",
            result.saved, result.failed
        );
        Ok(result)
    }
}
