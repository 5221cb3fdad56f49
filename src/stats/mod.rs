use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureScope {
    Page,
    Case,
    Document,
}

/// One recorded, absorbed failure. Failures below the run level never
/// propagate past their owning component; they end up here instead.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub scope: FailureScope,
    pub subject: String,
    pub reason: String,
}

/// Immutable snapshot of a finished (or aborted) run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub query: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_pages: u32,
    pub pages_processed: u32,
    pub cases_matched: usize,
    pub documents_saved: usize,
    pub documents_failed: usize,
    pub aborted: bool,
    pub failures: Vec<Failure>,
}

/// Running counters for one crawl. The crawler owns the aggregate;
/// downstream components report outcomes into it and keep no state of
/// their own.
#[derive(Debug, Clone)]
pub struct RunStats {
    inner: Arc<RwLock<CrawlSummary>>,
}

impl RunStats {
    pub fn new(query: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CrawlSummary {
                query: query.to_string(),
                started_at: Utc::now(),
                finished_at: None,
                total_pages: 0,
                pages_processed: 0,
                cases_matched: 0,
                documents_saved: 0,
                documents_failed: 0,
                aborted: false,
                failures: Vec::new(),
            })),
        }
    }

    /// Discovered once from page 1 and immutable for the run.
    pub fn set_total_pages(&self, total: u32) {
        self.inner.write().total_pages = total;
    }

    pub fn record_page_processed(&self) {
        self.inner.write().pages_processed += 1;
    }

    pub fn record_page_failure(&self, page: u32, reason: String) {
        self.inner.write().failures.push(Failure {
            scope: FailureScope::Page,
            subject: format!("page {page}"),
            reason,
        });
    }

    pub fn record_case_matched(&self) {
        self.inner.write().cases_matched += 1;
    }

    pub fn record_case_failure(&self, url: &Url, reason: String) {
        self.inner.write().failures.push(Failure {
            scope: FailureScope::Case,
            subject: url.to_string(),
            reason,
        });
    }

    pub fn record_document_saved(&self) {
        self.inner.write().documents_saved += 1;
    }

    pub fn record_document_failure(&self, url: &Url, reason: String) {
        let mut stats = self.inner.write();
        stats.documents_failed += 1;
        stats.failures.push(Failure {
            scope: FailureScope::Document,
            subject: url.to_string(),
            reason,
        });
    }

    pub fn finish(&self, aborted: bool) {
        let mut stats = self.inner.write();
        stats.finished_at = Some(Utc::now());
        stats.aborted = aborted;
    }

    pub fn snapshot(&self) -> CrawlSummary {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_the_snapshot() {
        let stats = RunStats::new("acme");
        let url = Url::parse("https://www.ftc.gov/x/order.pdf").unwrap();

        stats.set_total_pages(3);
        stats.record_page_processed();
        stats.record_case_matched();
        stats.record_case_matched();
        stats.record_document_saved();
        stats.record_document_failure(&url, "status code 404".to_string());
        stats.record_page_failure(2, "render timed out".to_string());

        let summary = stats.snapshot();
        assert_eq!(summary.total_pages, 3);
        assert_eq!(summary.pages_processed, 1);
        assert_eq!(summary.cases_matched, 2);
        assert_eq!(summary.documents_saved, 1);
        assert_eq!(summary.documents_failed, 1);
        assert_eq!(summary.failures.len(), 2);
        assert!(summary.finished_at.is_none());
    }

    #[test]
    fn finish_seals_the_run() {
        let stats = RunStats::new("acme");
        stats.finish(true);

        let summary = stats.snapshot();
        assert!(summary.aborted);
        assert!(summary.finished_at.is_some());
    }
}
