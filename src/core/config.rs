use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::{CrawlError, CrawlResult};

/// Search endpoint of the public case index.
pub const SEARCH_ENDPOINT: &str = "https://search.ftc.gov/search";

const SEARCH_AFFILIATE: &str = "ftc_prod";

/// Bounded retry for network-facing operations: a fixed number of
/// attempts with a constant delay between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_secs(2),
        }
    }
}

/// Parameters of one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Free-text search submitted to the index.
    pub query: String,
    /// Existing directory that receives downloaded documents.
    pub destination: PathBuf,
    /// Concurrent document downloads per case page.
    pub download_concurrency: usize,
    /// Applied to page renders and document fetches alike.
    pub retry: RetryPolicy,
}

impl CrawlConfig {
    pub fn new(query: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            query: query.into(),
            destination: destination.into(),
            download_concurrency: 4,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_download_concurrency(mut self, limit: usize) -> Self {
        self.download_concurrency = limit.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Checked before any network activity.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.query.trim().is_empty() {
            return Err(CrawlError::Config("search query is empty".to_string()));
        }
        if !self.destination.is_dir() {
            return Err(CrawlError::Config(format!(
                "destination {} is not an existing directory",
                self.destination.display()
            )));
        }
        Ok(())
    }

    /// URL of one results page, 1-based.
    pub fn page_url(&self, page: u32) -> CrawlResult<Url> {
        let mut url = Url::parse(SEARCH_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("utf8", "✓")
            .append_pair("affiliate", SEARCH_AFFILIATE)
            .append_pair("query", &self.query)
            .append_pair("commit", "Search")
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_carries_query_and_page_number() {
        let config = CrawlConfig::new("acme corp", "/tmp");
        let url = config.page_url(3).unwrap();

        assert!(url.as_str().starts_with(SEARCH_ENDPOINT));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("query".to_string(), "acme corp".to_string())));
        assert!(pairs.contains(&("page".to_string(), "3".to_string())));
        assert!(pairs.contains(&("affiliate".to_string(), SEARCH_AFFILIATE.to_string())));
    }

    #[test]
    fn empty_query_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrawlConfig::new("  ", dir.path());
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));
    }

    #[test]
    fn missing_destination_is_rejected() {
        let config = CrawlConfig::new("acme", "/nonexistent/docketfetch-dest");
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));
    }

    #[test]
    fn existing_destination_passes_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrawlConfig::new("acme", dir.path());
        assert!(config.validate().is_ok());
    }
}
