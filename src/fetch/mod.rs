use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::{Client, ClientBuilder, StatusCode};
use tokio::time::sleep;
use url::Url;

use crate::core::{CrawlResult, RetryPolicy};

/// Only links with this extension are retrievable documents.
pub const DOCUMENT_EXTENSION: &str = ".pdf";

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Outcome of one document fetch. Recorded once, never retried after
/// being recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    Skipped(&'static str),
    Failed(String),
}

/// Downloads documents over plain HTTP GET. Downloads carry no renderer
/// session state, so one fetcher is safely shared across concurrent
/// workers; filename claims are tracked per run so two distinct URLs
/// never write the same file.
#[derive(Clone)]
pub struct DocumentFetcher {
    client: Client,
    retry: RetryPolicy,
    claims: Arc<Mutex<HashMap<String, Url>>>,
}

impl DocumentFetcher {
    pub fn new(retry: RetryPolicy) -> CrawlResult<Self> {
        let client = ClientBuilder::new().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            retry,
            claims: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub async fn fetch(&self, url: &Url, destination: &Path) -> DownloadOutcome {
        if !url.path().ends_with(DOCUMENT_EXTENSION) {
            debug!("skipping {url}: not a document URL");
            return DownloadOutcome::Skipped("not a document URL");
        }

        let filename = self.claim_filename(url);
        let target = destination.join(&filename);

        let attempts = self.retry.attempts.max(1);
        let mut last_failure = String::new();
        for attempt in 1..=attempts {
            match self.try_fetch(url, &target).await {
                Ok(outcome) => return outcome,
                Err(reason) => {
                    warn!("download attempt {attempt}/{attempts} failed for {url}: {reason}");
                    last_failure = reason;
                    if attempt < attempts {
                        sleep(self.retry.delay).await;
                    }
                }
            }
        }
        DownloadOutcome::Failed(last_failure)
    }

    /// One attempt. `Err` is a retryable failure; `Ok` is final.
    async fn try_fetch(&self, url: &Url, target: &Path) -> Result<DownloadOutcome, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(format!("status code {}", status.as_u16()));
        }

        let body = response.bytes().await.map_err(|err| err.to_string())?;
        match tokio::fs::write(target, &body).await {
            Ok(()) => {
                info!("document saved as {}", target.display());
                Ok(DownloadOutcome::Saved(target.to_path_buf()))
            }
            // A failed write is not transient, re-downloading won't help.
            Err(err) => Ok(DownloadOutcome::Failed(format!(
                "write {}: {err}",
                target.display()
            ))),
        }
    }

    /// Reserve a filename for `url`. The URL's basename is claimed first
    /// come first served; a different URL mapping to an already claimed
    /// basename gets a numeric suffix before the extension. The same URL
    /// always maps to the same name, so a re-fetch overwrites its own
    /// file.
    fn claim_filename(&self, url: &Url) -> String {
        let basename = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();

        let mut claims = self.claims.lock();
        match claims.get(&basename).cloned() {
            None => {
                claims.insert(basename.clone(), url.clone());
                return basename;
            }
            Some(owner) if owner == *url => return basename,
            Some(_) => {}
        }

        let (stem, extension) = match basename.rsplit_once('.') {
            Some((stem, extension)) => (stem.to_string(), format!(".{extension}")),
            None => (basename.clone(), String::new()),
        };
        let mut n = 1usize;
        loop {
            let candidate = format!("{stem}-{n}{extension}");
            match claims.get(&candidate).cloned() {
                None => {
                    claims.insert(candidate.clone(), url.clone());
                    return candidate;
                }
                Some(owner) if owner == *url => return candidate,
                Some(_) => n += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quick_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 2,
            delay: Duration::from_millis(10),
        }
    }

    fn doc_url(server: &MockServer, doc_path: &str) -> Url {
        Url::parse(&format!("{}{doc_path}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn saves_response_body_bytes_exactly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/order.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 fake body".as_ref()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();
        let outcome = fetcher.fetch(&doc_url(&server, "/docs/order.pdf"), dir.path()).await;

        let DownloadOutcome::Saved(saved) = outcome else {
            panic!("expected a save, got {outcome:?}");
        };
        assert_eq!(saved, dir.path().join("order.pdf"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"%PDF-1.7 fake body");
    }

    #[tokio::test]
    async fn non_document_url_is_skipped_without_a_request() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();
        // Nothing is listening on this host; a network attempt would fail
        // loudly rather than produce a clean skip.
        let url = Url::parse("http://127.0.0.1:1/x/press.html").unwrap();

        let outcome = fetcher.fetch(&url, dir.path()).await;
        assert_eq!(outcome, DownloadOutcome::Skipped("not a document URL"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn non_200_status_fails_without_writing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/gone.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();
        let outcome = fetcher.fetch(&doc_url(&server, "/docs/gone.pdf"), dir.path()).await;

        let DownloadOutcome::Failed(reason) = outcome else {
            panic!("expected a failure, got {outcome:?}");
        };
        assert!(reason.contains("404"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_then_saved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/docs/flaky.pdf"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/docs/flaky.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"recovered".as_ref()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();
        let outcome = fetcher.fetch(&doc_url(&server, "/docs/flaky.pdf"), dir.path()).await;

        let DownloadOutcome::Saved(saved) = outcome else {
            panic!("expected a save, got {outcome:?}");
        };
        assert_eq!(std::fs::read(&saved).unwrap(), b"recovered");
    }

    #[tokio::test]
    async fn colliding_basenames_get_distinct_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"first".as_ref()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second".as_ref()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();

        let first = fetcher.fetch(&doc_url(&server, "/a/report.pdf"), dir.path()).await;
        let second = fetcher.fetch(&doc_url(&server, "/b/report.pdf"), dir.path()).await;

        assert_eq!(first, DownloadOutcome::Saved(dir.path().join("report.pdf")));
        assert_eq!(
            second,
            DownloadOutcome::Saved(dir.path().join("report-1.pdf"))
        );
        assert_eq!(std::fs::read(dir.path().join("report.pdf")).unwrap(), b"first");
        assert_eq!(
            std::fs::read(dir.path().join("report-1.pdf")).unwrap(),
            b"second"
        );
    }

    #[tokio::test]
    async fn refetching_the_same_url_overwrites_its_own_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/order.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"same".as_ref()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let fetcher = DocumentFetcher::new(quick_retry()).unwrap();
        let url = doc_url(&server, "/a/order.pdf");

        let first = fetcher.fetch(&url, dir.path()).await;
        let second = fetcher.fetch(&url, dir.path()).await;

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
