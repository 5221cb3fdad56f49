use async_trait::async_trait;
use log::warn;
use tokio::time::sleep;
use url::Url;

use crate::core::{CrawlError, CrawlResult, RetryPolicy};

mod mock;
pub use mock::{MockPage, MockRenderer};

mod proxy;
pub use proxy::ProxyRenderer;

#[cfg(feature = "browser")]
mod chromium;
#[cfg(feature = "browser")]
pub use chromium::ChromiumRenderer;

/// Port to the page-rendering session. Implementations must execute
/// client-side script: the index populates result and document lists
/// dynamically, so static markup is not enough.
///
/// One session is bound to one crawl run and navigated sequentially;
/// `close` releases it on every exit path.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// A single render attempt with no retry applied.
    async fn render_once(&self, url: &Url) -> CrawlResult<String>;

    /// Render with the bounded retry policy applied around `render_once`.
    async fn render(&self, url: &Url, retry: &RetryPolicy) -> CrawlResult<String> {
        let attempts = retry.attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.render_once(url).await {
                Ok(html) => return Ok(html),
                Err(err) => {
                    warn!("render attempt {attempt}/{attempts} failed for {url}: {err}");
                    last_error = Some(err);
                    if attempt < attempts {
                        sleep(retry.delay).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| CrawlError::Render {
            url: url.clone(),
            message: "no render attempts made".to_string(),
        }))
    }

    /// Release the underlying session.
    async fn close(&self) -> CrawlResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn quick_retry(attempts: usize) -> RetryPolicy {
        RetryPolicy {
            attempts,
            delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn render_retries_until_an_attempt_succeeds() {
        let url = Url::parse("https://search.ftc.gov/search?page=1").unwrap();
        let renderer = MockRenderer::new();
        renderer.stub_failure(&url, "session dropped");
        renderer.stub_html(&url, "<html>ok</html>");

        let html = renderer.render(&url, &quick_retry(2)).await.unwrap();
        assert_eq!(html, "<html>ok</html>");
        assert_eq!(renderer.rendered().len(), 2);
    }

    #[tokio::test]
    async fn render_gives_up_after_the_configured_attempts() {
        let url = Url::parse("https://search.ftc.gov/search?page=1").unwrap();
        let renderer = MockRenderer::new();
        renderer.stub_failure(&url, "session dropped");

        let err = renderer.render(&url, &quick_retry(2)).await.unwrap_err();
        assert!(matches!(err, CrawlError::Render { .. }));
        assert_eq!(renderer.rendered().len(), 2);
    }
}
