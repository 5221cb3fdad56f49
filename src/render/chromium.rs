use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use log::debug;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use super::Renderer;
use crate::core::{CrawlError, CrawlResult};

/// Headless-Chromium implementation of the renderer port. One browser
/// session serves the whole run; navigation keeps cookie and session
/// state, so callers must navigate it sequentially.
pub struct ChromiumRenderer {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

impl ChromiumRenderer {
    pub async fn launch() -> CrawlResult<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--blink-settings=imagesEnabled=false")
            .build()
            .map_err(CrawlError::Session)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|err| CrawlError::Session(err.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render_once(&self, url: &Url) -> CrawlResult<String> {
        let browser = self.browser.lock().await;
        let page = browser
            .new_page(url.as_str())
            .await
            .map_err(|err| render_error(url, err))?;
        page.wait_for_navigation()
            .await
            .map_err(|err| render_error(url, err))?;
        let html = page
            .content()
            .await
            .map_err(|err| render_error(url, err))?;
        if let Err(err) = page.close().await {
            debug!("failed to close page for {url}: {err}");
        }
        Ok(html)
    }

    async fn close(&self) -> CrawlResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|err| CrawlError::Session(err.to_string()))?;
        self.handler.abort();
        Ok(())
    }
}

fn render_error(url: &Url, err: impl std::fmt::Display) -> CrawlError {
    CrawlError::Render {
        url: url.clone(),
        message: err.to_string(),
    }
}
