use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use url::Url;

use super::Renderer;
use crate::core::{CrawlError, CrawlResult};

/// One scripted response for a URL.
#[derive(Debug, Clone)]
pub enum MockPage {
    Html(String),
    Fail(String),
}

/// Scripted renderer for tests. Responses registered for a URL are
/// served in order and cycle once exhausted; unregistered URLs fail.
#[derive(Clone, Default)]
pub struct MockRenderer {
    pages: Arc<RwLock<HashMap<String, Script>>>,
    rendered: Arc<RwLock<Vec<String>>>,
}

#[derive(Default)]
struct Script {
    responses: Vec<MockPage>,
    cursor: AtomicUsize,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub(&self, url: &Url, page: MockPage) {
        self.pages
            .write()
            .entry(url.to_string())
            .or_default()
            .responses
            .push(page);
    }

    pub fn stub_html(&self, url: &Url, html: impl Into<String>) {
        self.stub(url, MockPage::Html(html.into()));
    }

    pub fn stub_failure(&self, url: &Url, message: impl Into<String>) {
        self.stub(url, MockPage::Fail(message.into()));
    }

    /// URLs rendered so far, in navigation order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.read().clone()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render_once(&self, url: &Url) -> CrawlResult<String> {
        self.rendered.write().push(url.to_string());

        let pages = self.pages.read();
        let Some(script) = pages.get(url.as_str()) else {
            return Err(CrawlError::Render {
                url: url.clone(),
                message: "no scripted response".to_string(),
            });
        };
        let index = script.cursor.fetch_add(1, Ordering::SeqCst);
        match &script.responses[index % script.responses.len()] {
            MockPage::Html(html) => Ok(html.clone()),
            MockPage::Fail(message) => Err(CrawlError::Render {
                url: url.clone(),
                message: message.clone(),
            }),
        }
    }
}
