use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use url::Url;

use super::Renderer;
use crate::core::{CrawlError, CrawlResult};
use crate::fetch::USER_AGENT;

/// Default endpoint of the JS-rendering proxy service.
pub const DEFAULT_PROXY_ENDPOINT: &str = "https://proxy.scrapeops.io/v1/";

/// Renders pages through a scraping proxy that executes client-side
/// script on its side. An alternative to driving a local browser when
/// none is available.
pub struct ProxyRenderer {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl ProxyRenderer {
    pub fn new(api_key: impl Into<String>) -> CrawlResult<Self> {
        let client = ClientBuilder::new().user_agent(USER_AGENT).build()?;
        let endpoint = Url::parse(DEFAULT_PROXY_ENDPOINT)?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl Renderer for ProxyRenderer {
    async fn render_once(&self, url: &Url) -> CrawlResult<String> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("url", url.as_str()),
                ("country", "us"),
                ("render_js", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Render {
                url: url.clone(),
                message: format!("proxy returned status {}", status.as_u16()),
            });
        }
        Ok(response.text().await?)
    }
}
