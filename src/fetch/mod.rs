// src/fetch/mod.rs

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{Config, USER_AGENT};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to retrieve the page. Status code: {0}")]
    Status(u16),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Raw response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// A way of getting a page for a URL. Swapped for a fixture in tests.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}

/// Blocking HTTP fetcher backed by `reqwest`.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url.clone()).send().map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport)?;
        Ok(Page { status, body })
    }
}

/// GET `url` once. Anything but 200 is an error; there is no retry.
#[instrument(level = "info", skip_all, fields(url = %url))]
pub fn fetch_page(fetcher: &dyn Fetch, url: &Url) -> Result<String, FetchError> {
    debug!("sending request");
    let page = fetcher.fetch(url)?;
    if page.status != StatusCode::OK.as_u16() {
        warn!(status = page.status, "non-success status");
        return Err(FetchError::Status(page.status));
    }
    info!(bytes = page.body.len(), "page fetched");
    Ok(page.body)
}
