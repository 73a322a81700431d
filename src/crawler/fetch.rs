// src/crawler/fetch.rs - transport seam for the crawler
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::FetchedPage;

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; EmailEnricher/1.0)";

/// Fetches one page. Behind a trait so tests can run the crawler against
/// canned pages without touching the network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchedPage;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchedPage {
        // redirects are followed by the client; timeouts and transport
        // failures are indistinguishable to the caller
        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Fetch failed for {}: {}", url, e);
                return FetchedPage::unavailable();
            }
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return FetchedPage {
                status,
                body: String::new(),
            };
        }

        match response.text().await {
            Ok(body) => FetchedPage { status, body },
            Err(e) => {
                debug!("Failed to read body from {}: {}", url, e);
                FetchedPage {
                    status,
                    body: String::new(),
                }
            }
        }
    }
}
