// src/crawler/types.rs
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Page budget per crawl (seed page plus harvested contact pages).
    pub max_pages: usize,
    pub timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 3,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Terminal outcome of one crawl attempt for one seed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    Found { email: String, source_url: String },
    NotFound,
    /// 401/403/429 on any fetched page ends the crawl for this seed.
    Blocked,
    /// Seed URL could not be normalized; nothing was fetched.
    Error,
}

/// What the transport layer hands back for one page.
/// Transport failures and timeouts surface as status 0 with an empty body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn unavailable() -> Self {
        Self {
            status: 0,
            body: String::new(),
        }
    }
}
