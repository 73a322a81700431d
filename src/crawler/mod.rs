pub mod crawler;
pub mod fetch;
pub mod types;

pub use crawler::EmailCrawler;
pub use fetch::{HttpFetcher, PageFetcher};
pub use types::{CrawlConfig, CrawlOutcome, FetchedPage};
