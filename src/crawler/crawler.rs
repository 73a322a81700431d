// src/crawler/crawler.rs - bounded, failure-aware crawl for a contact email
use std::collections::{HashSet, VecDeque};

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::fetch::{HttpFetcher, PageFetcher};
use super::types::{CrawlConfig, CrawlOutcome};
use crate::extractors::EmailExtractor;
use crate::urls::UrlClassifier;

/// Contact-like links harvested from the first page, at most.
const MAX_CONTACT_LINKS: usize = 5;

/// Keyword hints steering the crawl and guarding against tutorial pages.
#[derive(Debug, Clone)]
pub struct CrawlHints {
    /// Internal links worth following (contact-ish pages).
    pub contact_keywords: Vec<String>,
    /// Pages that usually carry example emails rather than real contacts.
    pub low_value_page_hints: Vec<String>,
}

impl Default for CrawlHints {
    fn default() -> Self {
        let contact_keywords = ["contact", "about", "privacy", "legal", "imprint", "terms", "support"];
        let low_value_page_hints = [
            "doc_email",
            "adresse électronique",
            "adresse electronique",
            "email valide",
            "nom d'utilisateur@",
            "username@",
            "example@",
        ];

        Self {
            contact_keywords: contact_keywords.iter().map(|k| k.to_string()).collect(),
            low_value_page_hints: low_value_page_hints.iter().map(|h| h.to_string()).collect(),
        }
    }
}

pub struct EmailCrawler {
    fetcher: Box<dyn PageFetcher>,
    classifier: UrlClassifier,
    extractor: EmailExtractor,
    hints: CrawlHints,
}

impl EmailCrawler {
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(HttpFetcher::new()))
    }

    pub fn with_fetcher(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            classifier: UrlClassifier::new(),
            extractor: EmailExtractor::new(),
            hints: CrawlHints::default(),
        }
    }

    /// Visit at most `max_pages` pages starting from `seed_url`: the seed
    /// page first, then a few contact-like internal links harvested from it.
    /// First filtered email wins. 401/403/429 ends the crawl as Blocked.
    pub async fn crawl(&self, seed_url: &str, config: &CrawlConfig) -> CrawlOutcome {
        let seed = self.classifier.normalize(seed_url);
        if seed.is_empty() {
            return CrawlOutcome::Error;
        }

        let mut frontier = VecDeque::from([seed]);
        let mut visited: HashSet<String> = HashSet::new();
        let mut pages_checked = 0usize;

        while pages_checked < config.max_pages {
            let Some(url) = frontier.pop_front() else {
                break;
            };
            if !visited.insert(url.clone()) {
                continue;
            }

            let page = self.fetcher.fetch(&url, config.timeout).await;
            pages_checked += 1;

            if matches!(page.status, 401 | 403 | 429) {
                debug!(page = %url, status = page.status, "crawl blocked");
                return CrawlOutcome::Blocked;
            }
            if page.body.is_empty() {
                continue;
            }

            // tutorial-like pages are scanned for links but never for emails
            if !self.page_looks_low_value(&url, &page.body) {
                let candidates = self.extractor.extract_filtered(&page.body);
                debug!(page = %url, candidates = candidates.len(), "page scanned for emails");
                if let Some(email) = candidates.into_iter().next() {
                    return CrawlOutcome::Found {
                        email,
                        source_url: url,
                    };
                }
            }

            // contact-like links are harvested from the first page only
            if pages_checked == 1 {
                for link in self.harvest_contact_links(&url, &page.body) {
                    if !visited.contains(&link) {
                        frontier.push_back(link);
                    }
                }
            }
        }

        CrawlOutcome::NotFound
    }

    fn page_looks_low_value(&self, url: &str, body: &str) -> bool {
        let url_lower = url.to_lowercase();
        let body_lower = body.to_lowercase();
        self.hints
            .low_value_page_hints
            .iter()
            .any(|hint| url_lower.contains(hint.as_str()) || body_lower.contains(hint.as_str()))
    }

    /// Same-domain hyperlinks whose href carries a contact keyword, resolved
    /// to absolute normalized URLs, deduplicated, capped.
    fn harvest_contact_links(&self, page_url: &str, html: &str) -> Vec<String> {
        let base_domain = self.classifier.domain_of(page_url);
        if base_domain.is_empty() {
            return Vec::new();
        }
        let Ok(base) = Url::parse(page_url) else {
            return Vec::new();
        };

        let document = Html::parse_document(html);
        let link_selector = Selector::parse("a[href]").unwrap();

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for element in document.select(&link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }

            let href_lower = href.to_lowercase();
            if !self
                .hints
                .contact_keywords
                .iter()
                .any(|keyword| href_lower.contains(keyword.as_str()))
            {
                continue;
            }

            // absolute as-is; protocol-relative, root-relative and relative
            // forms resolve against the page URL
            let resolved = match Url::parse(href) {
                Ok(absolute) => absolute,
                Err(_) => match base.join(href) {
                    Ok(joined) => joined,
                    Err(_) => continue,
                },
            };

            if self.classifier.domain_of(resolved.as_str()) != base_domain {
                continue;
            }

            let normalized = self.classifier.normalize(resolved.as_str());
            if normalized.is_empty() {
                continue;
            }
            if seen.insert(normalized.clone()) {
                links.push(normalized);
            }
            if links.len() >= MAX_CONTACT_LINKS {
                break;
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::types::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct FakeFetcher {
        pages: HashMap<String, (u16, String)>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, _timeout: Duration) -> FetchedPage {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.pages.get(url) {
                Some((status, body)) => FetchedPage {
                    status: *status,
                    body: body.clone(),
                },
                None => FetchedPage {
                    status: 404,
                    body: String::new(),
                },
            }
        }
    }

    fn crawler_with(pages: Vec<(&str, u16, &str)>) -> (EmailCrawler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = FakeFetcher {
            pages: pages
                .into_iter()
                .map(|(url, status, body)| (url.to_string(), (status, body.to_string())))
                .collect(),
            calls: calls.clone(),
        };
        (EmailCrawler::with_fetcher(Box::new(fetcher)), calls)
    }

    #[tokio::test]
    async fn finds_email_on_seed_page() {
        let (crawler, _) = crawler_with(vec![(
            "https://example.com",
            200,
            "<html>Reach us at hello@realcompany.com</html>",
        )]);

        let outcome = crawler.crawl("https://example.com", &CrawlConfig::default()).await;
        assert_eq!(
            outcome,
            CrawlOutcome::Found {
                email: "hello@realcompany.com".to_string(),
                source_url: "https://example.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn blocked_status_stops_the_crawl_immediately() {
        let (crawler, calls) = crawler_with(vec![("https://example.com", 403, "")]);

        let outcome = crawler.crawl("https://example.com", &CrawlConfig::default()).await;
        assert_eq!(outcome, CrawlOutcome::Blocked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn follows_contact_link_from_seed_page() {
        let (crawler, _) = crawler_with(vec![
            (
                "https://example.com",
                200,
                r#"<html>
                    <a href="/contact">contact</a>
                    <a href="/privacy">privacy</a>
                    <a href="https://other.com/contact">elsewhere</a>
                    no email here
                </html>"#,
            ),
            (
                "https://example.com/contact",
                200,
                "<html>Contact us: team@realcompany.com</html>",
            ),
            ("https://example.com/privacy", 200, "<html>privacy policy</html>"),
        ]);

        let outcome = crawler.crawl("https://example.com", &CrawlConfig::default()).await;
        assert_eq!(
            outcome,
            CrawlOutcome::Found {
                email: "team@realcompany.com".to_string(),
                source_url: "https://example.com/contact".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn low_value_page_is_never_a_source() {
        let (crawler, _) = crawler_with(vec![(
            "https://example.com/guide",
            200,
            "<html>type username@ then your domain; questions to help@realcompany.com</html>",
        )]);

        let config = CrawlConfig {
            max_pages: 1,
            ..CrawlConfig::default()
        };
        let outcome = crawler.crawl("https://example.com/guide", &config).await;
        assert_eq!(outcome, CrawlOutcome::NotFound);
    }

    #[tokio::test]
    async fn malformed_seed_is_an_error_without_any_fetch() {
        let (crawler, calls) = crawler_with(vec![]);

        let outcome = crawler.crawl("not a url", &CrawlConfig::default()).await;
        assert_eq!(outcome, CrawlOutcome::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_an_unusable_page_not_an_error() {
        // no canned page -> 404 body-less; frontier empties -> NotFound
        let (crawler, _) = crawler_with(vec![]);

        let outcome = crawler.crawl("https://unreachable.example", &CrawlConfig::default()).await;
        assert_eq!(outcome, CrawlOutcome::NotFound);
    }

    #[tokio::test]
    async fn page_budget_bounds_the_crawl() {
        let (crawler, calls) = crawler_with(vec![
            (
                "https://example.com",
                200,
                r#"<a href="/contact">c</a><a href="/about">a</a><a href="/legal">l</a>"#,
            ),
            ("https://example.com/contact", 200, "<html>nothing</html>"),
            ("https://example.com/about", 200, "<html>nothing</html>"),
            (
                "https://example.com/legal",
                200,
                "<html>late@realcompany.com</html>",
            ),
        ]);

        let config = CrawlConfig {
            max_pages: 2,
            ..CrawlConfig::default()
        };
        let outcome = crawler.crawl("https://example.com", &config).await;
        assert_eq!(outcome, CrawlOutcome::NotFound);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn placeholder_emails_on_real_pages_are_skipped() {
        let (crawler, _) = crawler_with(vec![(
            "https://example.com",
            200,
            "<html>write to someone@example.org</html>",
        )]);

        let outcome = crawler.crawl("https://example.com", &CrawlConfig::default()).await;
        assert_eq!(outcome, CrawlOutcome::NotFound);
    }
}
