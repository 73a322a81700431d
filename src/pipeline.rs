// src/pipeline.rs - per-row enrichment: local fields -> discovery -> crawl
use std::collections::HashMap;
use std::time::Duration;

use tracing::info;

use crate::config::EnrichmentConfig;
use crate::crawler::{CrawlConfig, CrawlOutcome, EmailCrawler, PageFetcher};
use crate::discovery::{discover_external_urls, DiscoveryConfig, NO_DISCOVERY_SOURCE};
use crate::extractors::EmailExtractor;
use crate::models::{EnrichMethod, RowStatus, CONFIDENCE_CRAWL};
use crate::table::Table;
use crate::urls::UrlClassifier;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineCounters {
    pub found_local: usize,
    pub prepared_with_urls: usize,
    pub found_crawl: usize,
    pub crawl_blocked: usize,
    pub crawl_errors: usize,
}

/// Owns the table for the duration of a run. Stages hand back owned results
/// which are applied to the row here; no other component mutates the table.
pub struct EnrichmentPipeline {
    config: EnrichmentConfig,
    progress_interval: usize,
    classifier: UrlClassifier,
    extractor: EmailExtractor,
    crawler: EmailCrawler,
}

impl EnrichmentPipeline {
    pub fn new(config: EnrichmentConfig, progress_interval: usize) -> Self {
        Self {
            config,
            progress_interval,
            classifier: UrlClassifier::new(),
            extractor: EmailExtractor::new(),
            crawler: EmailCrawler::new(),
        }
    }

    /// Same pipeline with the crawl transport swapped out (tests).
    pub fn with_fetcher(
        config: EnrichmentConfig,
        progress_interval: usize,
        fetcher: Box<dyn PageFetcher>,
    ) -> Self {
        Self {
            config,
            progress_interval,
            classifier: UrlClassifier::new(),
            extractor: EmailExtractor::new(),
            crawler: EmailCrawler::with_fetcher(fetcher),
        }
    }

    pub async fn run(&self, table: &mut Table) -> PipelineCounters {
        table.ensure_columns();

        let row_count = if self.config.limit_rows > 0 {
            table.len().min(self.config.limit_rows)
        } else {
            table.len()
        };

        let discovery_config = DiscoveryConfig {
            field_priority: self.config.field_priority.clone(),
            max_urls_per_row: self.config.max_urls_per_row,
            exclude_low_value: self.config.exclude_low_value_domains,
        };
        let crawl_config = CrawlConfig {
            max_pages: self.config.max_pages_per_crawl,
            timeout: Duration::from_secs(self.config.timeout_seconds),
        };

        let mut counters = PipelineCounters::default();
        for idx in 0..row_count {
            self.enrich_row(table, idx, &discovery_config, &crawl_config, &mut counters)
                .await;

            if self.progress_interval > 0 && (idx + 1) % self.progress_interval == 0 {
                info!("Processed {}/{} rows", idx + 1, row_count);
            }
        }

        info!(
            "Run complete: {} found locally, {} rows prepared with URLs, {} found via crawl, {} blocked, {} errors",
            counters.found_local,
            counters.prepared_with_urls,
            counters.found_crawl,
            counters.crawl_blocked,
            counters.crawl_errors
        );
        counters
    }

    async fn enrich_row(
        &self,
        table: &mut Table,
        idx: usize,
        discovery_config: &DiscoveryConfig,
        crawl_config: &CrawlConfig,
        counters: &mut PipelineCounters,
    ) {
        // 1) local fields, untouched rows only
        if table.get(idx, "status") == RowStatus::NotProcessed.as_str() {
            let bio_text = table.get(idx, "bio_text").to_string();
            let detected = table.get(idx, "detected_emails").to_string();
            let local = self.extractor.enrich_local(&bio_text, &detected);

            table.set(idx, "email", &local.email);
            table.set(idx, "source_url", &local.source);
            table.set(idx, "method", &local.method);
            table.set(idx, "status", local.status.as_str());
            table.set(idx, "confidence", &local.confidence);

            if local.status == RowStatus::Found {
                counters.found_local += 1;
            }
        }

        // 2) external URL discovery for rows local enrichment missed
        if table.get(idx, "status") == RowStatus::NotFound.as_str() {
            let mut fields = HashMap::new();
            for field in &discovery_config.field_priority {
                fields.insert(field.clone(), table.get(idx, field).to_string());
            }

            let (urls, source_field) =
                discover_external_urls(&fields, &self.classifier, discovery_config);
            if urls.is_empty() {
                table.set(idx, "discovery_source", NO_DISCOVERY_SOURCE);
            } else {
                table.set(idx, "external_urls", &urls.join("|"));
                table.set(idx, "primary_domain", &self.classifier.domain_of(&urls[0]));
                table.set(idx, "discovery_source", &source_field);
                counters.prepared_with_urls += 1;
            }
        }

        // 3) crawl the discovered URLs, first success wins
        if !self.config.crawl_enabled {
            return;
        }
        if table.get(idx, "status") != RowStatus::NotFound.as_str() {
            return;
        }
        let external = table.get(idx, "external_urls").to_string();
        if external.is_empty() {
            return;
        }

        let mut any_blocked = false;
        for candidate in external.split('|').map(str::trim).filter(|u| !u.is_empty()) {
            match self.crawler.crawl(candidate, crawl_config).await {
                CrawlOutcome::Found { email, source_url } => {
                    table.set(idx, "email", &email);
                    table.set(idx, "source_url", &source_url);
                    table.set(idx, "method", EnrichMethod::Crawl.as_str());
                    table.set(idx, "status", RowStatus::Found.as_str());
                    table.set(idx, "confidence", CONFIDENCE_CRAWL);
                    counters.found_crawl += 1;
                    return;
                }
                // a blocked or failed candidate never stops the row;
                // the next discovered URL still gets its chance
                CrawlOutcome::Blocked => {
                    counters.crawl_blocked += 1;
                    any_blocked = true;
                }
                CrawlOutcome::Error => {
                    counters.crawl_errors += 1;
                }
                CrawlOutcome::NotFound => {}
            }
        }

        // every candidate exhausted; a block anywhere marks the row so it is
        // never retried within or across runs
        if any_blocked {
            table.set(idx, "status", RowStatus::Blocked.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchedPage;
    use async_trait::async_trait;
    use std::time::Duration as StdDuration;

    struct FakeFetcher {
        pages: HashMap<String, (u16, String)>,
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, _timeout: StdDuration) -> FetchedPage {
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

    fn pipeline_with(pages: Vec<(&str, u16, &str)>) -> EnrichmentPipeline {
        let fetcher = FakeFetcher {
            pages: pages
                .into_iter()
                .map(|(url, status, body)| (url.to_string(), (status, body.to_string())))
                .collect(),
        };
        EnrichmentPipeline::with_fetcher(EnrichmentConfig::default(), 0, Box::new(fetcher))
    }

    fn input_table(rows: Vec<[&str; 4]>) -> Table {
        let mut table = Table::new(
            ["bio_links", "bio_text", "description", "detected_emails"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        for row in rows {
            table.push_row(row.iter().map(|cell| cell.to_string()).collect());
        }
        table
    }

    #[tokio::test]
    async fn local_discovery_and_crawl_stages_compose() {
        let pipeline = pipeline_with(vec![(
            "https://www.site-a.com",
            200,
            "<html>write to owner@site-a.com</html>",
        )]);

        let mut table = input_table(vec![
            ["", "contact me at bio@real.com", "", "detected@real.com"],
            ["", "my site is www.site-a.com", "", ""],
            ["", "nothing here", "", ""],
        ]);

        let counters = pipeline.run(&mut table).await;

        // row 0: detected field wins locally
        assert_eq!(table.get(0, "email"), "detected@real.com");
        assert_eq!(table.get(0, "method"), "detected_emails");
        assert_eq!(table.get(0, "confidence"), "1.0");
        assert_eq!(table.get(0, "status"), "found");

        // row 1: discovered from bio_text, then found via crawl
        assert_eq!(table.get(1, "discovery_source"), "bio_text");
        assert_eq!(table.get(1, "external_urls"), "https://www.site-a.com");
        assert_eq!(table.get(1, "primary_domain"), "www.site-a.com");
        assert_eq!(table.get(1, "email"), "owner@site-a.com");
        assert_eq!(table.get(1, "method"), "crawl");
        assert_eq!(table.get(1, "confidence"), "0.6");

        // row 2: nothing anywhere
        assert_eq!(table.get(2, "status"), "not_found");
        assert_eq!(table.get(2, "discovery_source"), "none");

        assert_eq!(counters.found_local, 1);
        assert_eq!(counters.prepared_with_urls, 1);
        assert_eq!(counters.found_crawl, 1);
    }

    #[tokio::test]
    async fn blocked_candidate_falls_through_to_next_url() {
        let pipeline = pipeline_with(vec![
            ("https://blocked-a.com", 403, ""),
            ("https://site-b.com", 200, "<html>hi@site-b.com</html>"),
        ]);

        let mut table = input_table(vec![[
            "https://blocked-a.com https://site-b.com",
            "",
            "",
            "",
        ]]);

        let counters = pipeline.run(&mut table).await;

        assert_eq!(table.get(0, "status"), "found");
        assert_eq!(table.get(0, "email"), "hi@site-b.com");
        assert_eq!(table.get(0, "source_url"), "https://site-b.com");
        assert_eq!(counters.crawl_blocked, 1);
        assert_eq!(counters.found_crawl, 1);
    }

    #[tokio::test]
    async fn row_ends_blocked_when_every_candidate_is_blocked() {
        let pipeline = pipeline_with(vec![("https://blocked-a.com", 429, "")]);

        let mut table = input_table(vec![["https://blocked-a.com", "", "", ""]]);
        let counters = pipeline.run(&mut table).await;

        assert_eq!(table.get(0, "status"), "blocked");
        assert_eq!(table.get(0, "email"), "");
        assert_eq!(counters.crawl_blocked, 1);
        assert_eq!(counters.found_crawl, 0);
    }

    #[tokio::test]
    async fn crawl_can_be_disabled() {
        let fetcher = FakeFetcher {
            pages: HashMap::new(),
        };
        let config = EnrichmentConfig {
            crawl_enabled: false,
            ..EnrichmentConfig::default()
        };
        let pipeline = EnrichmentPipeline::with_fetcher(config, 0, Box::new(fetcher));

        let mut table = input_table(vec![["https://site-a.com", "", "", ""]]);
        let counters = pipeline.run(&mut table).await;

        // discovery still ran, crawl did not
        assert_eq!(table.get(0, "external_urls"), "https://site-a.com");
        assert_eq!(table.get(0, "status"), "not_found");
        assert_eq!(counters.found_crawl, 0);
    }

    #[tokio::test]
    async fn rerun_never_touches_found_or_blocked_rows() {
        let pipeline = pipeline_with(vec![
            ("https://www.site-a.com", 200, "<html>owner@site-a.com</html>"),
            ("https://blocked-b.com", 403, ""),
        ]);

        let mut table = input_table(vec![
            ["", "my site is www.site-a.com", "", ""],
            ["https://blocked-b.com", "", "", ""],
        ]);

        pipeline.run(&mut table).await;
        let snapshot = table.clone();

        let counters = pipeline.run(&mut table).await;
        assert_eq!(table, snapshot);
        assert_eq!(counters.found_local, 0);
        assert_eq!(counters.found_crawl, 0);
        assert_eq!(counters.crawl_blocked, 0);
    }

    #[tokio::test]
    async fn limit_rows_truncates_processing() {
        let fetcher = FakeFetcher {
            pages: HashMap::new(),
        };
        let config = EnrichmentConfig {
            limit_rows: 1,
            crawl_enabled: false,
            ..EnrichmentConfig::default()
        };
        let pipeline = EnrichmentPipeline::with_fetcher(config, 0, Box::new(fetcher));

        let mut table = input_table(vec![
            ["", "", "", "a@real.com"],
            ["", "", "", "b@real.com"],
        ]);
        pipeline.run(&mut table).await;

        assert_eq!(table.get(0, "status"), "found");
        assert_eq!(table.get(1, "status"), "not_processed");
    }
}
