// src/cli/run_enrichment.rs
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tracing::warn;

use crate::models::{CliApp, Result};
use crate::pipeline::EnrichmentPipeline;
use crate::stats::{compute_stats, format_stats, write_summary_json};
use crate::table::{default_output_path, read_table, write_table};

impl CliApp {
    pub async fn run_enrichment(&self, crawl: bool) -> Result<()> {
        println!("\n📧 CSV Email Enrichment");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Input CSV path")
            .interact_text()?;
        let input_path = PathBuf::from(input.trim());

        if !input_path.exists() {
            println!("❌ File not found: {}", input_path.display());
            return Ok(());
        }

        let (mut table, delimiter) = read_table(&input_path, None)?;
        if table.is_empty() {
            println!("❌ No data rows in {}", input_path.display());
            return Ok(());
        }
        println!(
            "📄 Loaded {} rows from {} (delimiter {:?})",
            table.len(),
            input_path.display(),
            delimiter
        );

        let mut enrichment = self.config.enrichment.clone();
        enrichment.crawl_enabled = enrichment.crawl_enabled && crawl;

        if enrichment.crawl_enabled {
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "Crawl discovered sites (up to {} pages each)?",
                    enrichment.max_pages_per_crawl
                ))
                .default(true)
                .interact()?;
            enrichment.crawl_enabled = proceed;
        }

        let pipeline =
            EnrichmentPipeline::new(enrichment, self.config.logging.progress_interval);
        let counters = pipeline.run(&mut table).await;

        println!(
            "✅ Enrichment done: {} found locally, {} rows prepared with URLs, {} found via crawl",
            counters.found_local, counters.prepared_with_urls, counters.found_crawl
        );
        if counters.crawl_blocked > 0 || counters.crawl_errors > 0 {
            println!(
                "⚠️  Crawl candidates blocked: {} | errors: {}",
                counters.crawl_blocked, counters.crawl_errors
            );
        }

        let written = write_table(&table, &default_output_path(&input_path), delimiter)?;
        println!("💾 Output written to {}", written.display());

        let stats = compute_stats(&table);
        println!("\n{}", format_stats(&stats));

        match write_summary_json(&stats, &self.config.output) {
            Ok(path) => println!("🧾 Summary JSON: {}", path.display()),
            Err(e) => warn!("Could not write summary JSON: {}", e),
        }

        Ok(())
    }
}
