// src/stats.rs - run summary over the final table
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::config::OutputConfig;
use crate::models::{EnrichMethod, Result, RowStatus};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total_rows: usize,
    pub found_total: usize,
    pub found_local: usize,
    pub found_crawl: usize,
    pub blocked: usize,
    pub not_found: usize,
    pub prepared_with_external_urls: usize,
}

impl RunStats {
    pub fn recovery_rate_pct(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        let rate = self.found_total as f64 / self.total_rows as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

pub fn compute_stats(table: &Table) -> RunStats {
    let mut stats = RunStats {
        total_rows: table.len(),
        found_total: 0,
        found_local: 0,
        found_crawl: 0,
        blocked: 0,
        not_found: 0,
        prepared_with_external_urls: 0,
    };

    for idx in 0..table.len() {
        let status = table.get(idx, "status");
        let method = table.get(idx, "method");

        if status == RowStatus::Found.as_str() {
            stats.found_total += 1;
            if method == EnrichMethod::DetectedEmails.as_str()
                || method == EnrichMethod::BioText.as_str()
            {
                stats.found_local += 1;
            } else if method == EnrichMethod::Crawl.as_str() {
                stats.found_crawl += 1;
            }
        } else if status == RowStatus::Blocked.as_str() {
            stats.blocked += 1;
        } else if status == RowStatus::NotFound.as_str() {
            stats.not_found += 1;
        }

        if !table.get(idx, "external_urls").is_empty() {
            stats.prepared_with_external_urls += 1;
        }
    }

    stats
}

pub fn format_stats(stats: &RunStats) -> String {
    format!(
        "=== Run Summary ===\n\
         Total rows: {}\n\
         Found (total): {} ({:.2}%)\n\
         \x20 - Found (local): {}\n\
         \x20 - Found (crawl): {}\n\
         Prepared with external URLs: {}\n\
         Blocked (403/429): {}\n\
         Not found: {}\n",
        stats.total_rows,
        stats.found_total,
        stats.recovery_rate_pct(),
        stats.found_local,
        stats.found_crawl,
        stats.prepared_with_external_urls,
        stats.blocked,
        stats.not_found,
    )
}

/// Drop a machine-readable copy of the summary into the output directory.
pub fn write_summary_json(stats: &RunStats, output: &OutputConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(&output.directory)?;

    let path = PathBuf::from(&output.directory).join(format!(
        "run_summary_{}.json",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    let json = if output.pretty_json {
        serde_json::to_string_pretty(stats)?
    } else {
        serde_json::to_string(stats)?
    };
    std::fs::write(&path, json)?;

    Ok(path)
}
