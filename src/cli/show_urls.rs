// src/cli/show_urls.rs
use std::collections::BTreeSet;
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Input};

use crate::models::{CliApp, Result};
use crate::table::read_table;

impl CliApp {
    /// Print the unique external URLs discovery retained across all rows.
    pub async fn show_external_urls(&self) -> Result<()> {
        println!("\n🌐 Discovered External URLs");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enriched CSV path")
            .interact_text()?;
        let path = PathBuf::from(input.trim());

        if !path.exists() {
            println!("❌ File not found: {}", path.display());
            return Ok(());
        }

        let (table, _) = read_table(&path, None)?;

        let mut unique = BTreeSet::new();
        for idx in 0..table.len() {
            for url in table.get(idx, "external_urls").split('|') {
                let url = url.trim();
                if !url.is_empty() {
                    unique.insert(url.to_string());
                }
            }
        }

        for url in &unique {
            println!("- {}", url);
        }
        println!("\nTotal unique external URLs: {}", unique.len());

        Ok(())
    }
}
