// src/cli/show_stats.rs
use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Input};

use crate::models::{CliApp, Result};
use crate::stats::{compute_stats, format_stats};
use crate::table::read_table;

impl CliApp {
    pub async fn show_stats(&self) -> Result<()> {
        println!("\n📊 Run Summary");
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
        println!("\n{}", format_stats(&compute_stats(&table)));

        Ok(())
    }
}
