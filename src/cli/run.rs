use dialoguer::{theme::ColorfulTheme, Select};

use crate::cli::MenuAction;
use crate::models::{CliApp, Result};
use tracing::error;

impl CliApp {
    pub async fn run(&self) -> Result<()> {
        println!("\n📧 Welcome to Email Enricher!");
        println!("═══════════════════════════════════════");

        loop {
            let actions = vec![
                MenuAction::RunEnrichment,
                MenuAction::RunLocalOnly,
                MenuAction::ShowStats,
                MenuAction::ListExternalUrls,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::RunEnrichment => {
                    if let Err(e) = self.run_enrichment(true).await {
                        error!("Enrichment run failed: {}", e);
                    }
                }
                MenuAction::RunLocalOnly => {
                    if let Err(e) = self.run_enrichment(false).await {
                        error!("Local-only run failed: {}", e);
                    }
                }
                MenuAction::ShowStats => {
                    if let Err(e) = self.show_stats().await {
                        error!("Failed to show stats: {}", e);
                    }
                }
                MenuAction::ListExternalUrls => {
                    if let Err(e) = self.show_external_urls().await {
                        error!("Failed to list external URLs: {}", e);
                    }
                }
                MenuAction::Exit => {
                    println!("\n👋 Thanks for using Email Enricher!");
                    break;
                }
            }
        }

        Ok(())
    }
}
