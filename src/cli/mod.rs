pub mod cli;
mod run;
mod run_enrichment;
mod show_stats;
mod show_urls;

pub use cli::MenuAction;
