use crate::config::Config;
use crate::models::CliApp;

#[derive(Debug, Clone)]
pub enum MenuAction {
    RunEnrichment,
    RunLocalOnly,
    ShowStats,
    ListExternalUrls,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::RunEnrichment => {
                write!(f, "🚀 Enrich a CSV (local fields + discovery + crawl)")
            }
            MenuAction::RunLocalOnly => {
                write!(f, "📋 Enrich a CSV without crawling (local fields + discovery)")
            }
            MenuAction::ShowStats => write!(f, "📊 Show run summary for an enriched CSV"),
            MenuAction::ListExternalUrls => {
                write!(f, "🌐 List discovered external URLs from an enriched CSV")
            }
            MenuAction::Exit => write!(f, "🚪 Exit"),
        }
    }
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
