use crate::config::Config;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Fixed confidence scores attached to a found email, by producing stage.
pub const CONFIDENCE_DETECTED: &str = "1.0";
pub const CONFIDENCE_BIO: &str = "0.8";
pub const CONFIDENCE_CRAWL: &str = "0.6";

/// Row lifecycle within a run. Stored in the table as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    NotProcessed,
    Found,
    NotFound,
    Blocked,
}

impl RowStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RowStatus::NotProcessed => "not_processed",
            RowStatus::Found => "found",
            RowStatus::NotFound => "not_found",
            RowStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stage produced a row's email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichMethod {
    DetectedEmails,
    BioText,
    Crawl,
}

impl EnrichMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EnrichMethod::DetectedEmails => "detected_emails",
            EnrichMethod::BioText => "bio_text",
            EnrichMethod::Crawl => "crawl",
        }
    }
}

impl std::fmt::Display for EnrichMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct CliApp {
    pub config: Config,
}
