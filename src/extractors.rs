// src/extractors.rs - email extraction, placeholder filtering, local enrichment
use regex::Regex;
use std::collections::HashSet;

use crate::models::{EnrichMethod, RowStatus, CONFIDENCE_BIO, CONFIDENCE_DETECTED};
use crate::urls::STRIP_CHARS;

/// Documentation/example addresses that must never be reported as contacts.
#[derive(Debug, Clone)]
pub struct PlaceholderPolicy {
    pub domains: HashSet<String>,
    pub domain_substrings: Vec<String>,
    pub fake_tlds: Vec<String>,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            domains: ["example.com", "example.org", "example.net"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            // e.g. utilisateur@nomdedomaine.extension
            domain_substrings: vec!["nomdedomaine".to_string(), "domainname".to_string()],
            fake_tlds: vec!["extension".to_string()],
        }
    }
}

pub struct EmailExtractor {
    email_regex: Regex,
    policy: PlaceholderPolicy,
}

/// Result of the local enrichment step over a row's own text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalEnrichment {
    pub email: String,
    pub source: String,
    pub method: String,
    pub status: RowStatus,
    pub confidence: String,
}

impl LocalEnrichment {
    fn not_found() -> Self {
        Self {
            email: String::new(),
            source: String::new(),
            method: String::new(),
            status: RowStatus::NotFound,
            confidence: String::new(),
        }
    }
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self::with_policy(PlaceholderPolicy::default())
    }

    pub fn with_policy(policy: PlaceholderPolicy) -> Self {
        Self {
            email_regex: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap(),
            policy,
        }
    }

    /// Extract and normalize emails from arbitrary text, deduplicated in
    /// first-occurrence order.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for found in self.email_regex.find_iter(text) {
            let email = found.as_str().trim_matches(STRIP_CHARS).to_lowercase();

            let parts: Vec<&str> = email.split('@').collect();
            if parts.len() != 2 || !parts[1].contains('.') {
                continue;
            }
            if email.contains(char::is_whitespace) {
                continue;
            }

            if seen.insert(email.clone()) {
                out.push(email);
            }
        }
        out
    }

    /// True for documentation artifacts like user@example.com or
    /// utilisateur@nomdedomaine.extension.
    pub fn is_placeholder(&self, email: &str) -> bool {
        let lowered = email.to_lowercase();
        let Some((_, domain)) = lowered.split_once('@') else {
            return true;
        };

        if self.policy.domains.contains(domain) {
            return true;
        }
        if self
            .policy
            .domain_substrings
            .iter()
            .any(|sub| domain.contains(sub.as_str()))
        {
            return true;
        }
        if let Some((_, tld)) = domain.rsplit_once('.') {
            if self.policy.fake_tlds.iter().any(|fake| fake == tld) {
                return true;
            }
        }
        false
    }

    /// `extract` minus placeholders, order preserved.
    pub fn extract_filtered(&self, text: &str) -> Vec<String> {
        self.extract(text)
            .into_iter()
            .filter(|email| !self.is_placeholder(email))
            .collect()
    }

    /// Local enrichment over the two prioritized row fields:
    /// detected_emails (confidence 1.0) wins over bio_text (confidence 0.8).
    pub fn enrich_local(&self, bio_text: &str, detected_emails: &str) -> LocalEnrichment {
        if let Some(email) = self.extract_filtered(detected_emails).into_iter().next() {
            return LocalEnrichment {
                email,
                source: EnrichMethod::DetectedEmails.as_str().to_string(),
                method: EnrichMethod::DetectedEmails.as_str().to_string(),
                status: RowStatus::Found,
                confidence: CONFIDENCE_DETECTED.to_string(),
            };
        }

        if let Some(email) = self.extract_filtered(bio_text).into_iter().next() {
            return LocalEnrichment {
                email,
                source: EnrichMethod::BioText.as_str().to_string(),
                method: EnrichMethod::BioText.as_str().to_string(),
                status: RowStatus::Found,
                confidence: CONFIDENCE_BIO.to_string(),
            };
        }

        LocalEnrichment::not_found()
    }
}
