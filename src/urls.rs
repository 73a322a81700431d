// src/urls.rs - URL normalization and domain classification
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Characters stripped from both ends of extracted emails and URLs.
pub const STRIP_CHARS: &[char] = &[
    ' ', '\t', '\r', '\n', '"', '\'', '(', ')', '[', ']', '{', '}', '<', '>', ',', ';', ':', '.',
];

/// Domains excluded from crawling. Blocked domains are social/profile
/// platforms; low-value domains rarely lead to a contact email.
#[derive(Debug, Clone)]
pub struct DomainPolicy {
    pub blocked: HashSet<String>,
    pub low_value: HashSet<String>,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        let blocked = [
            "tiktok.com",
            "www.tiktok.com",
            "instagram.com",
            "www.instagram.com",
            "facebook.com",
            "www.facebook.com",
            "youtube.com",
            "www.youtube.com",
            "m.youtube.com",
            "youtu.be",
            "x.com",
            "www.x.com",
            "twitter.com",
            "www.twitter.com",
            "linkedin.com",
            "www.linkedin.com",
        ];
        let low_value = ["paypal.me", "www.paypal.me"];

        Self {
            blocked: blocked.iter().map(|d| d.to_string()).collect(),
            low_value: low_value.iter().map(|d| d.to_string()).collect(),
        }
    }
}

pub struct UrlClassifier {
    http_regex: Regex,
    www_regex: Regex,
    // permissive domain shape: label(.label)+ plus a 2-24 letter tld
    domain_regex: Regex,
    policy: DomainPolicy,
}

impl UrlClassifier {
    pub fn new() -> Self {
        Self::with_policy(DomainPolicy::default())
    }

    pub fn with_policy(policy: DomainPolicy) -> Self {
        Self {
            http_regex: Regex::new(r#"(?i)\bhttps?://[^\s<>"]+"#).unwrap(),
            www_regex: Regex::new(r#"(?i)\bwww\.[^\s<>"]+"#).unwrap(),
            domain_regex: Regex::new(r"(?i)\b(?:[a-z0-9-]+\.)+[a-z]{2,24}\b").unwrap(),
            policy,
        }
    }

    /// Normalize a raw text fragment into a canonical URL string.
    /// Returns "" when the fragment is not a URL; that is a signal, not an error.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim().trim_matches(STRIP_CHARS);
        if trimmed.is_empty() {
            return String::new();
        }

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else if trimmed.starts_with("www.") {
            format!("https://{trimmed}")
        } else if self.is_probable_domain(trimmed) {
            format!("https://{trimmed}")
        } else {
            return String::new();
        };

        let Ok(parsed) = Url::parse(&candidate) else {
            return String::new();
        };
        let Some(host) = parsed.host_str() else {
            return String::new();
        };

        // drop query and fragment, keep scheme + host + path
        let mut out = format!("{}://{}", parsed.scheme(), host);
        if let Some(port) = parsed.port() {
            out.push(':');
            out.push_str(&port.to_string());
        }
        if parsed.path() != "/" {
            out.push_str(parsed.path());
        }
        out
    }

    /// Lowercase host of a URL; "" on parse failure.
    pub fn domain_of(&self, url: &str) -> String {
        let Ok(parsed) = Url::parse(url) else {
            return String::new();
        };
        let Some(host) = parsed.host_str() else {
            return String::new();
        };
        let mut domain = host.to_lowercase();
        if let Some(port) = parsed.port() {
            domain.push(':');
            domain.push_str(&port.to_string());
        }
        domain
    }

    /// Heuristic for schemeless input: does this look like domain.tld?
    pub fn is_probable_domain(&self, text: &str) -> bool {
        let t = text.trim_matches(STRIP_CHARS).to_lowercase();
        if t.is_empty() {
            return false;
        }
        // spaces, slashes and @ rule out both prose and emails
        if t.contains(' ') || t.contains('/') || t.contains('\\') || t.contains('@') {
            return false;
        }
        self.domain_regex.is_match(&t)
    }

    /// Scan arbitrary text for http(s)://, www. and bare domain.tld spans.
    /// Returns normalized URLs, deduplicated in first-occurrence order.
    pub fn extract_urls(&self, text: &str) -> Vec<String> {
        let candidates = self
            .http_regex
            .find_iter(text)
            .map(|m| m.as_str())
            .chain(self.www_regex.find_iter(text).map(|m| m.as_str()))
            .chain(self.domain_regex.find_iter(text).map(|m| m.as_str()));

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for candidate in candidates {
            let normalized = self.normalize(candidate);
            if normalized.is_empty() {
                continue;
            }
            if seen.insert(normalized.clone()) {
                out.push(normalized);
            }
        }
        out
    }

    /// Keep useful external URLs: drop blocked domains (always) and low-value
    /// domains (when enabled), preserve input order, stop at `max_urls`.
    pub fn filter_external(
        &self,
        urls: &[String],
        max_urls: usize,
        exclude_low_value: bool,
    ) -> Vec<String> {
        let mut out = Vec::new();
        for url in urls {
            let normalized = self.normalize(url);
            if normalized.is_empty() {
                continue;
            }

            let domain = self.domain_of(&normalized);
            if domain.is_empty() {
                continue;
            }
            if self.policy.blocked.contains(&domain) {
                continue;
            }
            if exclude_low_value && self.policy.low_value.contains(&domain) {
                continue;
            }

            out.push(normalized);
            if out.len() >= max_urls {
                break;
            }
        }
        out
    }
}
