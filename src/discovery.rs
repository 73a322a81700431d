// src/discovery.rs - external URL discovery across prioritized row fields
use std::collections::HashMap;

use crate::urls::UrlClassifier;

pub const NO_DISCOVERY_SOURCE: &str = "none";

/// Controlled discovery configuration, built once per run.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Which fields to scan first (ordered).
    pub field_priority: Vec<String>,
    /// Max external URLs retained per row.
    pub max_urls_per_row: usize,
    /// Exclude domains like paypal.me that rarely yield contacts.
    pub exclude_low_value: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            field_priority: vec![
                "bio_links".to_string(),
                "bio_text".to_string(),
                "description".to_string(),
            ],
            max_urls_per_row: 2,
            exclude_low_value: true,
        }
    }
}

/// Scan row fields in priority order and return the retained URLs of the
/// first field that yields any, together with that field's name. This is a
/// short-circuiting search, not a merge across fields.
pub fn discover_external_urls(
    fields: &HashMap<String, String>,
    classifier: &UrlClassifier,
    config: &DiscoveryConfig,
) -> (Vec<String>, String) {
    for field in &config.field_priority {
        let raw = fields.get(field).map(String::as_str).unwrap_or("");
        let candidates = classifier.extract_urls(raw);
        let retained =
            classifier.filter_external(&candidates, config.max_urls_per_row, config.exclude_low_value);

        if !retained.is_empty() {
            return (retained, field.clone());
        }
    }

    (Vec::new(), NO_DISCOVERY_SOURCE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(bio_links: &str, bio_text: &str, description: &str) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        fields.insert("bio_links".to_string(), bio_links.to_string());
        fields.insert("bio_text".to_string(), bio_text.to_string());
        fields.insert("description".to_string(), description.to_string());
        fields
    }

    #[test]
    fn discovery_prefers_bio_links_when_present() {
        let classifier = UrlClassifier::new();
        let fields = row(
            "Check https://example.com and https://mybusiness.fr/contact",
            "also www.other.com",
            "desc example.org",
        );

        let (urls, source) =
            discover_external_urls(&fields, &classifier, &DiscoveryConfig::default());
        assert_eq!(source, "bio_links");
        assert!(urls.contains(&"https://example.com".to_string()));
        assert!(urls.contains(&"https://mybusiness.fr/contact".to_string()));
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn discovery_falls_back_to_bio_text() {
        let classifier = UrlClassifier::new();
        let fields = row("", "My site is www.example.com/contact", "");

        let (urls, source) =
            discover_external_urls(&fields, &classifier, &DiscoveryConfig::default());
        assert_eq!(source, "bio_text");
        assert!(urls.contains(&"https://www.example.com/contact".to_string()));
    }

    #[test]
    fn discovery_falls_back_to_description() {
        let classifier = UrlClassifier::new();
        let fields = row("", "", "Reach me at mybusiness.co.uk");

        let (urls, source) =
            discover_external_urls(&fields, &classifier, &DiscoveryConfig::default());
        assert_eq!(source, "description");
        assert!(urls.contains(&"https://mybusiness.co.uk".to_string()));
    }

    #[test]
    fn discovery_returns_none_when_no_urls() {
        let classifier = UrlClassifier::new();
        let fields = row("", "hello world", "");

        let (urls, source) =
            discover_external_urls(&fields, &classifier, &DiscoveryConfig::default());
        assert!(urls.is_empty());
        assert_eq!(source, NO_DISCOVERY_SOURCE);
    }

    #[test]
    fn discovery_excludes_social_and_low_value_domains() {
        let classifier = UrlClassifier::new();
        let fields = row(
            "https://tiktok.com/@x https://paypal.me/abc https://example.com",
            "",
            "",
        );
        let config = DiscoveryConfig {
            max_urls_per_row: 5,
            ..DiscoveryConfig::default()
        };

        let (urls, source) = discover_external_urls(&fields, &classifier, &config);
        assert_eq!(source, "bio_links");
        assert!(urls.contains(&"https://example.com".to_string()));
        assert!(urls.iter().all(|u| !u.contains("tiktok.com")));
        assert!(urls.iter().all(|u| !u.contains("paypal.me")));
    }

    #[test]
    fn discovery_ignores_missing_fields() {
        let classifier = UrlClassifier::new();
        let mut fields = HashMap::new();
        fields.insert("bio_text".to_string(), "www.example.com".to_string());

        let (urls, source) =
            discover_external_urls(&fields, &classifier, &DiscoveryConfig::default());
        assert_eq!(source, "bio_text");
        assert_eq!(urls, vec!["https://www.example.com".to_string()]);
    }
}
