use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geographic point supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// One provider's discount for a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub provider: String,
    pub discount: String,
    pub deep_link: String,
    pub last_updated: DateTime<Utc>,
}

/// Offer payload as produced by a fetcher, before it is stamped for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedOffer {
    pub provider: String,
    pub discount: String,
    #[serde(alias = "deepLink")]
    pub deep_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Offer {
    /// Builds a stored offer from a fetched payload, stamped with `now`.
    #[must_use]
    pub fn stamped(scraped: &ScrapedOffer, now: DateTime<Utc>) -> Self {
        Self {
            provider: scraped.provider.clone(),
            discount: scraped.discount.clone(),
            deep_link: scraped.deep_link.clone(),
            last_updated: now,
        }
    }
}

/// Cached offers for a single restaurant.
///
/// `offers` holds at most one entry per provider, ordered by write recency
/// (most recently written provider last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Storage identity; `None` until the record is first persisted.
    pub id: Option<Uuid>,
    pub name: String,
    pub location: Option<Location>,
    #[serde(default)]
    pub external_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

/// Case-folds a restaurant name for matching.
///
/// A stored record matches a query when the folded query is a literal
/// substring of the folded name. Storage keeps the folded form next to the raw
/// name so matching never depends on database collation.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> OfferRecord {
        OfferRecord {
            id: None,
            name: name.to_string(),
            location: None,
            external_ids: BTreeMap::new(),
            offers: vec![],
        }
    }

    fn folded_contains(stored: &str, query: &str) -> bool {
        fold_name(stored).contains(&fold_name(query))
    }

    #[test]
    fn folded_match_is_case_insensitive_substring() {
        assert!(folded_contains("Pizza Place", "pizza"));
        assert!(folded_contains("Pizza Place", "ZZA PL"));
        assert!(folded_contains("Pizza Place", "Pizza Place"));
        assert!(!folded_contains("Pizza Place", "Burger"));
    }

    #[test]
    fn folded_match_treats_pattern_characters_literally() {
        assert!(folded_contains("Joe's (Downtown) Grill", "(downtown)"));
        assert!(folded_contains("A+ Diner", "a+"));
        assert!(!folded_contains("Aaa Diner", "a+"));
        assert!(!folded_contains("Pizza Place", ".*"));
        assert!(folded_contains("Cafe [Beta] $5", "[beta] $"));
        assert!(!folded_contains("Cafe Beta", "b|c"));
    }

    #[test]
    fn fold_name_handles_non_ascii_case() {
        assert_eq!(fold_name("CAFÉ ÉTOILE"), "café étoile");
        assert!(folded_contains("CAFÉ ÉTOILE", "café"));
    }

    #[test]
    fn scraped_offer_accepts_camel_case_deep_link() {
        let raw = r#"{"provider":"X","discount":"10%","deepLink":"http://x"}"#;
        let parsed: ScrapedOffer = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.deep_link, "http://x");
        assert!(parsed.external_id.is_none());
    }

    #[test]
    fn offer_record_serializes_snake_case_fields() {
        let mut rec = record("Taco Town");
        rec.offers.push(Offer {
            provider: "X".to_string(),
            discount: "2 for 1".to_string(),
            deep_link: "http://x/taco".to_string(),
            last_updated: Utc::now(),
        });
        let json = serde_json::to_value(&rec).expect("serialize");
        assert_eq!(json["offers"][0]["deep_link"], "http://x/taco");
        assert!(json["offers"][0]["last_updated"].is_string());
        assert!(json["external_ids"].is_object());
        assert!(json["location"].is_null());
    }
}
