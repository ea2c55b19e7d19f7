//! Merge-on-write rules for freshly fetched offers.

use std::collections::BTreeMap;

use crate::offers::{Location, Offer, OfferRecord};

/// Folds a freshly fetched offer into the matched record, or creates one.
///
/// With no existing record, the new record takes `query_name` as its name
/// (not whatever name the provider reported). With an existing record, any
/// offer from the same provider is dropped and `fetched` is appended last, so
/// a record never holds two offers from one provider. The stored location is
/// replaced only when the caller supplied one.
#[must_use]
pub fn merge(
    existing: Option<OfferRecord>,
    query_name: &str,
    fetched: Offer,
    query_location: Option<Location>,
) -> OfferRecord {
    match existing {
        None => OfferRecord {
            id: None,
            name: query_name.to_string(),
            location: query_location,
            external_ids: BTreeMap::new(),
            offers: vec![fetched],
        },
        Some(mut record) => {
            record.offers.retain(|o| o.provider != fetched.provider);
            record.offers.push(fetched);
            if let Some(location) = query_location {
                record.location = Some(location);
            }
            record
        }
    }
}

/// Records a provider-specific identifier for later exact-match lookups.
///
/// Blank ids are ignored so a provider that stops reporting one does not
/// erase the last known value.
pub fn record_external_id(record: &mut OfferRecord, provider: &str, external_id: Option<&str>) {
    if let Some(id) = external_id.map(str::trim).filter(|id| !id.is_empty()) {
        record
            .external_ids
            .insert(provider.to_string(), id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap()
    }

    fn offer(provider: &str, discount: &str, last_updated: DateTime<Utc>) -> Offer {
        Offer {
            provider: provider.to_string(),
            discount: discount.to_string(),
            deep_link: format!("http://{}", provider.to_lowercase()),
            last_updated,
        }
    }

    fn existing(offers: Vec<Offer>, location: Option<Location>) -> OfferRecord {
        OfferRecord {
            id: Some(Uuid::new_v4()),
            name: "Pizza Place".to_string(),
            location,
            external_ids: BTreeMap::new(),
            offers,
        }
    }

    fn providers(record: &OfferRecord) -> Vec<&str> {
        record.offers.iter().map(|o| o.provider.as_str()).collect()
    }

    fn offer_for<'a>(record: &'a OfferRecord, provider: &str) -> Option<&'a Offer> {
        record.offers.iter().find(|o| o.provider == provider)
    }

    #[test]
    fn creates_record_from_query_name() {
        let loc = Location { lat: 40.0, lng: -74.0 };
        let rec = merge(None, "pizza place", offer("X", "10%", at(0)), Some(loc));
        assert!(rec.id.is_none());
        assert_eq!(rec.name, "pizza place");
        assert_eq!(rec.location, Some(loc));
        assert_eq!(providers(&rec), vec!["X"]);
        assert!(rec.external_ids.is_empty());
    }

    #[test]
    fn creates_record_without_location() {
        let rec = merge(None, "Pizza Place", offer("X", "10%", at(0)), None);
        assert!(rec.location.is_none());
    }

    #[test]
    fn same_provider_twice_keeps_latest_only() {
        let first = merge(None, "Pizza Place", offer("X", "10%", at(0)), None);
        let second = merge(Some(first), "Pizza Place", offer("X", "25%", at(5)), None);
        assert_eq!(second.offers.len(), 1);
        assert_eq!(second.offers[0].discount, "25%");
        assert_eq!(second.offers[0].last_updated, at(5));
    }

    #[test]
    fn new_provider_is_appended_after_others() {
        let rec = existing(
            vec![offer("A", "5%", at(0)), offer("B", "10%", at(1))],
            None,
        );
        let merged = merge(Some(rec), "Pizza Place", offer("C", "15%", at(2)), None);
        assert_eq!(providers(&merged), vec!["A", "B", "C"]);
    }

    #[test]
    fn refreshed_provider_moves_to_end() {
        let rec = existing(
            vec![
                offer("A", "5%", at(0)),
                offer("B", "10%", at(1)),
                offer("C", "15%", at(2)),
            ],
            None,
        );
        let merged = merge(Some(rec), "Pizza Place", offer("A", "20%", at(3)), None);
        assert_eq!(providers(&merged), vec!["B", "C", "A"]);
        assert_eq!(offer_for(&merged, "A").map(|o| o.discount.as_str()), Some("20%"));
    }

    #[test]
    fn duplicate_provider_entries_are_all_removed() {
        let rec = existing(
            vec![
                offer("X", "1%", at(0)),
                offer("Y", "2%", at(1)),
                offer("X", "3%", at(2)),
            ],
            None,
        );
        let merged = merge(Some(rec), "Pizza Place", offer("X", "4%", at(3)), None);
        assert_eq!(providers(&merged), vec!["Y", "X"]);
    }

    #[test]
    fn existing_name_and_id_are_kept() {
        let rec = existing(vec![offer("A", "5%", at(0))], None);
        let id = rec.id;
        let merged = merge(Some(rec), "pizza", offer("B", "5%", at(1)), None);
        assert_eq!(merged.name, "Pizza Place");
        assert_eq!(merged.id, id);
    }

    #[test]
    fn missing_location_leaves_existing_untouched() {
        let loc = Location { lat: 1.5, lng: 2.5 };
        let rec = existing(vec![], Some(loc));
        let merged = merge(Some(rec), "Pizza Place", offer("A", "5%", at(0)), None);
        assert_eq!(merged.location, Some(loc));
    }

    #[test]
    fn supplied_location_replaces_existing() {
        let old = Location { lat: 1.5, lng: 2.5 };
        let new = Location { lat: -33.9, lng: 151.2 };
        let rec = existing(vec![], Some(old));
        let merged = merge(Some(rec), "Pizza Place", offer("A", "5%", at(0)), Some(new));
        assert_eq!(merged.location, Some(new));
    }

    #[test]
    fn merge_does_not_restamp_other_providers() {
        let rec = existing(vec![offer("A", "5%", at(0))], None);
        let merged = merge(
            Some(rec),
            "Pizza Place",
            offer("B", "5%", at(0) + Duration::minutes(30)),
            None,
        );
        assert_eq!(offer_for(&merged, "A").map(|o| o.last_updated), Some(at(0)));
    }

    #[test]
    fn external_id_is_recorded_per_provider() {
        let mut rec = existing(vec![], None);
        record_external_id(&mut rec, "X", Some("x-123"));
        record_external_id(&mut rec, "Y", Some("  "));
        record_external_id(&mut rec, "Z", None);
        assert_eq!(rec.external_ids.len(), 1);
        assert_eq!(rec.external_ids.get("X").map(String::as_str), Some("x-123"));

        record_external_id(&mut rec, "X", Some("x-456"));
        assert_eq!(rec.external_ids.get("X").map(String::as_str), Some("x-456"));
    }
}
