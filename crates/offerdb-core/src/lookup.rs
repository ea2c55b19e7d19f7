//! Request orchestration: cache check, fetch, merge, persist.
//!
//! A request reads the cache, optionally fetches, then writes, strictly in
//! that order. There is no locking between requests: two concurrent lookups
//! for the same restaurant can interleave and the later write wins for the
//! whole document. If the fetch future is dropped, nothing is written.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::freshness::is_fresh;
use crate::offers::{Location, Offer, OfferRecord};
use crate::reconcile::{merge, record_external_id};
use crate::store::{FetchError, OfferFetcher, OfferStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to read offer cache: {0}")]
    Storage(#[source] BoxError),

    #[error("offer fetch failed: {0}")]
    FetchProcess(String),

    #[error("{0}")]
    FetchApplication(String),

    #[error("failed to parse offer fetch output")]
    Parse { raw: String },

    #[error("failed to persist offers: {0}")]
    Persistence(#[source] BoxError),
}

impl From<FetchError> for LookupError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Process(details) => Self::FetchProcess(details),
            FetchError::Application(message) => Self::FetchApplication(message),
            FetchError::Parse { raw } => Self::Parse { raw },
        }
    }
}

/// A validated inbound lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub name: String,
    pub city: String,
    pub location: Option<Location>,
}

impl LookupRequest {
    /// Validates raw request fields.
    ///
    /// `name` and `city` are required; blank values count as missing. A
    /// location is attached only when both `lat` and `lng` are given.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Validation`] when `name` or `city` is missing or
    /// contains a NUL character, or when a coordinate is present but not a
    /// finite number.
    pub fn validate(
        name: Option<&str>,
        city: Option<&str>,
        lat: Option<&str>,
        lng: Option<&str>,
    ) -> Result<Self, LookupError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.trim().is_empty())
        }

        let (Some(name), Some(city)) = (present(name), present(city)) else {
            return Err(LookupError::Validation(
                "name and city are required".to_string(),
            ));
        };
        if name.contains('\0') || city.contains('\0') {
            return Err(LookupError::Validation(
                "name and city must not contain NUL characters".to_string(),
            ));
        }

        let lat = parse_coordinate("lat", present(lat))?;
        let lng = parse_coordinate("lng", present(lng))?;
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        };

        Ok(Self {
            name: name.to_string(),
            city: city.to_string(),
            location,
        })
    }
}

fn parse_coordinate(field: &str, raw: Option<&str>) -> Result<Option<f64>, LookupError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(LookupError::Validation(format!(
            "{field} must be a number, got {raw:?}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    pub record: OfferRecord,
    pub cache: CacheStatus,
}

/// Resolves offers for `request`, serving from cache when fresh.
///
/// On a miss the fetcher is called, the stored record is read again, and the
/// fetched offer is merged into it before a single upsert.
///
/// # Errors
///
/// Returns the [`LookupError`] variant matching the failing stage. Only a
/// [`LookupError::Persistence`] can occur after the store was touched, and the
/// write is all-or-nothing.
pub async fn resolve_offers<S, F>(
    store: &S,
    fetcher: &F,
    request: &LookupRequest,
    ttl: Duration,
) -> Result<LookupOutcome, LookupError>
where
    S: OfferStore + Sync,
    F: OfferFetcher + Sync,
{
    let cached = store
        .find_by_fuzzy_name(&request.name)
        .await
        .map_err(|e| LookupError::Storage(Box::new(e)))?;

    if let Some(record) = cached {
        if is_fresh(Some(&record), Utc::now(), ttl) {
            tracing::info!(name = %request.name, record = %record.name, "serving cached offers");
            return Ok(LookupOutcome {
                record,
                cache: CacheStatus::Hit,
            });
        }
    }

    tracing::info!(name = %request.name, city = %request.city, "cache miss; fetching offers");
    let scraped = fetcher
        .fetch(&request.name, &request.city)
        .await
        .map_err(|err| {
            match &err {
                FetchError::Application(message) => {
                    tracing::info!(name = %request.name, reason = %message, "no offers reported");
                }
                FetchError::Process(details) => {
                    tracing::error!(name = %request.name, details = %details, "offer fetch failed");
                }
                FetchError::Parse { raw } => {
                    tracing::error!(name = %request.name, raw = %raw, "offer fetch output unparseable");
                }
            }
            LookupError::from(err)
        })?;

    let existing = store
        .find_by_fuzzy_name(&request.name)
        .await
        .map_err(|e| LookupError::Storage(Box::new(e)))?;

    let offer = Offer::stamped(&scraped, Utc::now());
    let mut merged = merge(existing, &request.name, offer, request.location);
    record_external_id(&mut merged, &scraped.provider, scraped.external_id.as_deref());

    let record = store.upsert(merged).await.map_err(|e| {
        tracing::error!(name = %request.name, error = %e, "failed to persist offers");
        LookupError::Persistence(Box::new(e))
    })?;

    Ok(LookupOutcome {
        record,
        cache: CacheStatus::Miss,
    })
}
