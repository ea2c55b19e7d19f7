//! Cache freshness policy.
//!
//! Only the first offer in a record is inspected. A record with one fresh
//! provider and one stale provider is therefore reported fresh; callers that
//! need per-provider freshness cannot rely on [`is_fresh`].

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::offers::OfferRecord;

/// Default staleness window for cached offers.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Returns `true` when `record` can be served without refetching.
///
/// The window is exclusive: an offer exactly `ttl` old is stale. Timestamps
/// in the future count as fresh.
#[must_use]
pub fn is_fresh(record: Option<&OfferRecord>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let Some(first) = record.and_then(|r| r.offers.first()) else {
        return false;
    };
    let Ok(ttl) = chrono::Duration::from_std(ttl) else {
        // Window too large to represent; nothing can be stale.
        return true;
    };
    now.signed_duration_since(first.last_updated) < ttl
}
