use axum::{
    extract::{Query, State},
    Extension, Json,
};
use offerdb_core::{resolve_offers, LookupRequest, OfferRecord};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_lookup_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Raw query parameters. Everything is optional here so that missing fields
/// surface through the API error envelope rather than axum's extractor error.
#[derive(Debug, Deserialize)]
pub(super) struct OfferQuery {
    pub name: Option<String>,
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

pub(super) async fn get_offers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<OfferQuery>,
) -> Result<Json<ApiResponse<OfferRecord>>, ApiError> {
    let request = LookupRequest::validate(
        query.name.as_deref(),
        query.city.as_deref(),
        query.lat.as_deref(),
        query.lng.as_deref(),
    )
    .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    let outcome = resolve_offers(
        &state.store,
        state.scraper.as_ref(),
        &request,
        state.cache_ttl,
    )
    .await
    .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome.record,
        meta: ResponseMeta::new(req_id.0).with_cache(outcome.cache),
    }))
}
