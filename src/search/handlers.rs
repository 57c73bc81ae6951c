use super::engine::SearchEngine;
use super::normalizer::{REASON_MALFORMED_QUERY, collect_params};
use super::types::{ErrorBody, ErrorResponse, HealthResponse, RawSearchParams, SearchResponse};
use crate::error::{SearchError, ValidationError};

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;

/// Radius search.
pub const ENDPOINT_SEARCH_NEARBY: &str = "/api/search/nearby";
/// Bounding-box (map viewport) search.
pub const ENDPOINT_SEARCH_BOUNDS: &str = "/api/search/bounds";
/// Liveness and catalog reachability.
pub const ENDPOINT_HEALTH: &str = "/health";

type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<ErrorResponse>)>;

/// Query pairs as decoded by axum, duplicates preserved.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

pub fn router(engine: Arc<SearchEngine>) -> Router {
    Router::new()
        .route(ENDPOINT_SEARCH_NEARBY, get(handle_search_nearby))
        .route(ENDPOINT_SEARCH_BOUNDS, get(handle_search_bounds))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(engine))
}

pub async fn handle_search_nearby(
    Extension(engine): Extension<Arc<SearchEngine>>,
    query: QueryPairs,
) -> ApiResult<SearchResponse> {
    let params = raw_params(query).map_err(error_response)?;
    match engine.search_radius(&params).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn handle_search_bounds(
    Extension(engine): Extension<Arc<SearchEngine>>,
    query: QueryPairs,
) -> ApiResult<SearchResponse> {
    let params = raw_params(query).map_err(error_response)?;
    match engine.search_bounds(&params).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn handle_health(
    Extension(engine): Extension<Arc<SearchEngine>>,
) -> (StatusCode, Json<HealthResponse>) {
    let report = engine.health().await;
    let status = if report.reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report.to_response()))
}

fn raw_params(query: QueryPairs) -> Result<RawSearchParams, SearchError> {
    let Query(pairs) = query.map_err(|rejection| {
        let mut errors = ValidationError::default();
        errors.push("query", REASON_MALFORMED_QUERY, Some(&rejection.body_text()));
        errors
    })?;
    Ok(collect_params(pairs)?)
}

pub fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::Validation(_) => StatusCode::BAD_REQUEST,
        SearchError::Catalog(_) => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::CatalogTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        SearchError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: SearchError) -> (StatusCode, Json<ErrorResponse>) {
    let status = status_for(&err);
    if status.is_client_error() {
        tracing::debug!("Rejected search request: {}", err);
    }

    let fields = match &err {
        SearchError::Validation(validation) => Some(validation.fields.clone()),
        _ => None,
    };
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
                fields,
            },
        }),
    )
}
