use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::observer::Observer;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/api/scan",
    tag = "scan",
    params(
        ("lat" = f64, Query, description = "Observer latitude in degrees [-90, 90]"),
        ("lon" = f64, Query, description = "Observer longitude in degrees [-180, 180]"),
        ("alt" = Option<f64>, Query, description = "Observer altitude in meters (default 0)")
    ),
    responses(
        (status = 200, description = "Ranked sky objects above the observer", body = crate::scan::SkyReport),
        (status = 400, description = "Invalid observer coordinates")
    )
)]
pub async fn scan(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> ApiResult<impl IntoResponse> {
    let observer = Observer::new(query.lat, query.lon, query.alt.unwrap_or(0.0), Utc::now())
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let report = state.scanner.scan(observer).await;

    Ok((StatusCode::OK, Json(report)))
}
