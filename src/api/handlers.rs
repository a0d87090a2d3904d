use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Asset, RawRecommendationRequest, RecommendationResponse};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

// Handlers

/// Liveness check; always 200 while the process serves requests
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.selector.model_loaded(),
    })
}

/// Readiness check; 503 while the service can only answer from cold-start rules
pub async fn readiness(State(state): State<AppState>) -> AppResult<StatusCode> {
    if state.selector.model_loaded() {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::ModelUnavailable("no model loaded".to_string()))
    }
}

/// The asset catalog, in catalog order
pub async fn list_assets(State(state): State<AppState>) -> Json<Vec<Asset>> {
    Json(state.catalog.assets().to_vec())
}

/// `GET /recommend` with query parameters
pub async fn recommend_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RawRecommendationRequest>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(raw) = query.map_err(|e| AppError::MalformedRequest(e.body_text()))?;
    recommend(state, request_id, raw).await
}

/// `POST /recommend` with a JSON body
pub async fn recommend_json(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RawRecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(raw) = body.map_err(|e| AppError::MalformedRequest(e.body_text()))?;
    recommend(state, request_id, raw).await
}

async fn recommend(
    state: AppState,
    request_id: RequestId,
    raw: RawRecommendationRequest,
) -> AppResult<Json<RecommendationResponse>> {
    let request = raw.into_request()?;

    tracing::info!(
        request_id = %request_id,
        risk_tolerance = ?request.risk_tolerance,
        top_k = ?request.top_k,
        "Processing recommendation request"
    );

    let response = state
        .selector
        .recommend(
            request.user_id.as_deref(),
            request.risk_tolerance.as_deref(),
            request.top_k,
        )
        .await?;

    tracing::info!(
        request_id = %request_id,
        source = response.source.as_str(),
        count = response.recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(response))
}
