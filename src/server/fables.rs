use crate::models::{ErrorResponse, FableRequest, FableResponse};
use crate::server::state::AppState;
use crate::{Error, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate_fable", post(generate_fable))
}

#[utoipa::path(
    post,
    path = "/generate_fable",
    tag = "fables",
    request_body = FableRequest,
    responses(
        (status = 200, description = "Fable with its illustrations", body = FableResponse),
        (status = 401, description = "OpenAI API key missing or rejected", body = ErrorResponse),
        (status = 422, description = "Malformed or out-of-range request", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse),
    )
)]
pub async fn generate_fable(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<FableRequest>, JsonRejection>,
) -> Result<Json<FableResponse>> {
    let Json(request) = payload.map_err(|rejection| Error::Validation(rejection.body_text()))?;
    request.check()?;

    let app = state
        .app
        .clone()
        .ok_or_else(|| Error::Configuration("OpenAI API key not configured".to_string()))?;

    let span = tracing::info_span!("generate_fable", request_id = %Uuid::new_v4());
    let response = app.handle(&request).instrument(span).await?;

    Ok(Json(response))
}
