use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{ChirpRequest, ValidatedChirp};
use super::filter::{clean_body, is_too_long};
use crate::{
    error::ApiError,
    extract::{AppJson, AppPath},
    state::AppState,
    store::Chirp,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/:chirp_id", get(get_chirp))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chirps", post(create_chirp))
        .route("/api/validate_chirp", post(validate_chirp))
}

// --- handlers ---

fn checked_body(body: &str) -> Result<String, ApiError> {
    if is_too_long(body) {
        warn!(len = body.chars().count(), "chirp too long");
        return Err(ApiError::BadRequest("Chirp is too long".into()));
    }
    Ok(clean_body(body))
}

#[instrument(skip(payload))]
pub async fn validate_chirp(
    AppJson(payload): AppJson<ChirpRequest>,
) -> Result<Json<ValidatedChirp>, ApiError> {
    let cleaned_body = checked_body(&payload.body)?;
    Ok(Json(ValidatedChirp { cleaned_body }))
}

#[instrument(skip(state, payload))]
pub async fn create_chirp(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>), ApiError> {
    let body = checked_body(&payload.body)?;
    let chirp = state.store.create_chirp(&body)?;
    Ok((StatusCode::CREATED, Json(chirp)))
}

#[instrument(skip(state))]
pub async fn list_chirps(State(state): State<AppState>) -> Json<Vec<Chirp>> {
    Json(state.store.get_chirps())
}

#[instrument(skip(state))]
pub async fn get_chirp(
    State(state): State<AppState>,
    AppPath(chirp_id): AppPath<u64>,
) -> Result<Json<Chirp>, ApiError> {
    Ok(Json(state.store.get_chirp(chirp_id)?))
}
