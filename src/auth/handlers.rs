use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RefreshResponse},
        jwt::{BearerToken, JwtKeys},
    },
    error::ApiError,
    extract::AppJson,
    state::AppState,
    store::StoreError,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

fn sign_access(state: &AppState, user_id: u64) -> Result<String, ApiError> {
    JwtKeys::from_ref(state).sign_access(user_id).map_err(|e| {
        error!(error = %e, user_id, "jwt sign access failed");
        ApiError::Internal(e.to_string())
    })
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = match state
        .store
        .verify_credentials(payload.email.trim(), &payload.password)
    {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "login rejected");
            return Err(e.into());
        }
    };

    let token = sign_access(&state, user.id)?;
    let refresh_token = state.store.issue_refresh_token(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        token,
        refresh_token,
    }))
}

#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<RefreshResponse>, ApiError> {
    let user_id = state.store.verify_refresh_token(&token)?;
    let user = state.store.get_user(user_id).map_err(|_| ApiError::Unauthorized)?;
    let token = sign_access(&state, user.id)?;
    Ok(Json(RefreshResponse { token }))
}

#[instrument(skip_all)]
pub async fn revoke(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, ApiError> {
    match state.store.revoke_refresh_token(&token) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound) => Err(ApiError::Unauthorized),
        Err(e) => Err(e.into()),
    }
}
