use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    extract::AppJson,
    state::AppState,
    store::StoreError,
    users::dto::{PublicUser, UserRequest},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", post(create_user).put(update_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles");
    }
    EMAIL_RE.is_match(email)
}

fn validate(payload: &mut UserRequest) -> Result<(), ApiError> {
    payload.email = payload.email.trim().to_owned();
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password.is_empty() {
        warn!("empty password");
        return Err(ApiError::BadRequest("Password is required".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<UserRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    validate(&mut payload)?;

    // Ensure email is not taken
    match state.store.find_user_by_email(&payload.email) {
        Ok(_) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let user = state.store.create_user(&payload.email, &payload.password)?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(mut payload): AppJson<UserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    validate(&mut payload)?;

    match state.store.find_user_by_email(&payload.email) {
        Ok(other) if other.id != user_id => {
            warn!(user_id, "email belongs to another user");
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        Ok(_) | Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let user = state
        .store
        .update_user(user_id, &payload.email, &payload.password)
        .map_err(|e| match e {
            // token outlived its user
            StoreError::NotFound => ApiError::Unauthorized,
            e => e.into(),
        })?;
    Ok(Json(user.into()))
}
