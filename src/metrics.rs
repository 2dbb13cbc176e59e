//! Fileserver visit counter.

use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Html, Response},
    routing::get,
    Router,
};
use tracing::info;

use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/metrics", get(admin_metrics))
        .route("/api/reset", get(reset))
}

/// Middleware counting every request that reaches the fileserver.
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

pub async fn admin_metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {hits} times!</p></body></html>"
    ))
}

pub async fn reset(State(state): State<AppState>) -> &'static str {
    state.hits.store(0, Ordering::Relaxed);
    info!("hit counter reset");
    "Hits reset to 0"
}
