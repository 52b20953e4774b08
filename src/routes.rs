use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::waitlist::{referral_handler, referral_redirect, waitlist_handler},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/waitlist", waitlist_handler())
        .nest("/referrals", referral_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/ref/:code",
            get(referral_redirect).layer(Extension(app_state)),
        )
        .nest("/api", api_route)
}
