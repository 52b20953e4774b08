use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::waitlistdtos::*,
    error::HttpError,
    AppState,
};

pub fn waitlist_handler() -> Router {
    Router::new()
        .route("/", post(join_waitlist))
        .route("/leaderboard", get(get_leaderboard))
        .route("/:entry_id/referral-stats", get(get_referral_stats))
}

pub fn referral_handler() -> Router {
    Router::new().route("/:code/validate", get(validate_referral_code))
}

pub async fn join_waitlist(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<JoinWaitlistQueryDto>,
    body: Result<Json<JoinWaitlistDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected signup body: {}", rejection.body_text());
        HttpError::from(rejection)
    })?;

    let outcome = app_state
        .waitlist_service
        .join_waitlist(body, query.referral_code)
        .await
        .map_err(HttpError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponseDto {
            status: "success".to_string(),
            success: true,
            user_id: outcome.entry_id.to_string(),
            referral_code: outcome.referral_code,
            referral_link: outcome.referral_link,
            referred: outcome.referred_by.is_some(),
        }),
    ))
}

/// Always answers 200. A failed query yields an empty board marked
/// `unavailable` so the page still renders.
pub async fn get_leaderboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let (status, leaderboard) = match app_state.waitlist_service.leaderboard().await {
        Ok(rows) => ("success", rows),
        Err(e) => {
            tracing::error!("Error fetching leaderboard: {}", e);
            ("unavailable", Vec::new())
        }
    };

    Json(LeaderboardResponseDto {
        status: status.to_string(),
        results: leaderboard.len(),
        leaderboard,
    })
}

pub async fn get_referral_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .waitlist_service
        .referral_stats(entry_id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ReferralStatsResponseDto {
        status: "success".to_string(),
        data: stats,
    }))
}

pub async fn validate_referral_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let valid = app_state.waitlist_service.is_valid_referral_code(&code).await;

    Json(ReferralCodeValidityDto {
        status: "success".to_string(),
        referral_code: code,
        valid,
    })
}

/// Landing route for shared links: honoured codes are carried to the signup
/// page, anything else goes to the plain landing page.
pub async fn referral_redirect(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
) -> Redirect {
    let landing = app_state.env.app_url.trim_end_matches('/');

    if app_state.waitlist_service.is_valid_referral_code(&code).await {
        Redirect::temporary(&format!("{}/?ref={}", landing, code))
    } else {
        tracing::debug!("Ignoring unknown referral link {}", code);
        Redirect::temporary(&format!("{}/", landing))
    }
}
