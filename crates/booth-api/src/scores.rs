use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_types::api::{NewScoreRequest, ScoreCreatedResponse, ScoresResponse, UserScoresResponse};
use booth_types::format_score_timestamp;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

/// POST /score: scores are append-only and stamped by the server.
pub async fn add_score(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewScoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }

    let created_at = format_score_timestamp(chrono::Utc::now());
    let stamp = created_at.clone();
    let id = db_call(&state, move |db| {
        db.insert_score(&req.user_id, req.booth_id, req.score, &stamp)
    })
    .await?;

    info!(score_id = id, "Score recorded");
    Ok((StatusCode::CREATED, Json(ScoreCreatedResponse { id, created_at })))
}

pub async fn user_scores(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| db.get_user_scores(&user_id)).await?;
    Ok(Json(ScoresResponse {
        scores: rows.into_iter().map(Into::into).collect(),
    }))
}

/// GET /score: per-user totals across everyone.
pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let totals = db_call(&state, |db| db.get_all_user_scores()).await?;
    Ok(Json(UserScoresResponse {
        user_scores: totals.into_iter().collect(),
    }))
}
