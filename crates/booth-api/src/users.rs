use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_types::api::{ExistResponse, IdResponse, RegisterRequest, TotalScoreResponse, UserResponse};

use crate::auth::hash_user_password;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.id.trim().is_empty() {
        return Err(ApiError::BadRequest("id must not be empty".into()));
    }
    if req.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username must not be empty".into()));
    }

    let user_id = req.id.clone();
    let created = db_call(&state, move |db| {
        let password_hash = hash_user_password(&req.password)?;
        db.create_user(&req.id, &req.username, &password_hash)
    })
    .await?;

    if !created {
        return Err(ApiError::Conflict(format!("user {} already exists", user_id)));
    }

    info!(user_id = %user_id, "User registered");
    Ok((StatusCode::CREATED, Json(IdResponse { id: user_id })))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db_call(&state, move |db| db.get_user(&user_id))
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserResponse { user: user.into() }))
}

pub async fn user_exists(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let exist = db_call(&state, move |db| db.user_exists(&user_id)).await?;
    Ok(Json(ExistResponse { exist }))
}

/// Mounted under both /user and /score.
pub async fn total_score(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let total_score = db_call(&state, move |db| db.get_total_score(&user_id)).await?;
    Ok(Json(TotalScoreResponse { total_score }))
}
