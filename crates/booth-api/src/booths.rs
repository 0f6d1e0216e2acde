use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_types::api::{
    BoothResponse, BoothsResponse, CongestionResponse, EditBoothRequest, IdResponse,
    NewBoothRequest, NewBoothResponse, UpdateCongestionRequest,
};

use crate::auth::{booth_password_digest, generate_booth_password};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

fn check_congestion(congestion: i64) -> Result<(), ApiError> {
    if congestion < 0 {
        return Err(ApiError::BadRequest("congestion must not be negative".into()));
    }
    Ok(())
}

/// POST /booth/new: the generated password is only ever revealed here.
pub async fn create_booth(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewBoothRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    check_congestion(req.congestion)?;

    let password = generate_booth_password();
    let digest = booth_password_digest(&password);

    let id = db_call(&state, move |db| {
        db.create_booth(&req.name, &req.content, req.congestion, &digest)
    })
    .await?;

    info!(booth_id = id, "Booth created");
    Ok((StatusCode::CREATED, Json(NewBoothResponse { id, password })))
}

pub async fn edit_booth(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EditBoothRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    check_congestion(req.congestion)?;

    let id = req.id;
    let updated = db_call(&state, move |db| {
        db.update_booth(req.id, &req.name, &req.content, req.congestion)
    })
    .await?;

    if !updated {
        return Err(ApiError::NotFound("booth"));
    }
    Ok(Json(IdResponse { id }))
}

pub async fn get_booth(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let booth = db_call(&state, move |db| db.get_booth(booth_id))
        .await?
        .ok_or(ApiError::NotFound("booth"))?;

    Ok(Json(BoothResponse { booth: booth.into() }))
}

pub async fn list_booths(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, |db| db.list_booths()).await?;
    Ok(Json(BoothsResponse {
        booths: rows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_congestion(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let congestion = db_call(&state, move |db| db.get_congestion(booth_id))
        .await?
        .ok_or(ApiError::NotFound("booth"))?;

    Ok(Json(CongestionResponse { congestion }))
}

pub async fn update_congestion(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateCongestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let congestion = req.congestion;
    check_congestion(congestion)?;

    let updated = db_call(&state, move |db| db.set_congestion(booth_id, congestion)).await?;
    if !updated {
        return Err(ApiError::NotFound("booth"));
    }

    info!(booth_id, congestion, "Congestion updated");
    Ok(Json(IdResponse { id: booth_id }))
}
