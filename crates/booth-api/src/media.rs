use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_types::api::{IdResponse, ImagesResponse, NewImageRequest, NewVideoRequest, VideosResponse};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

// -- Images --

pub async fn add_image(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.image.is_empty() {
        return Err(ApiError::BadRequest("image must not be empty".into()));
    }

    let booth_id = req.booth_id;
    let id = db_call(&state, move |db| db.add_booth_image(req.booth_id, &req.image))
        .await?
        .ok_or(ApiError::NotFound("booth"))?;

    info!(booth_id, image_id = id, "Booth image added");
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn list_images(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| {
        if !db.booth_exists(booth_id)? {
            return Ok(None);
        }
        db.get_booth_images(booth_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("booth"))?;

    Ok(Json(ImagesResponse {
        images: rows.into_iter().map(Into::into).collect(),
    }))
}

// -- Videos --

pub async fn add_video(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".into()));
    }

    let booth_id = req.booth_id;
    let id = db_call(&state, move |db| db.add_booth_video(req.booth_id, &req.url))
        .await?
        .ok_or(ApiError::NotFound("booth"))?;

    info!(booth_id, video_id = id, "Booth video added");
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn list_videos(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| {
        if !db.booth_exists(booth_id)? {
            return Ok(None);
        }
        db.get_booth_videos(booth_id).map(Some)
    })
    .await?
    .ok_or(ApiError::NotFound("booth"))?;

    Ok(Json(VideosResponse {
        videos: rows.into_iter().map(Into::into).collect(),
    }))
}
