use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_db::BookingOutcome;
use booth_types::api::{BookingCreatedResponse, BookingUserRequest, BoothBooksResponse, IdResponse};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

/// POST /booth/book/{booth_id}/{period}
pub async fn book(
    State(state): State<AppState>,
    ApiPath((booth_id, period)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<BookingUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }

    let user_id = req.user_id;
    let uid = user_id.clone();
    let outcome = db_call(&state, move |db| db.book_slot(booth_id, period, &uid)).await?;

    match outcome {
        BookingOutcome::Booked(id) => {
            info!(booth_id, period, user_id = %user_id, "Slot booked");
            Ok((StatusCode::CREATED, Json(BookingCreatedResponse { id, user_id })))
        }
        BookingOutcome::AlreadyBooked => Err(ApiError::AlreadyBooked),
        BookingOutcome::BoothNotFound => Err(ApiError::NotFound("booth")),
    }
}

/// GET /booth/book/{booth_id}
pub async fn list_for_booth(
    State(state): State<AppState>,
    ApiPath(booth_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| db.get_booth_bookings(booth_id)).await?;
    Ok(Json(BoothBooksResponse {
        booth_books: rows.into_iter().map(Into::into).collect(),
    }))
}

/// GET /booth/book/{booth_id}/{period}
pub async fn list_for_slot(
    State(state): State<AppState>,
    ApiPath((booth_id, period)): ApiPath<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| db.get_slot_bookings(booth_id, period)).await?;
    Ok(Json(BoothBooksResponse {
        booth_books: rows.into_iter().map(Into::into).collect(),
    }))
}

/// GET /booth/book/u/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| db.get_user_bookings(&user_id)).await?;
    Ok(Json(BoothBooksResponse {
        booth_books: rows.into_iter().map(Into::into).collect(),
    }))
}

/// DELETE /booth/book/{booth_id}/{period}
pub async fn cancel(
    State(state): State<AppState>,
    ApiPath((booth_id, period)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<BookingUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req.user_id;
    let uid = user_id.clone();
    let removed = db_call(&state, move |db| db.cancel_booking(booth_id, period, &uid)).await?;

    if removed == 0 {
        return Err(ApiError::NotFound("booking"));
    }

    info!(booth_id, period, user_id = %user_id, "Booking cancelled");
    Ok(Json(IdResponse { id: booth_id }))
}
