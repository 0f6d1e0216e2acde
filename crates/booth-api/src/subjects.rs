use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use booth_db::SubjectReplaceOutcome;
use booth_types::api::{CreateSubjectRequest, IdResponse, ReplaceSubjectsRequest, SubjectsResponse};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, db_call};

pub async fn list_subjects(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, |db| db.list_subjects()).await?;
    Ok(Json(SubjectsResponse {
        subjects: rows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_subject(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateSubjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }

    let id = db_call(&state, move |db| db.create_subject(&req.name)).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn get_user_subjects(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = db_call(&state, move |db| db.get_user_subjects(&user_id)).await?;
    Ok(Json(SubjectsResponse {
        subjects: rows.into_iter().map(Into::into).collect(),
    }))
}

/// POST /subject/{user_id}: replace the user's whole subject set.
pub async fn replace_user_subjects(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(req): ApiJson<ReplaceSubjectsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subject_ids: Vec<i64> = req.subjects.iter().map(|s| s.id).collect();

    let uid = user_id.clone();
    let outcome = db_call(&state, move |db| db.replace_user_subjects(&uid, &subject_ids)).await?;

    match outcome {
        SubjectReplaceOutcome::Replaced(count) => {
            info!(user_id = %user_id, count, "User subjects replaced");
            Ok(Json(IdResponse { id: user_id }))
        }
        SubjectReplaceOutcome::UserNotFound => Err(ApiError::NotFound("user")),
        SubjectReplaceOutcome::UnknownSubject(id) => {
            Err(ApiError::BadRequest(format!("unknown subject {}", id)))
        }
    }
}
