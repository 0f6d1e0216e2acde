use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Booth, BoothBook, BoothImage, BoothVideo, Score, Subject, User};

// -- Generic --

/// `{"id": ...}` acknowledgement returned by most write endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse<T> {
    pub id: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExistResponse {
    pub exist: bool,
}

// -- Subjects --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSubjectRequest {
    pub name: String,
}

/// Only `id` is read from each entry; clients may echo the whole subject back.
#[derive(Debug, Deserialize)]
pub struct SubjectRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSubjectsRequest {
    pub subjects: Vec<SubjectRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectsResponse {
    pub subjects: Vec<Subject>,
}

// -- Booths --

#[derive(Debug, Deserialize)]
pub struct NewBoothRequest {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub congestion: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewBoothResponse {
    pub id: i64,
    /// Plaintext exhibitor password. Only ever returned here.
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditBoothRequest {
    pub id: i64,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub congestion: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoothResponse {
    pub booth: Booth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoothsResponse {
    pub booths: Vec<Booth>,
}

#[derive(Debug, Deserialize)]
pub struct BoothAuthRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CongestionResponse {
    pub congestion: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCongestionRequest {
    pub congestion: i64,
}

// -- Media --

#[derive(Debug, Deserialize)]
pub struct NewImageRequest {
    pub booth_id: i64,
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<BoothImage>,
}

#[derive(Debug, Deserialize)]
pub struct NewVideoRequest {
    pub booth_id: i64,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideosResponse {
    pub videos: Vec<BoothVideo>,
}

// -- Bookings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingUserRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingCreatedResponse {
    pub id: i64,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoothBooksResponse {
    pub booth_books: Vec<BoothBook>,
}

// -- Scores --

#[derive(Debug, Deserialize)]
pub struct NewScoreRequest {
    pub user_id: String,
    pub booth_id: i64,
    pub score: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreCreatedResponse {
    pub id: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoresResponse {
    pub scores: Vec<Score>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalScoreResponse {
    pub total_score: i64,
}

/// Leaderboard: per-user score sums, keyed by user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserScoresResponse {
    pub user_scores: BTreeMap<String, i64>,
}
