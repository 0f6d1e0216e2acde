use serde::{Deserialize, Serialize};

/// Public view of a registered user. The password never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booth {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub congestion: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothImage {
    pub id: i64,
    pub booth_id: i64,
    /// Image payload as the client sent it (URL or data URI).
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothVideo {
    pub id: i64,
    pub booth_id: i64,
    pub url: String,
}

/// One booked `period` slot at a booth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothBook {
    pub id: i64,
    pub booth_id: i64,
    pub user_id: String,
    pub period: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub user_id: String,
    pub booth_id: i64,
    pub score: i64,
    pub created_at: String,
}
