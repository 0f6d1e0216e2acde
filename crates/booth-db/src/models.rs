//! Database row types: these map directly to SQLite rows.
//! Conversions into the booth-types API models live at the bottom.

use booth_types::models::{Booth, BoothBook, BoothImage, BoothVideo, Score, Subject, User};

pub struct UserRow {
    pub id: String,
    pub username: String,
}

pub struct SubjectRow {
    pub id: i64,
    pub name: String,
}

pub struct BoothRow {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub congestion: i64,
}

pub struct BoothImageRow {
    pub id: i64,
    pub booth_id: i64,
    pub image: String,
}

pub struct BoothVideoRow {
    pub id: i64,
    pub booth_id: i64,
    pub url: String,
}

pub struct BoothBookRow {
    pub id: i64,
    pub booth_id: i64,
    pub user_id: String,
    pub period: i64,
}

pub struct ScoreRow {
    pub id: i64,
    pub user_id: String,
    pub booth_id: i64,
    pub score: i64,
    pub created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<BoothRow> for Booth {
    fn from(row: BoothRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            content: row.content,
            congestion: row.congestion,
        }
    }
}

impl From<BoothImageRow> for BoothImage {
    fn from(row: BoothImageRow) -> Self {
        Self {
            id: row.id,
            booth_id: row.booth_id,
            image: row.image,
        }
    }
}

impl From<BoothVideoRow> for BoothVideo {
    fn from(row: BoothVideoRow) -> Self {
        Self {
            id: row.id,
            booth_id: row.booth_id,
            url: row.url,
        }
    }
}

impl From<BoothBookRow> for BoothBook {
    fn from(row: BoothBookRow) -> Self {
        Self {
            id: row.id,
            booth_id: row.booth_id,
            user_id: row.user_id,
            period: row.period,
        }
    }
}

impl From<ScoreRow> for Score {
    fn from(row: ScoreRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            booth_id: row.booth_id,
            score: row.score,
            created_at: row.created_at,
        }
    }
}
