use crate::Database;
use crate::models::{
    BoothBookRow, BoothImageRow, BoothRow, BoothVideoRow, ScoreRow, SubjectRow, UserRow,
};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row};
use tracing::{debug, warn};

/// Result of a booking attempt for one (booth, period) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked(i64),
    AlreadyBooked,
    BoothNotFound,
}

/// Result of replacing a user's subject set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectReplaceOutcome {
    Replaced(usize),
    UserNotFound,
    /// Nothing was changed; the first unknown id is reported.
    UnknownSubject(i64),
}

impl Database {
    // -- Users --

    /// Returns false when the id is already registered.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(inserted == 1)
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT id, username FROM users WHERE id = ?1", [id], |row| {
                Ok(UserRow {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            })
            .optional()
        })
    }

    pub fn user_exists(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| query_user_exists(conn, id))
    }

    // -- Subjects --

    pub fn create_subject(&self, name: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO subjects (name) VALUES (?1)", [name])?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_subjects(&self) -> Result<Vec<SubjectRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY id")?;
            let rows = stmt
                .query_map([], subject_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user_subjects(&self, user_id: &str) -> Result<Vec<SubjectRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT s.id, s.name
                 FROM user_subjects us
                 JOIN subjects s ON s.id = us.subject_id
                 WHERE us.user_id = ?1
                 ORDER BY s.id",
            )?;
            let rows = stmt
                .query_map([user_id], subject_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Full replace of a user's subject links in one transaction.
    pub fn replace_user_subjects(
        &self,
        user_id: &str,
        subject_ids: &[i64],
    ) -> Result<SubjectReplaceOutcome> {
        self.with_tx(|conn| {
            if !query_user_exists(conn, user_id)? {
                return Ok(SubjectReplaceOutcome::UserNotFound);
            }

            for &subject_id in subject_ids {
                let known: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = ?1)",
                    [subject_id],
                    |row| row.get(0),
                )?;
                if !known {
                    return Ok(SubjectReplaceOutcome::UnknownSubject(subject_id));
                }
            }

            conn.execute("DELETE FROM user_subjects WHERE user_id = ?1", [user_id])?;

            let mut stmt = conn.prepare(
                "INSERT OR IGNORE INTO user_subjects (user_id, subject_id) VALUES (?1, ?2)",
            )?;
            let mut linked = 0;
            for &subject_id in subject_ids {
                linked += stmt.execute(rusqlite::params![user_id, subject_id])?;
            }

            Ok(SubjectReplaceOutcome::Replaced(linked))
        })
    }

    // -- Booths --

    /// Insert a booth together with its password digest.
    pub fn create_booth(
        &self,
        name: &str,
        content: &str,
        congestion: i64,
        password_digest: &str,
    ) -> Result<i64> {
        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO booths (name, content, congestion) VALUES (?1, ?2, ?3)",
                rusqlite::params![name, content, congestion],
            )?;
            let booth_id = conn.last_insert_rowid();

            conn.execute(
                "INSERT INTO booth_passwords (booth_id, password_digest) VALUES (?1, ?2)",
                rusqlite::params![booth_id, password_digest],
            )?;

            Ok(booth_id)
        })
    }

    /// Full-row update. Returns false if no booth has this id.
    pub fn update_booth(&self, id: i64, name: &str, content: &str, congestion: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE booths SET name = ?1, content = ?2, congestion = ?3 WHERE id = ?4",
                rusqlite::params![name, content, congestion, id],
            )?;
            Ok(updated == 1)
        })
    }

    pub fn get_booth(&self, id: i64) -> Result<Option<BoothRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, name, content, congestion FROM booths WHERE id = ?1",
                [id],
                booth_from_row,
            )
            .optional()
        })
    }

    pub fn list_booths(&self) -> Result<Vec<BoothRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, content, congestion FROM booths ORDER BY id")?;
            let rows = stmt
                .query_map([], booth_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn booth_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| query_booth_exists(conn, id))
    }

    pub fn get_congestion(&self, booth_id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT congestion FROM booths WHERE id = ?1",
                [booth_id],
                |row| row.get(0),
            )
            .optional()
        })
    }

    pub fn set_congestion(&self, booth_id: i64, congestion: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE booths SET congestion = ?1 WHERE id = ?2",
                [congestion, booth_id],
            )?;
            Ok(updated == 1)
        })
    }

    pub fn find_booth_by_password_digest(&self, digest: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT booth_id FROM booth_passwords WHERE password_digest = ?1",
                [digest],
                |row| row.get(0),
            )
            .optional()
        })
    }

    // -- Media --

    /// Returns None if the booth does not exist.
    pub fn add_booth_image(&self, booth_id: i64, image: &str) -> Result<Option<i64>> {
        self.with_tx(|conn| {
            if !query_booth_exists(conn, booth_id)? {
                return Ok(None);
            }
            conn.execute(
                "INSERT INTO booth_images (booth_id, image) VALUES (?1, ?2)",
                rusqlite::params![booth_id, image],
            )?;
            Ok(Some(conn.last_insert_rowid()))
        })
    }

    pub fn get_booth_images(&self, booth_id: i64) -> Result<Vec<BoothImageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, booth_id, image FROM booth_images WHERE booth_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([booth_id], |row| {
                    Ok(BoothImageRow {
                        id: row.get(0)?,
                        booth_id: row.get(1)?,
                        image: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns None if the booth does not exist.
    pub fn add_booth_video(&self, booth_id: i64, url: &str) -> Result<Option<i64>> {
        self.with_tx(|conn| {
            if !query_booth_exists(conn, booth_id)? {
                return Ok(None);
            }
            conn.execute(
                "INSERT INTO booth_videos (booth_id, url) VALUES (?1, ?2)",
                rusqlite::params![booth_id, url],
            )?;
            Ok(Some(conn.last_insert_rowid()))
        })
    }

    pub fn get_booth_videos(&self, booth_id: i64) -> Result<Vec<BoothVideoRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, booth_id, url FROM booth_videos WHERE booth_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([booth_id], |row| {
                    Ok(BoothVideoRow {
                        id: row.get(0)?,
                        booth_id: row.get(1)?,
                        url: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Bookings --

    /// Check-then-insert for a slot, atomic under an immediate transaction.
    pub fn book_slot(&self, booth_id: i64, period: i64, user_id: &str) -> Result<BookingOutcome> {
        self.with_tx(|conn| {
            if !query_booth_exists(conn, booth_id)? {
                return Ok(BookingOutcome::BoothNotFound);
            }

            let taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM booth_books WHERE booth_id = ?1 AND period = ?2)",
                [booth_id, period],
                |row| row.get(0),
            )?;
            if taken {
                debug!(booth_id, period, "Slot already booked");
                return Ok(BookingOutcome::AlreadyBooked);
            }

            match conn.execute(
                "INSERT INTO booth_books (booth_id, user_id, period) VALUES (?1, ?2, ?3)",
                rusqlite::params![booth_id, user_id, period],
            ) {
                Ok(_) => Ok(BookingOutcome::Booked(conn.last_insert_rowid())),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    warn!(booth_id, period, "Slot unique index rejected booking");
                    Ok(BookingOutcome::AlreadyBooked)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_booth_bookings(&self, booth_id: i64) -> Result<Vec<BoothBookRow>> {
        self.with_conn(|conn| {
            query_bookings(
                conn,
                "SELECT id, booth_id, user_id, period FROM booth_books
                 WHERE booth_id = ?1 ORDER BY period, id",
                &[&booth_id],
            )
        })
    }

    pub fn get_slot_bookings(&self, booth_id: i64, period: i64) -> Result<Vec<BoothBookRow>> {
        self.with_conn(|conn| {
            query_bookings(
                conn,
                "SELECT id, booth_id, user_id, period FROM booth_books
                 WHERE booth_id = ?1 AND period = ?2 ORDER BY id",
                &[&booth_id, &period],
            )
        })
    }

    pub fn get_user_bookings(&self, user_id: &str) -> Result<Vec<BoothBookRow>> {
        self.with_conn(|conn| {
            query_bookings(
                conn,
                "SELECT id, booth_id, user_id, period FROM booth_books
                 WHERE user_id = ?1 ORDER BY booth_id, period",
                &[&user_id],
            )
        })
    }

    /// Delete the booking held by `user_id` for this slot. Returns rows removed.
    pub fn cancel_booking(&self, booth_id: i64, period: i64, user_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM booth_books WHERE booth_id = ?1 AND period = ?2 AND user_id = ?3",
                rusqlite::params![booth_id, period, user_id],
            )?;
            Ok(removed)
        })
    }

    // -- Scores --

    pub fn insert_score(
        &self,
        user_id: &str,
        booth_id: i64,
        score: i64,
        created_at: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO scores (user_id, booth_id, score, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user_id, booth_id, score, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_scores(&self, user_id: &str) -> Result<Vec<ScoreRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, booth_id, score, created_at FROM scores
                 WHERE user_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ScoreRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        booth_id: row.get(2)?,
                        score: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Sum of all scores for a user; 0 when there are none.
    pub fn get_total_score(&self, user_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let total = conn.query_row(
                "SELECT COALESCE(SUM(score), 0) FROM scores WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(total)
        })
    }

    /// Per-user score sums for the leaderboard, ordered by user id.
    pub fn get_all_user_scores(&self) -> Result<Vec<(String, i64)>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, SUM(score) FROM scores GROUP BY user_id ORDER BY user_id",
            )?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user_exists(conn: &Connection, id: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn query_booth_exists(conn: &Connection, id: i64) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM booths WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn query_bookings(
    conn: &Connection,
    sql: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<BoothBookRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(BoothBookRow {
                id: row.get(0)?,
                booth_id: row.get(1)?,
                user_id: row.get(2)?,
                period: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn subject_from_row(row: &Row<'_>) -> rusqlite::Result<SubjectRow> {
    Ok(SubjectRow {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn booth_from_row(row: &Row<'_>) -> rusqlite::Result<BoothRow> {
    Ok(BoothRow {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        congestion: row.get(3)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn registered_user_exists() {
        let db = db();
        assert!(db.create_user("u1", "alice", "hash").unwrap());

        assert!(db.user_exists("u1").unwrap());
        assert!(!db.user_exists("u2").unwrap());
        assert_eq!(db.get_user("u1").unwrap().unwrap().username, "alice");
        assert!(db.get_user("u2").unwrap().is_none());
    }

    #[test]
    fn duplicate_user_id_is_rejected() {
        let db = db();
        assert!(db.create_user("u1", "alice", "hash").unwrap());
        assert!(!db.create_user("u1", "mallory", "hash").unwrap());
        assert_eq!(db.get_user("u1").unwrap().unwrap().username, "alice");
    }

    #[test]
    fn booth_round_trip_and_edit() {
        let db = db();
        let id = db.create_booth("Robots", "Line followers", 2, "digest").unwrap();

        let booth = db.get_booth(id).unwrap().unwrap();
        assert_eq!(booth.name, "Robots");
        assert_eq!(booth.content, "Line followers");
        assert_eq!(booth.congestion, 2);

        assert!(db.update_booth(id, "Drones", "Quadcopters", 0).unwrap());
        assert_eq!(db.get_booth(id).unwrap().unwrap().name, "Drones");
        assert!(!db.update_booth(id + 1, "x", "y", 0).unwrap());
        assert!(db.get_booth(id + 1).unwrap().is_none());
    }

    #[test]
    fn password_digest_maps_to_its_booth() {
        let db = db();
        let first = db.create_booth("A", "a", 0, "aaaa").unwrap();
        let second = db.create_booth("B", "b", 0, "bbbb").unwrap();

        assert_eq!(db.find_booth_by_password_digest("aaaa").unwrap(), Some(first));
        assert_eq!(db.find_booth_by_password_digest("bbbb").unwrap(), Some(second));
        assert_eq!(db.find_booth_by_password_digest("cccc").unwrap(), None);
    }

    #[test]
    fn congestion_get_and_set() {
        let db = db();
        let id = db.create_booth("A", "a", 1, "d").unwrap();

        assert_eq!(db.get_congestion(id).unwrap(), Some(1));
        assert!(db.set_congestion(id, 5).unwrap());
        assert_eq!(db.get_congestion(id).unwrap(), Some(5));
        assert!(!db.set_congestion(id + 1, 5).unwrap());
        assert_eq!(db.get_congestion(id + 1).unwrap(), None);
    }

    #[test]
    fn media_requires_existing_booth() {
        let db = db();
        let id = db.create_booth("A", "a", 0, "d").unwrap();

        assert!(db.add_booth_image(id, "https://img/1.png").unwrap().is_some());
        assert!(db.add_booth_video(id, "https://video/1").unwrap().is_some());
        assert!(db.add_booth_image(id + 1, "x").unwrap().is_none());
        assert!(db.add_booth_video(id + 1, "x").unwrap().is_none());

        assert_eq!(db.get_booth_images(id).unwrap().len(), 1);
        assert_eq!(db.get_booth_videos(id).unwrap()[0].url, "https://video/1");
    }

    #[test]
    fn second_booking_for_slot_is_refused() {
        let db = db();
        let booth = db.create_booth("A", "a", 0, "d").unwrap();

        assert!(matches!(db.book_slot(booth, 3, "u1").unwrap(), BookingOutcome::Booked(_)));
        assert_eq!(db.book_slot(booth, 3, "u2").unwrap(), BookingOutcome::AlreadyBooked);
        assert!(matches!(db.book_slot(booth, 4, "u2").unwrap(), BookingOutcome::Booked(_)));
        assert_eq!(db.book_slot(booth + 1, 3, "u1").unwrap(), BookingOutcome::BoothNotFound);

        let slot = db.get_slot_bookings(booth, 3).unwrap();
        assert_eq!(slot.len(), 1);
        assert_eq!(slot[0].user_id, "u1");
        assert_eq!(db.get_booth_bookings(booth).unwrap().len(), 2);
        assert_eq!(db.get_user_bookings("u2").unwrap()[0].period, 4);
    }

    #[test]
    fn concurrent_bookings_leave_one_row() {
        let db = Arc::new(db());
        let booth = db.create_booth("A", "a", 0, "d").unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let db = db.clone();
                std::thread::spawn(move || db.book_slot(booth, 1, &format!("u{i}")).unwrap())
            })
            .collect();

        let booked = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| matches!(outcome, BookingOutcome::Booked(_)))
            .count();

        assert_eq!(booked, 1);
        assert_eq!(db.get_slot_bookings(booth, 1).unwrap().len(), 1);
    }

    #[test]
    fn cancel_removes_only_the_matching_booking() {
        let db = db();
        let booth = db.create_booth("A", "a", 0, "d").unwrap();
        db.book_slot(booth, 1, "u1").unwrap();
        db.book_slot(booth, 2, "u1").unwrap();
        db.book_slot(booth, 3, "u2").unwrap();

        // Wrong user holds no booking for this slot
        assert_eq!(db.cancel_booking(booth, 3, "u1").unwrap(), 0);
        assert_eq!(db.cancel_booking(booth, 1, "u1").unwrap(), 1);

        let left: Vec<i64> = db
            .get_booth_bookings(booth)
            .unwrap()
            .into_iter()
            .map(|b| b.period)
            .collect();
        assert_eq!(left, vec![2, 3]);
    }

    #[test]
    fn subject_replace_is_a_full_replace() {
        let db = db();
        db.create_user("u1", "alice", "hash").unwrap();
        let ids: Vec<i64> = ["math", "art", "music", "history"]
            .iter()
            .map(|name| db.create_subject(name).unwrap())
            .collect();

        assert_eq!(
            db.replace_user_subjects("u1", &ids[..3]).unwrap(),
            SubjectReplaceOutcome::Replaced(3)
        );
        assert_eq!(
            db.replace_user_subjects("u1", &ids[3..]).unwrap(),
            SubjectReplaceOutcome::Replaced(1)
        );

        let subjects = db.get_user_subjects("u1").unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].id, ids[3]);
        assert_eq!(subjects[0].name, "history");
    }

    #[test]
    fn subject_replace_with_unknown_subject_changes_nothing() {
        let db = db();
        db.create_user("u1", "alice", "hash").unwrap();
        let math = db.create_subject("math").unwrap();
        db.replace_user_subjects("u1", &[math]).unwrap();

        assert_eq!(
            db.replace_user_subjects("u1", &[999]).unwrap(),
            SubjectReplaceOutcome::UnknownSubject(999)
        );
        assert_eq!(db.get_user_subjects("u1").unwrap()[0].id, math);

        assert_eq!(
            db.replace_user_subjects("nobody", &[math]).unwrap(),
            SubjectReplaceOutcome::UserNotFound
        );
    }

    #[test]
    fn scores_sum_per_user() {
        let db = db();
        db.insert_score("u1", 1, 10, "t").unwrap();
        db.insert_score("u1", 2, 15, "t").unwrap();
        db.insert_score("u2", 1, 30, "t").unwrap();

        assert_eq!(db.get_total_score("u1").unwrap(), 25);
        assert_eq!(db.get_total_score("nobody").unwrap(), 0);
        assert_eq!(db.get_user_scores("u1").unwrap().len(), 2);
        assert_eq!(
            db.get_all_user_scores().unwrap(),
            vec![("u1".to_string(), 25), ("u2".to_string(), 30)]
        );
    }
}
