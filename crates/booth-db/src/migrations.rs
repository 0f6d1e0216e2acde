use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Idempotent schema bootstrap. Safe to run on every open.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL,
            password    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS subjects (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_subjects (
            user_id     TEXT NOT NULL REFERENCES users(id),
            subject_id  INTEGER NOT NULL REFERENCES subjects(id),
            PRIMARY KEY (user_id, subject_id)
        );

        CREATE TABLE IF NOT EXISTS booths (
            id          INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            content     TEXT NOT NULL,
            congestion  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS booth_passwords (
            booth_id        INTEGER PRIMARY KEY REFERENCES booths(id),
            password_digest TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_booth_passwords_digest
            ON booth_passwords(password_digest);

        CREATE TABLE IF NOT EXISTS booth_images (
            id          INTEGER PRIMARY KEY,
            booth_id    INTEGER NOT NULL REFERENCES booths(id),
            image       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_booth_images_booth
            ON booth_images(booth_id);

        CREATE TABLE IF NOT EXISTS booth_videos (
            id          INTEGER PRIMARY KEY,
            booth_id    INTEGER NOT NULL REFERENCES booths(id),
            url         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_booth_videos_booth
            ON booth_videos(booth_id);

        CREATE TABLE IF NOT EXISTS booth_books (
            id          INTEGER PRIMARY KEY,
            booth_id    INTEGER NOT NULL REFERENCES booths(id),
            user_id     TEXT NOT NULL,
            period      INTEGER NOT NULL
        );

        -- One booking per slot; backs up the check in book_slot
        CREATE UNIQUE INDEX IF NOT EXISTS idx_booth_books_slot
            ON booth_books(booth_id, period);

        CREATE INDEX IF NOT EXISTS idx_booth_books_user
            ON booth_books(user_id);

        CREATE TABLE IF NOT EXISTS scores (
            id          INTEGER PRIMARY KEY,
            user_id     TEXT NOT NULL,
            booth_id    INTEGER NOT NULL,
            score       INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_scores_user
            ON scores(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rerun_is_harmless() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute("INSERT INTO subjects (name) VALUES ('math')", []).unwrap();

        run(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM subjects", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
