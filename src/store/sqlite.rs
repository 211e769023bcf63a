use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::sync::MutexGuard;

use crate::core::{FavoriteEntry, FavoriteInput, HistoryEntry, HistoryInput, ToggleOutcome, User};
use crate::db::{self, format_timestamp, parse_timestamp, SharedConnection};
use crate::error::{RecipeSenseError, Result};
use crate::store::{AccountStore, Credentials, LibraryStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    recipe_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    image TEXT NOT NULL,
    ready_in_minutes INTEGER,
    created_at TEXT NOT NULL,
    UNIQUE (user_id, recipe_id)
);

CREATE TABLE IF NOT EXISTS recently_viewed (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    recipe_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    image TEXT NOT NULL,
    viewed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recently_viewed_user ON recently_viewed(user_id, viewed_at);
";

/// SQLite-backed accounts, sessions, favorites and history
pub struct SqliteStore {
    conn: SharedConnection,
}

impl SqliteStore {
    pub async fn new(db_path: &str) -> Result<Self> {
        Self::from_connection(db::open(db_path)?)
    }

    pub fn from_connection(conn: SharedConnection) -> Result<Self> {
        db::lock(&conn)?.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        db::lock(&self.conn)
    }
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    Ok(parse_timestamp(&raw).unwrap_or_else(Utc::now))
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

#[async_trait]
impl LibraryStore for SqliteStore {
    async fn toggle_favorite(&self, user_id: i64, favorite: &FavoriteInput) -> Result<ToggleOutcome> {
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, favorite.recipe_id],
        )?;

        if removed > 0 {
            return Ok(ToggleOutcome::Removed);
        }

        conn.execute(
            "INSERT INTO favorites (user_id, recipe_id, title, image, ready_in_minutes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                favorite.recipe_id,
                favorite.title,
                favorite.image,
                favorite.ready_in_minutes,
                format_timestamp(Utc::now()),
            ],
        )?;

        Ok(ToggleOutcome::Added)
    }

    async fn favorites(&self, user_id: i64) -> Result<Vec<FavoriteEntry>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, recipe_id, title, image, ready_in_minutes, created_at
             FROM favorites
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )?;

        let entries = stmt
            .query_map(params![user_id], |row| {
                Ok(FavoriteEntry {
                    user_id: row.get(0)?,
                    recipe_id: row.get(1)?,
                    title: row.get(2)?,
                    image: row.get(3)?,
                    ready_in_minutes: row.get(4)?,
                    created_at: timestamp_column(row, 5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    async fn record_view(&self, user_id: i64, entry: &HistoryInput) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM recently_viewed WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, entry.recipe_id],
        )?;

        tx.execute(
            "INSERT INTO recently_viewed (user_id, recipe_id, title, image, viewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                entry.recipe_id,
                entry.title,
                entry.image,
                format_timestamp(Utc::now()),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    async fn recently_viewed(&self, user_id: i64, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT user_id, recipe_id, title, image, viewed_at
             FROM recently_viewed
             WHERE user_id = ?1
             ORDER BY viewed_at DESC, id DESC
             LIMIT ?2",
        )?;

        let entries = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(HistoryEntry {
                    user_id: row.get(0)?,
                    recipe_id: row.get(1)?,
                    title: row.get(2)?,
                    image: row.get(3)?,
                    viewed_at: timestamp_column(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;
        let created_at = Utc::now();

        let inserted = conn.execute(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![name, email, password_hash, format_timestamp(created_at)],
        );

        match inserted {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                email: email.to_string(),
                created_at,
            }),
            Err(e) if is_constraint_violation(&e) => {
                Err(RecipeSenseError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
        let conn = self.conn()?;

        let credentials = conn
            .query_row(
                "SELECT id, name, email, created_at, password_hash FROM users WHERE email = ?",
                params![email],
                |row| {
                    Ok(Credentials {
                        user: user_from_row(row)?,
                        password_hash: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(credentials)
    }

    async fn create_session(&self, user_id: i64, token: &str) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![token, user_id, format_timestamp(Utc::now())],
        )?;

        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT u.id, u.name, u.email, u.created_at
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token = ?",
                params![token],
                user_from_row,
            )
            .optional()?;

        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM sessions WHERE token = ?", params![token])?;
        Ok(deleted > 0)
    }
}
