//! Database operations

use std::path::PathBuf;

use folio_core::User;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{MagicLinkRecord, Result, StorageError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS magic_links (
    token_hash TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL,
    consumed_at INTEGER
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    post_slug TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    vote_type TEXT NOT NULL CHECK (vote_type IN ('up', 'down')),
    created_at INTEGER NOT NULL,
    PRIMARY KEY (post_slug, user_id)
);

CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    post_slug TEXT NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_slug, created_at);

CREATE TABLE IF NOT EXISTS comment_likes (
    comment_id TEXT NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (comment_id, user_id)
);
"#;

/// Main storage interface
///
/// Cheap to clone: the pool is reference counted.
#[derive(Clone, Debug)]
pub struct Storage {
    pub(crate) pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database and run migrations.
    ///
    /// `None` uses `folio.db` in the platform data directory.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;

        info!("Opened database at {}", path.display());
        Ok(storage)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "folio", "folio").ok_or_else(|| {
            StorageError::Other(anyhow::anyhow!("could not determine data directory"))
        })?;
        Ok(dirs.data_dir().join("folio.db"))
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Return the user with this email, creating it on first sign-in
    pub async fn upsert_user(&self, email: &str) -> Result<User> {
        let candidate = User::new(email.to_string());

        sqlx::query("INSERT INTO users (id, email, created_at) VALUES (?, ?, ?) ON CONFLICT(email) DO NOTHING")
            .bind(&candidate.id)
            .bind(&candidate.email)
            .bind(candidate.created_at.unix_timestamp())
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT id, email, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        user_from_row(&row)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        let row = sqlx::query("SELECT id, email, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;

        user_from_row(&row)
    }

    // ------------------------------------------------------------------
    // Magic links
    // ------------------------------------------------------------------

    pub async fn insert_magic_link(
        &self,
        token_hash: &str,
        email: &str,
        expires_at: OffsetDateTime,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO magic_links (token_hash, email, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token_hash)
        .bind(email)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .bind(expires_at.unix_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_magic_link(&self, token_hash: &str) -> Result<Option<MagicLinkRecord>> {
        let row = sqlx::query(
            "SELECT token_hash, email, expires_at, consumed_at FROM magic_links WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<MagicLinkRecord> {
            let consumed_at: Option<i64> = row.try_get("consumed_at")?;
            Ok(MagicLinkRecord {
                token_hash: row.try_get("token_hash")?,
                email: row.try_get("email")?,
                expires_at: timestamp(row.try_get("expires_at")?)?,
                consumed_at: consumed_at.map(timestamp).transpose()?,
            })
        })
        .transpose()
    }

    /// Mark a link consumed; `false` if it was already used
    pub async fn consume_magic_link(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE magic_links SET consumed_at = ? WHERE token_hash = ? AND consumed_at IS NULL",
        )
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    pub async fn insert_session(
        &self,
        token_hash: &str,
        user_id: &str,
        expires_at: OffsetDateTime,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .bind(expires_at.unix_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Resolve an unexpired session to its user and expiry
    pub async fn session_user(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
    ) -> Result<Option<(User, OffsetDateTime)>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.created_at, s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ? AND s.expires_at > ?
            "#,
        )
        .bind(token_hash)
        .bind(now.unix_timestamp())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> Result<(User, OffsetDateTime)> {
            Ok((user_from_row(&row)?, timestamp(row.try_get("expires_at")?)?))
        })
        .transpose()
    }

    pub async fn delete_session(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete expired magic links and sessions; returns (links, sessions) removed
    pub async fn purge_expired(&self, now: OffsetDateTime) -> Result<(u64, u64)> {
        let links = sqlx::query("DELETE FROM magic_links WHERE expires_at <= ?")
            .bind(now.unix_timestamp())
            .execute(&self.pool)
            .await?
            .rows_affected();

        let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.unix_timestamp())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok((links, sessions))
    }
}

pub(crate) fn timestamp(secs: i64) -> Result<OffsetDateTime> {
    Ok(OffsetDateTime::from_unix_timestamp(secs)?)
}

pub(crate) fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::Duration;

    pub(crate) async fn create_test_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("test.db"))).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let first = Storage::new(Some(path.clone())).await.unwrap();
        first.upsert_user("a@example.com").await.unwrap();
        drop(first);

        let second = Storage::new(Some(path)).await.unwrap();
        let user = second.upsert_user("a@example.com").await.unwrap();
        assert_eq!(user.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_upsert_user_is_stable() {
        let (_dir, storage) = create_test_storage().await;

        let first = storage.upsert_user("reader@example.com").await.unwrap();
        let again = storage.upsert_user("reader@example.com").await.unwrap();
        assert_eq!(first.id, again.id);

        let fetched = storage.get_user(&first.id).await.unwrap();
        assert_eq!(fetched.email, "reader@example.com");

        assert!(matches!(
            storage.get_user("missing").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_magic_link_consumed_once() {
        let (_dir, storage) = create_test_storage().await;
        let expires = OffsetDateTime::now_utc() + Duration::minutes(15);

        storage
            .insert_magic_link("hash-1", "a@example.com", expires)
            .await
            .unwrap();

        let link = storage.get_magic_link("hash-1").await.unwrap().unwrap();
        assert_eq!(link.email, "a@example.com");
        assert!(!link.is_consumed());

        assert!(storage.consume_magic_link("hash-1").await.unwrap());
        assert!(!storage.consume_magic_link("hash-1").await.unwrap());

        let link = storage.get_magic_link("hash-1").await.unwrap().unwrap();
        assert!(link.is_consumed());

        assert!(storage.get_magic_link("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_lookup_respects_expiry() {
        let (_dir, storage) = create_test_storage().await;
        let user = storage.upsert_user("a@example.com").await.unwrap();
        let now = OffsetDateTime::now_utc();

        storage
            .insert_session("live", &user.id, now + Duration::hours(1))
            .await
            .unwrap();
        storage
            .insert_session("stale", &user.id, now - Duration::hours(1))
            .await
            .unwrap();

        let (found, _) = storage.session_user("live", now).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(storage.session_user("stale", now).await.unwrap().is_none());

        let (links, sessions) = storage.purge_expired(now).await.unwrap();
        assert_eq!(links, 0);
        assert_eq!(sessions, 1);

        assert!(storage.delete_session("live").await.unwrap());
        assert!(storage.session_user("live", now).await.unwrap().is_none());
    }
}
