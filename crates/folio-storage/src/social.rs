//! Votes, comments and comment likes

use folio_core::{Comment, LikeState, VoteKind, VoteSummary};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

use crate::db::timestamp;
use crate::{CommentRecord, Result, Storage, StorageError};

impl Storage {
    // ------------------------------------------------------------------
    // Votes
    // ------------------------------------------------------------------

    pub async fn get_vote(&self, post_slug: &str, user_id: &str) -> Result<Option<VoteKind>> {
        let vote: Option<String> =
            sqlx::query_scalar("SELECT vote_type FROM votes WHERE post_slug = ? AND user_id = ?")
                .bind(post_slug)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        vote.map(|v| parse_vote(&v)).transpose()
    }

    /// Put the user's vote into exactly the given state
    pub async fn set_vote(
        &self,
        post_slug: &str,
        user_id: &str,
        vote: Option<VoteKind>,
    ) -> Result<Option<VoteKind>> {
        match vote {
            Some(kind) => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (post_slug, user_id, vote_type, created_at)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT(post_slug, user_id) DO UPDATE SET vote_type = excluded.vote_type
                    "#,
                )
                .bind(post_slug)
                .bind(user_id)
                .bind(kind.as_str())
                .bind(OffsetDateTime::now_utc().unix_timestamp())
                .execute(&self.pool)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM votes WHERE post_slug = ? AND user_id = ?")
                    .bind(post_slug)
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;
            }
        }

        Ok(vote)
    }

    /// Toggle semantics: same kind removes the vote, otherwise it is set (or switched)
    pub async fn cast_vote(
        &self,
        post_slug: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<Option<VoteKind>> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock from the start
        let removed = sqlx::query(
            "DELETE FROM votes WHERE post_slug = ? AND user_id = ? AND vote_type = ?",
        )
        .bind(post_slug)
        .bind(user_id)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let next = if removed > 0 {
            None
        } else {
            sqlx::query(
                r#"
                INSERT INTO votes (post_slug, user_id, vote_type, created_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(post_slug, user_id) DO UPDATE SET vote_type = excluded.vote_type
                "#,
            )
            .bind(post_slug)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(OffsetDateTime::now_utc().unix_timestamp())
            .execute(&mut *tx)
            .await?;
            Some(kind)
        };

        tx.commit().await?;
        Ok(next)
    }

    pub async fn vote_summary(&self, post_slug: &str, viewer: Option<&str>) -> Result<VoteSummary> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN vote_type = 'up' THEN 1 ELSE 0 END), 0) AS upvotes,
                COALESCE(SUM(CASE WHEN vote_type = 'down' THEN 1 ELSE 0 END), 0) AS downvotes
            FROM votes
            WHERE post_slug = ?
            "#,
        )
        .bind(post_slug)
        .fetch_one(&self.pool)
        .await?;

        let my_vote = match viewer {
            Some(user_id) => self.get_vote(post_slug, user_id).await?,
            None => None,
        };

        Ok(VoteSummary::new(
            row.try_get("upvotes")?,
            row.try_get("downvotes")?,
            my_vote,
        ))
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn create_comment(&self, comment: &CommentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_slug, user_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_slug)
        .bind(&comment.user_id)
        .bind(&comment.content)
        .bind(comment.created_at.unix_timestamp())
        .bind(comment.updated_at.unix_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_comment(&self, id: &str) -> Result<CommentRecord> {
        let row = sqlx::query(
            "SELECT id, post_slug, user_id, content, created_at, updated_at FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("comment {id}")))?;

        Ok(CommentRecord {
            id: row.try_get("id")?,
            post_slug: row.try_get("post_slug")?,
            user_id: row.try_get("user_id")?,
            content: row.try_get("content")?,
            created_at: timestamp(row.try_get("created_at")?)?,
            updated_at: timestamp(row.try_get("updated_at")?)?,
        })
    }

    /// Comments on a post, oldest first, with like counts for `viewer`
    pub async fn list_comments(&self, post_slug: &str, viewer: Option<&str>) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id, c.post_slug, c.user_id, c.content, c.created_at, c.updated_at,
                u.email AS author_email,
                (SELECT COUNT(*) FROM comment_likes l WHERE l.comment_id = c.id) AS likes,
                EXISTS(
                    SELECT 1 FROM comment_likes l WHERE l.comment_id = c.id AND l.user_id = ?
                ) AS liked_by_me
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_slug = ?
            ORDER BY c.created_at ASC, c.rowid ASC
            "#,
        )
        .bind(viewer.unwrap_or(""))
        .bind(post_slug)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(comment_from_row).collect()
    }

    /// A single comment as seen by `viewer`
    pub async fn comment_view(&self, id: &str, viewer: Option<&str>) -> Result<Comment> {
        let row = sqlx::query(
            r#"
            SELECT
                c.id, c.post_slug, c.user_id, c.content, c.created_at, c.updated_at,
                u.email AS author_email,
                (SELECT COUNT(*) FROM comment_likes l WHERE l.comment_id = c.id) AS likes,
                EXISTS(
                    SELECT 1 FROM comment_likes l WHERE l.comment_id = c.id AND l.user_id = ?
                ) AS liked_by_me
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = ?
            "#,
        )
        .bind(viewer.unwrap_or(""))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("comment {id}")))?;

        comment_from_row(&row)
    }

    pub async fn update_comment(&self, id: &str, content: &str) -> Result<()> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(OffsetDateTime::now_utc().unix_timestamp())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("comment {id}")));
        }
        Ok(())
    }

    /// Delete a comment together with its likes
    pub async fn delete_comment(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comment_likes WHERE comment_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("comment {id}")));
        }

        tx.commit().await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Comment likes
    // ------------------------------------------------------------------

    pub async fn toggle_like(&self, comment_id: &str, user_id: &str) -> Result<LikeState> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let liked = if removed == 0 {
            sqlx::query("INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(comment_id)
                .bind(user_id)
                .bind(OffsetDateTime::now_utc().unix_timestamp())
                .execute(&mut *tx)
                .await?;
            true
        } else {
            false
        };

        let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?")
            .bind(comment_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(LikeState { liked, likes })
    }
}

fn parse_vote(value: &str) -> Result<VoteKind> {
    value
        .parse()
        .map_err(|e: folio_core::CoreError| StorageError::Other(e.into()))
}

fn comment_from_row(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_slug: row.try_get("post_slug")?,
        user_id: row.try_get("user_id")?,
        author_email: row.try_get("author_email")?,
        content: row.try_get("content")?,
        created_at: timestamp(row.try_get("created_at")?)?,
        updated_at: timestamp(row.try_get("updated_at")?)?,
        likes: row.try_get("likes")?,
        liked_by_me: row.try_get("liked_by_me")?,
    })
}
