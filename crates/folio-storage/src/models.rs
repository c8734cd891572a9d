use serde::Serialize;
use time::OffsetDateTime;

/// A stored magic link; only the token hash is persisted
#[derive(Debug, Clone, Serialize)]
pub struct MagicLinkRecord {
    pub token_hash: String,
    pub email: String,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp::option")]
    pub consumed_at: Option<OffsetDateTime>,
}

impl MagicLinkRecord {
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// A comment row without viewer-specific fields
#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord {
    pub id: String,
    pub post_slug: String,
    pub user_id: String,
    pub content: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl CommentRecord {
    pub fn new(post_slug: String, user_id: String, content: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            post_slug,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
