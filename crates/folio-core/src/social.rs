//! Votes, comments and users

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::CoreError;

/// A signed-in reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn new(email: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" | "upvote" => Ok(Self::Up),
            "down" | "downvote" => Ok(Self::Down),
            other => Err(CoreError::Validation(format!("unknown vote type: {other}"))),
        }
    }
}

/// One reader's vote on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub post_slug: String,
    pub user_id: String,
    pub kind: VoteKind,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// Aggregated votes on a post, plus the viewer's own vote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
    pub my_vote: Option<VoteKind>,
}

impl VoteSummary {
    pub fn new(upvotes: i64, downvotes: i64, my_vote: Option<VoteKind>) -> Self {
        Self {
            upvotes,
            downvotes,
            score: upvotes - downvotes,
            my_vote,
        }
    }
}

/// A comment on a blog post, as seen by a particular viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_slug: String,
    pub user_id: String,
    pub author_email: String,
    pub content: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
    pub likes: i64,
    pub liked_by_me: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLike {
    pub comment_id: String,
    pub user_id: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_kind_roundtrip() {
        assert_eq!("up".parse::<VoteKind>().unwrap(), VoteKind::Up);
        assert_eq!("downvote".parse::<VoteKind>().unwrap(), VoteKind::Down);
        assert!("sideways".parse::<VoteKind>().is_err());
        assert_eq!(VoteKind::Up.opposite(), VoteKind::Down);
        assert_eq!(serde_json::to_string(&VoteKind::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn test_summary_score() {
        let summary = VoteSummary::new(5, 2, Some(VoteKind::Up));
        assert_eq!(summary.score, 3);

        let negative = VoteSummary::new(0, 4, None);
        assert_eq!(negative.score, -4);
    }
}
