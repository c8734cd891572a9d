//! Core domain models and logic for folio
//!
//! This crate contains:
//! - Content records (BlogPost, Project, Publication)
//! - Social records (Comment, Vote, CommentLike, User)
//! - Front matter parsing
//! - Linear search and filtering over content

pub mod content;
pub mod error;
pub mod frontmatter;
pub mod search;
pub mod social;

pub use content::{About, BlogPost, ContentKind, Project, Publication, TagCount};
pub use error::{CoreError, Result};
pub use frontmatter::{FrontMatter, ParsedDocument, Value};
pub use search::{ProjectFilter, PublicationFilter, SearchHit, SearchQuery, Searchable};
pub use social::{Comment, CommentLike, LikeState, User, Vote, VoteKind, VoteSummary};
