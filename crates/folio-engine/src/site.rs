//! The site: published content plus the reader interactions around it

use folio_auth::MagicLinkService;
use folio_content::Catalog;
use folio_core::{
    BlogPost, Comment, LikeState, Project, Publication, SearchHit, SearchQuery, User, VoteKind,
    VoteSummary,
};
use folio_storage::{CommentRecord, Storage};
use serde::Serialize;
use tracing::info;

use crate::{Result, SiteError};

pub const DEFAULT_MAX_COMMENT_LENGTH: usize = 2000;
const RECENT_LIMIT: usize = 3;

/// Landing page data
#[derive(Debug, Serialize)]
pub struct Home<'a> {
    pub featured_projects: Vec<&'a Project>,
    pub recent_posts: &'a [BlogPost],
    pub recent_publications: &'a [Publication],
}

pub struct Site {
    catalog: Catalog,
    storage: Storage,
    auth: MagicLinkService,
    max_comment_length: usize,
}

impl Site {
    pub fn new(catalog: Catalog, storage: Storage, auth: MagicLinkService) -> Self {
        Self {
            catalog,
            storage,
            auth,
            max_comment_length: DEFAULT_MAX_COMMENT_LENGTH,
        }
    }

    pub fn with_max_comment_length(mut self, max: usize) -> Self {
        self.max_comment_length = max;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn auth(&self) -> &MagicLinkService {
        &self.auth
    }

    pub fn home(&self) -> Home<'_> {
        Home {
            featured_projects: self.catalog.featured_projects(),
            recent_posts: self.catalog.recent_posts(RECENT_LIMIT),
            recent_publications: self.catalog.recent_publications(RECENT_LIMIT),
        }
    }

    pub fn search(&self, text: &str) -> Vec<SearchHit> {
        self.catalog.search(&SearchQuery::new(text))
    }

    fn require_post(&self, slug: &str) -> Result<&BlogPost> {
        self.catalog
            .post(slug)
            .ok_or_else(|| SiteError::not_found(format!("post '{slug}'")))
    }

    // ------------------------------------------------------------------
    // Votes
    // ------------------------------------------------------------------

    pub async fn votes(&self, slug: &str, viewer: Option<&User>) -> Result<VoteSummary> {
        self.require_post(slug)?;
        Ok(self
            .storage
            .vote_summary(slug, viewer.map(|u| u.id.as_str()))
            .await?)
    }

    /// Toggle the reader's vote and return the new tally
    pub async fn vote(&self, slug: &str, user: &User, kind: VoteKind) -> Result<VoteSummary> {
        self.require_post(slug)?;
        let state = self.storage.cast_vote(slug, &user.id, kind).await?;
        info!("Vote on '{}' by {} is now {:?}", slug, user.email, state);
        Ok(self.storage.vote_summary(slug, Some(&user.id)).await?)
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn comments(&self, slug: &str, viewer: Option<&User>) -> Result<Vec<Comment>> {
        self.require_post(slug)?;
        Ok(self
            .storage
            .list_comments(slug, viewer.map(|u| u.id.as_str()))
            .await?)
    }

    pub async fn add_comment(&self, slug: &str, user: &User, content: &str) -> Result<Comment> {
        self.require_post(slug)?;
        let content = self.validate_comment(content)?;

        let record = CommentRecord::new(slug.to_string(), user.id.clone(), content);
        self.storage.create_comment(&record).await?;
        info!("New comment {} on '{}'", record.id, slug);

        Ok(self.storage.comment_view(&record.id, Some(&user.id)).await?)
    }

    pub async fn edit_comment(&self, id: &str, user: &User, content: &str) -> Result<Comment> {
        self.require_author(id, user).await?;
        let content = self.validate_comment(content)?;

        self.storage.update_comment(id, &content).await?;
        Ok(self.storage.comment_view(id, Some(&user.id)).await?)
    }

    pub async fn delete_comment(&self, id: &str, user: &User) -> Result<()> {
        self.require_author(id, user).await?;
        self.storage.delete_comment(id).await?;
        info!("Comment {} deleted by {}", id, user.email);
        Ok(())
    }

    pub async fn like_comment(&self, id: &str, user: &User) -> Result<LikeState> {
        self.storage.get_comment(id).await?;
        Ok(self.storage.toggle_like(id, &user.id).await?)
    }

    async fn require_author(&self, id: &str, user: &User) -> Result<CommentRecord> {
        let comment = self.storage.get_comment(id).await?;
        if comment.user_id != user.id {
            return Err(SiteError::forbidden("only the author can change a comment"));
        }
        Ok(comment)
    }

    fn validate_comment(&self, content: &str) -> Result<String> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SiteError::validation("comment cannot be empty"));
        }
        let length = content.chars().count();
        if length > self.max_comment_length {
            return Err(SiteError::validation(format!(
                "comment is {} characters, the limit is {}",
                length, self.max_comment_length
            )));
        }
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_auth::MemoryMailer;
    use folio_content::document::parse_post;
    use folio_core::CoreError;
    use folio_storage::StorageError;
    use std::sync::Arc;

    async fn site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("site.db"))).await.unwrap();
        let auth = MagicLinkService::new(storage.clone(), Arc::new(MemoryMailer::new()), "http://localhost");

        let catalog = Catalog::new(
            vec![
                parse_post("hello.md", "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi there.").unwrap(),
                parse_post("rust.md", "---\ntitle: Rust tips\ndate: 2024-02-01\ntags: [rust]\n---\nBorrowing.").unwrap(),
            ],
            vec![],
            vec![],
            None,
        );

        (dir, Site::new(catalog, storage, auth).with_max_comment_length(20))
    }

    async fn user(site: &Site, email: &str) -> User {
        site.storage.upsert_user(email).await.unwrap()
    }

    #[tokio::test]
    async fn test_home_and_search() {
        let (_dir, site) = site().await;
        let home = site.home();
        assert_eq!(home.recent_posts[0].slug, "rust");
        assert!(home.featured_projects.is_empty());

        let hits = site.search("borrowing");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "rust");
    }

    #[tokio::test]
    async fn test_vote_toggle_and_summary() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;
        let bob = user(&site, "bob@example.com").await;

        site.vote("hello", &alice, VoteKind::Up).await.unwrap();
        let summary = site.vote("hello", &bob, VoteKind::Down).await.unwrap();
        assert_eq!((summary.upvotes, summary.downvotes, summary.score), (1, 1, 0));
        assert_eq!(summary.my_vote, Some(VoteKind::Down));

        let summary = site.vote("hello", &bob, VoteKind::Down).await.unwrap();
        assert_eq!(summary.my_vote, None);
        assert_eq!(summary.score, 1);

        let anonymous = site.votes("hello", None).await.unwrap();
        assert_eq!(anonymous.upvotes, 1);
        assert_eq!(anonymous.my_vote, None);
    }

    #[tokio::test]
    async fn test_vote_on_unknown_post() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;
        assert!(matches!(
            site.vote("missing", &alice, VoteKind::Up).await,
            Err(SiteError::Core(CoreError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_comment_validation() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;

        assert!(matches!(
            site.add_comment("hello", &alice, "   ").await,
            Err(SiteError::Core(CoreError::Validation(_)))
        ));
        assert!(matches!(
            site.add_comment("hello", &alice, &"x".repeat(21)).await,
            Err(SiteError::Core(CoreError::Validation(_)))
        ));

        let comment = site.add_comment("hello", &alice, "  Nice post  ").await.unwrap();
        assert_eq!(comment.content, "Nice post");
        assert_eq!(comment.author_email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_only_author_may_change_comment() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;
        let bob = user(&site, "bob@example.com").await;

        let comment = site.add_comment("hello", &alice, "First").await.unwrap();

        assert!(matches!(
            site.edit_comment(&comment.id, &bob, "Hijacked").await,
            Err(SiteError::Core(CoreError::Forbidden(_)))
        ));
        assert!(matches!(
            site.delete_comment(&comment.id, &bob).await,
            Err(SiteError::Core(CoreError::Forbidden(_)))
        ));

        let edited = site.edit_comment(&comment.id, &alice, "First!").await.unwrap();
        assert_eq!(edited.content, "First!");

        site.delete_comment(&comment.id, &alice).await.unwrap();
        assert!(site.comments("hello", None).await.unwrap().is_empty());
        assert!(matches!(
            site.delete_comment(&comment.id, &alice).await,
            Err(SiteError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_edit_checks_comment_before_content() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;
        let bob = user(&site, "bob@example.com").await;
        let comment = site.add_comment("hello", &alice, "Mine").await.unwrap();

        assert!(matches!(
            site.edit_comment("nope", &alice, "").await,
            Err(SiteError::Storage(StorageError::NotFound(_)))
        ));
        assert!(matches!(
            site.edit_comment(&comment.id, &bob, "   ").await,
            Err(SiteError::Core(CoreError::Forbidden(_)))
        ));
        assert!(matches!(
            site.edit_comment(&comment.id, &alice, "   ").await,
            Err(SiteError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_likes() {
        let (_dir, site) = site().await;
        let alice = user(&site, "alice@example.com").await;
        let bob = user(&site, "bob@example.com").await;
        let comment = site.add_comment("hello", &alice, "Like me").await.unwrap();

        let state = site.like_comment(&comment.id, &bob).await.unwrap();
        assert_eq!(state, LikeState { liked: true, likes: 1 });

        let listed = site.comments("hello", Some(&bob)).await.unwrap();
        assert!(listed[0].liked_by_me);
        assert_eq!(listed[0].likes, 1);

        let state = site.like_comment(&comment.id, &bob).await.unwrap();
        assert_eq!(state, LikeState { liked: false, likes: 0 });

        assert!(site.like_comment("nope", &bob).await.is_err());
    }
}
