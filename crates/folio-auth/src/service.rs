//! Passwordless sign-in
//!
//! A link carries a single-use random token. Redeeming it creates a session
//! whose token is returned to the caller once; both tokens are stored hashed.

use std::sync::Arc;

use folio_core::User;
use folio_storage::Storage;
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::email::normalize_email;
use crate::mailer::Mailer;
use crate::token::{generate_token, hash_token};
use crate::{AuthError, Result};

pub const DEFAULT_LINK_TTL: Duration = Duration::minutes(15);
pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(720);

/// A signed-in session as returned by [`MagicLinkService::redeem`]
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

pub struct MagicLinkService {
    storage: Storage,
    mailer: Arc<dyn Mailer>,
    site_url: String,
    link_ttl: Duration,
    session_ttl: Duration,
}

impl MagicLinkService {
    pub fn new(storage: Storage, mailer: Arc<dyn Mailer>, site_url: impl Into<String>) -> Self {
        Self {
            storage,
            mailer,
            site_url: site_url.into().trim_end_matches('/').to_string(),
            link_ttl: DEFAULT_LINK_TTL,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_link_ttl(mut self, ttl: Duration) -> Self {
        self.link_ttl = ttl;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn callback_url(&self, token: &str) -> String {
        format!("{}/auth/callback?token={}", self.site_url, token)
    }

    /// Issue a sign-in link and hand it to the mailer
    pub async fn request_link(&self, email: &str) -> Result<()> {
        let email = normalize_email(email)?;
        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + self.link_ttl;

        self.storage
            .insert_magic_link(&hash_token(&token), &email, expires_at)
            .await?;

        self.mailer
            .send_link(&email, &self.callback_url(&token))
            .await
            .map_err(|e| AuthError::Mailer(e.to_string()))?;

        info!("Sign-in link issued for {}", email);
        Ok(())
    }

    /// Exchange a link token for a session
    pub async fn redeem(&self, token: &str) -> Result<Session> {
        let hash = hash_token(token.trim());
        let now = OffsetDateTime::now_utc();

        let link = self
            .storage
            .get_magic_link(&hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if link.is_consumed() {
            warn!("Attempt to reuse a sign-in link for {}", link.email);
            return Err(AuthError::InvalidToken);
        }
        if link.is_expired(now) {
            return Err(AuthError::TokenExpired);
        }
        // Lost a race with a concurrent redeem
        if !self.storage.consume_magic_link(&hash).await? {
            return Err(AuthError::InvalidToken);
        }

        let user = self.storage.upsert_user(&link.email).await?;
        let session_token = generate_token();
        let expires_at = now + self.session_ttl;
        self.storage
            .insert_session(&hash_token(&session_token), &user.id, expires_at)
            .await?;

        info!("{} signed in", user.email);
        Ok(Session {
            token: session_token,
            user,
            expires_at,
        })
    }

    /// Resolve a session token to its user
    pub async fn authenticate(&self, session_token: &str) -> Result<User> {
        let token = session_token.trim();
        if token.is_empty() {
            return Err(AuthError::NotAuthenticated);
        }

        self.storage
            .session_user(&hash_token(token), OffsetDateTime::now_utc())
            .await?
            .map(|(user, _)| user)
            .ok_or(AuthError::NotAuthenticated)
    }

    /// End a session; `false` if it did not exist
    pub async fn sign_out(&self, session_token: &str) -> Result<bool> {
        let removed = self
            .storage
            .delete_session(&hash_token(session_token.trim()))
            .await?;
        debug!("Sign out (session existed: {})", removed);
        Ok(removed)
    }

    /// Drop expired links and sessions; returns (links, sessions) removed
    pub async fn purge_expired(&self) -> Result<(u64, u64)> {
        let (links, sessions) = self.storage.purge_expired(OffsetDateTime::now_utc()).await?;
        if links + sessions > 0 {
            info!("Purged {} expired links and {} sessions", links, sessions);
        }
        Ok((links, sessions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MemoryMailer;

    async fn setup(link_ttl: Duration) -> (tempfile::TempDir, Arc<MemoryMailer>, MagicLinkService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(Some(dir.path().join("auth.db"))).await.unwrap();
        let mailer = Arc::new(MemoryMailer::new());
        let service = MagicLinkService::new(storage, mailer.clone(), "http://localhost:8080/")
            .with_link_ttl(link_ttl);
        (dir, mailer, service)
    }

    #[tokio::test]
    async fn test_full_sign_in_flow() {
        let (_dir, mailer, service) = setup(DEFAULT_LINK_TTL).await;

        service.request_link(" Reader@Example.com ").await.unwrap();

        let sent = mailer.last().unwrap();
        assert_eq!(sent.email, "reader@example.com");
        assert!(sent.link.starts_with("http://localhost:8080/auth/callback?token="));

        let session = service.redeem(sent.token().unwrap()).await.unwrap();
        assert_eq!(session.user.email, "reader@example.com");
        assert!(session.expires_at > OffsetDateTime::now_utc());

        let user = service.authenticate(&session.token).await.unwrap();
        assert_eq!(user.id, session.user.id);

        assert!(service.sign_out(&session.token).await.unwrap());
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_link_is_single_use() {
        let (_dir, mailer, service) = setup(DEFAULT_LINK_TTL).await;
        service.request_link("a@example.com").await.unwrap();
        let token = mailer.last().unwrap().token().unwrap().to_string();

        service.redeem(&token).await.unwrap();
        assert!(matches!(service.redeem(&token).await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_link() {
        let (_dir, mailer, service) = setup(Duration::ZERO).await;
        service.request_link("a@example.com").await.unwrap();
        let token = mailer.last().unwrap().token().unwrap().to_string();

        assert!(matches!(service.redeem(&token).await, Err(AuthError::TokenExpired)));

        let (links, _) = service.purge_expired().await.unwrap();
        assert_eq!(links, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_invalid_input() {
        let (_dir, mailer, service) = setup(DEFAULT_LINK_TTL).await;

        assert!(matches!(service.redeem("nope").await, Err(AuthError::InvalidToken)));
        assert!(matches!(service.authenticate("").await, Err(AuthError::NotAuthenticated)));
        assert!(matches!(
            service.request_link("not-an-email").await,
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_same_email_same_user() {
        let (_dir, mailer, service) = setup(DEFAULT_LINK_TTL).await;

        service.request_link("a@example.com").await.unwrap();
        let first = service.redeem(mailer.last().unwrap().token().unwrap()).await.unwrap();
        service.request_link("A@EXAMPLE.COM").await.unwrap();
        let second = service.redeem(mailer.last().unwrap().token().unwrap()).await.unwrap();

        assert_eq!(first.user.id, second.user.id);
        assert_ne!(first.token, second.token);
    }
}
