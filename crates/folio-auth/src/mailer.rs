//! Delivery of sign-in links

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

/// Hands a sign-in link to the reader
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_link(&self, email: &str, link: &str) -> anyhow::Result<()>;
}

/// Writes links to the log instead of sending mail
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_link(&self, email: &str, link: &str) -> anyhow::Result<()> {
        info!("Sign-in link for {}: {}", email, link);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLink {
    pub email: String,
    pub link: String,
}

impl SentLink {
    /// Value of the `token` query parameter
    pub fn token(&self) -> Option<&str> {
        self.link.split_once("token=").map(|(_, token)| token)
    }
}

/// Keeps sent links in memory
#[derive(Debug, Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<SentLink>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentLink> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<SentLink> {
        self.outbox.lock().ok().and_then(|o| o.last().cloned())
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_link(&self, email: &str, link: &str) -> anyhow::Result<()> {
        self.outbox
            .lock()
            .map_err(|_| anyhow::anyhow!("outbox lock poisoned"))?
            .push(SentLink {
                email: email.to_string(),
                link: link.to_string(),
            });
        Ok(())
    }
}
