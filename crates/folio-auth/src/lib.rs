//! Magic-link authentication for folio readers

pub mod email;
pub mod error;
pub mod mailer;
pub mod service;
pub mod token;

pub use email::normalize_email;
pub use error::{AuthError, Result};
pub use mailer::{LogMailer, Mailer, MemoryMailer, SentLink};
pub use service::{MagicLinkService, Session};
