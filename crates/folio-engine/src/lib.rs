//! Site facade over content, storage and auth

pub mod builder;
pub mod error;
pub mod site;

pub use builder::{content_loader, open_site, open_site_with_mailer};
pub use error::{Result, SiteError};
pub use site::{Home, Site};
