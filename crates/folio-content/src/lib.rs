//! Markdown content sources and the in-memory catalog built from them

pub mod catalog;
pub mod document;
pub mod error;
pub mod file;
pub mod handler;
pub mod loader;
pub mod manifest;
pub mod markdown;
pub mod url;

pub use catalog::Catalog;
pub use error::{ContentError, Result};
pub use file::FsSource;
pub use handler::{ContentSource, content_path};
pub use loader::{ContentLoader, LoadReport, SkippedFile};
pub use manifest::Manifest;
pub use url::HttpSource;
