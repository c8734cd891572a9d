//! Content source trait

use async_trait::async_trait;
use folio_core::ContentKind;

use crate::Result;

/// Where markdown files come from
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch a file by its path relative to the content root (e.g. `blog/hello.md`)
    async fn fetch(&self, path: &str) -> Result<String>;

    /// List the markdown filenames available for a kind, sorted.
    ///
    /// Sources that cannot enumerate files return an empty list.
    async fn discover(&self, kind: ContentKind) -> Result<Vec<String>>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// Relative path of a content file
pub fn content_path(kind: ContentKind, filename: &str) -> String {
    format!("{}/{}", kind.dir_name(), filename)
}

/// Reject absolute paths and parent directory components
pub(crate) fn validate_relative(path: &str) -> Result<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.starts_with('\\')
        || path.split(['/', '\\']).any(|part| part == "..");

    if invalid {
        return Err(crate::ContentError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_path() {
        assert_eq!(content_path(ContentKind::Blog, "hello.md"), "blog/hello.md");
        assert_eq!(
            content_path(ContentKind::Publication, "paper.md"),
            "publications/paper.md"
        );
    }

    #[test]
    fn test_validate_relative() {
        assert!(validate_relative("blog/hello.md").is_ok());
        assert!(validate_relative("about.md").is_ok());
        assert!(validate_relative("../secrets.md").is_err());
        assert!(validate_relative("blog/../../etc/passwd").is_err());
        assert!(validate_relative("/etc/passwd").is_err());
        assert!(validate_relative("").is_err());
    }
}
