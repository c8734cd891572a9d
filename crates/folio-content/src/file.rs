use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_core::ContentKind;

use crate::handler::{ContentSource, validate_relative};
use crate::{ContentError, Result};

/// Markdown files under a local content directory
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        validate_relative(path)?;
        let full = self.root.join(path);

        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| ContentError::Fetch {
                path: full.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn discover(&self, kind: ContentKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.dir_name());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        // The root may contain glob metacharacters
        let pattern = format!("{}/*.md", glob::Pattern::escape(&dir.to_string_lossy()));

        let mut files = Vec::new();
        for entry in glob::glob(&pattern).map_err(|e| ContentError::Other(e.into()))? {
            let path = entry.map_err(|e| ContentError::Other(e.into()))?;
            if path.is_file()
                && let Some(name) = path.file_name().and_then(|n| n.to_str())
            {
                files.push(name.to_string());
            }
        }

        // Sort for determinism
        files.sort();
        Ok(files)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
