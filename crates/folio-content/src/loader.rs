//! Content loading
//!
//! Fetches every known file per content kind and parses it. A file that fails
//! to fetch or parse is logged and skipped; the rest of the load continues.

use std::sync::Arc;

use folio_core::ContentKind;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::document::{parse_about, parse_post, parse_project, parse_publication};
use crate::handler::{ContentSource, content_path};
use crate::manifest::Manifest;
use crate::{ContentError, Result};

pub const ABOUT_FILE: &str = "about.md";

/// A file that was not loaded, and why
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of a full content load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub posts: usize,
    pub drafts: usize,
    pub projects: usize,
    pub publications: usize,
    pub about: bool,
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    fn skip(&mut self, path: String, err: &ContentError) {
        warn!("Skipping {}: {}", path, err);
        self.skipped.push(SkippedFile {
            path,
            reason: err.to_string(),
        });
    }
}

pub struct ContentLoader {
    source: Arc<dyn ContentSource>,
    manifest: Manifest,
}

impl ContentLoader {
    pub fn new(source: Arc<dyn ContentSource>, manifest: Manifest) -> Self {
        Self { source, manifest }
    }

    /// Load everything into a catalog
    pub async fn load(&self) -> Catalog {
        self.load_with_report().await.0
    }

    pub async fn load_with_report(&self) -> (Catalog, LoadReport) {
        let mut report = LoadReport::default();

        let mut posts = Vec::new();
        for (path, raw) in self.fetch_kind(ContentKind::Blog, &mut report).await {
            match parse_post(&path, &raw) {
                Ok(post) if post.published => posts.push(post),
                Ok(post) => {
                    debug!("Draft '{}' not published", post.slug);
                    report.drafts += 1;
                }
                Err(e) => report.skip(path, &e),
            }
        }

        let mut projects = Vec::new();
        for (path, raw) in self.fetch_kind(ContentKind::Project, &mut report).await {
            match parse_project(&path, &raw) {
                Ok(project) => projects.push(project),
                Err(e) => report.skip(path, &e),
            }
        }

        let mut publications = Vec::new();
        for (path, raw) in self.fetch_kind(ContentKind::Publication, &mut report).await {
            match parse_publication(&path, &raw) {
                Ok(publication) => publications.push(publication),
                Err(e) => report.skip(path, &e),
            }
        }

        let about = match self.source.fetch(ABOUT_FILE).await {
            Ok(raw) => Some(parse_about(&raw)),
            Err(e) => {
                debug!("No about page: {}", e);
                None
            }
        };

        let catalog = Catalog::new(posts, projects, publications, about);
        report.posts = catalog.posts().len();
        report.projects = catalog.projects().len();
        report.publications = catalog.publications().len();
        report.about = catalog.about().is_some();

        info!(
            "Loaded {} posts, {} projects, {} publications from {} ({} skipped)",
            report.posts,
            report.projects,
            report.publications,
            self.source.describe(),
            report.skipped.len()
        );

        (catalog, report)
    }

    /// Filenames for a kind: the manifest list, or discovery when none is listed
    pub async fn filenames(&self, kind: ContentKind) -> Result<Vec<String>> {
        let names = if self.manifest.is_listed(kind) {
            self.manifest.files(kind).to_vec()
        } else {
            self.source.discover(kind).await?
        };

        Ok(names
            .into_iter()
            .filter(|name| {
                let excluded = self.manifest.is_excluded(name);
                if excluded {
                    debug!(
                        "Excluded {} (pattern {:?})",
                        name,
                        self.manifest.matching_pattern(name)
                    );
                }
                !excluded
            })
            .collect())
    }

    async fn fetch_kind(&self, kind: ContentKind, report: &mut LoadReport) -> Vec<(String, String)> {
        let names = match self.filenames(kind).await {
            Ok(names) => names,
            Err(e) => {
                report.skip(kind.dir_name().to_string(), &e);
                return Vec::new();
            }
        };

        if names.is_empty() {
            debug!("No {} files to load", kind);
        }

        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let path = content_path(kind, &name);
            match self.source.fetch(&path).await {
                Ok(raw) => files.push((path, raw)),
                Err(e) => report.skip(path, &e),
            }
        }
        files
    }
}
