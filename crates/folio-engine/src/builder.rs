//! Wiring a [`Site`] together from configuration

use std::sync::Arc;

use anyhow::Context;
use folio_auth::{LogMailer, MagicLinkService, Mailer};
use folio_config::Config;
use folio_content::{ContentLoader, ContentSource, FsSource, HttpSource, LoadReport, Manifest};
use folio_storage::Storage;
use time::Duration;

use crate::Site;

/// The configured content source: `base_url` wins over `dir`
pub fn content_source(config: &Config) -> anyhow::Result<Arc<dyn ContentSource>> {
    let source: Arc<dyn ContentSource> = match &config.content.base_url {
        Some(url) => Arc::new(HttpSource::new(url.clone())?),
        None => Arc::new(FsSource::new(config.content.dir.clone())),
    };
    Ok(source)
}

pub fn manifest(config: &Config) -> Manifest {
    let listed = &config.content.manifest;
    Manifest::new(
        listed.blog.clone(),
        listed.projects.clone(),
        listed.publications.clone(),
    )
    .with_exclude(config.content.exclude.clone())
}

pub fn content_loader(config: &Config) -> anyhow::Result<ContentLoader> {
    Ok(ContentLoader::new(content_source(config)?, manifest(config)))
}

/// Load content, open the database and build the site
pub async fn open_site(config: &Config) -> anyhow::Result<(Site, LoadReport)> {
    open_site_with_mailer(config, Arc::new(LogMailer)).await
}

pub async fn open_site_with_mailer(
    config: &Config,
    mailer: Arc<dyn Mailer>,
) -> anyhow::Result<(Site, LoadReport)> {
    let (catalog, report) = content_loader(config)?.load_with_report().await;

    let storage = Storage::new(config.database.path.clone())
        .await
        .context("failed to open database")?;

    let auth = MagicLinkService::new(storage.clone(), mailer, config.auth.site_url.clone())
        .with_link_ttl(Duration::minutes(config.auth.link_ttl_minutes))
        .with_session_ttl(Duration::hours(config.auth.session_ttl_hours));

    let site = Site::new(catalog, storage, auth).with_max_comment_length(config.comments.max_length);
    Ok((site, report))
}
