use std::path::PathBuf;

use anyhow::Result;
use folio_config::Config;
use folio_server::FolioServer;

/// Command line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub content_dir: Option<PathBuf>,
    pub content_url: Option<String>,
    pub db: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.content_dir {
            config.content.dir = dir;
            config.content.base_url = None;
        }
        if let Some(url) = self.content_url {
            config.content.base_url = Some(url);
        }
        if let Some(db) = self.db {
            config.database.path = Some(db);
        }
    }
}

pub async fn handle(mut config: Config, overrides: Overrides) -> Result<()> {
    overrides.apply(&mut config);

    let (site, report) = folio_engine::open_site(&config).await?;
    if !report.skipped.is_empty() {
        eprintln!(
            "⚠ {} content file(s) skipped, run 'folio content check' for details",
            report.skipped.len()
        );
    }

    site.auth().purge_expired().await?;

    println!(
        "Serving {} posts, {} projects, {} publications",
        report.posts, report.projects, report.publications
    );
    FolioServer::serve(site, &config.bind_addr()).await
}
