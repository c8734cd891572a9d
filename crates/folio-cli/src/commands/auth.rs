use std::sync::Arc;

use anyhow::Result;
use folio_auth::{LogMailer, MagicLinkService};
use folio_config::Config;
use folio_storage::Storage;

use crate::cli::AuthCommands;

pub async fn handle(cmd: AuthCommands, config: &Config) -> Result<()> {
    match cmd {
        AuthCommands::Purge => {
            let storage = Storage::new(config.database.path.clone()).await?;
            let auth = MagicLinkService::new(storage, Arc::new(LogMailer), config.auth.site_url.clone());
            let (links, sessions) = auth.purge_expired().await?;
            println!("✓ Removed {} expired links and {} expired sessions", links, sessions);
            Ok(())
        }
    }
}
