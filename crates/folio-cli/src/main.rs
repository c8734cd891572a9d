mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use folio_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    tracing::debug!("Config file: {}", config_path.display());
    let load_config = || Config::load_from(&config_path);

    match cli.command {
        cli::Commands::Serve {
            host,
            port,
            content_dir,
            content_url,
            db,
        } => {
            let overrides = commands::serve::Overrides {
                host,
                port,
                content_dir,
                content_url,
                db,
            };
            commands::serve::handle(load_config()?, overrides).await
        }
        cli::Commands::Content(cmd) => commands::content::handle(cmd, &load_config()?).await,
        cli::Commands::Search { query, tag, json } => {
            commands::search::handle(&load_config()?, &query, tag, json).await
        }
        cli::Commands::Auth(cmd) => commands::auth::handle(cmd, &load_config()?).await,
        cli::Commands::Init { force } => commands::init::handle(&config_path, force),
        cli::Commands::Completions { shell } => {
            commands::completions::handle(shell);
            Ok(())
        }
    }
}
