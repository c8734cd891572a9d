use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Personal portfolio and blog server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the JSON API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Directory holding blog/, projects/ and publications/
        #[arg(long, conflicts_with = "content_url")]
        content_dir: Option<PathBuf>,

        /// Fetch markdown from this base URL instead
        #[arg(long)]
        content_url: Option<String>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Inspect content
    #[command(subcommand)]
    Content(ContentCommands),

    /// Search all content
    Search {
        query: String,

        /// Only items with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Maintain sign-in state
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Write a default config and content skeleton
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ContentCommands {
    /// List loaded content
    List {
        /// blog, projects or publications
        #[arg(long)]
        kind: Option<String>,
    },

    /// Load everything and report files that fail to parse
    Check,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Delete expired sign-in links and sessions
    Purge,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["folio", "serve", "--port", "3000", "--content-dir", "site"]);
        match cli.command {
            Commands::Serve { port, content_dir, content_url, .. } => {
                assert_eq!(port, Some(3000));
                assert_eq!(content_dir, Some(PathBuf::from("site")));
                assert!(content_url.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_content_sources_conflict() {
        let result = Cli::try_parse_from([
            "folio",
            "serve",
            "--content-dir",
            "a",
            "--content-url",
            "https://example.com",
        ]);
        assert!(result.is_err());
    }
}
