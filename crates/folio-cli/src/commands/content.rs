use anyhow::Result;
use folio_config::Config;
use folio_core::ContentKind;

use crate::cli::ContentCommands;

pub async fn handle(cmd: ContentCommands, config: &Config) -> Result<()> {
    match cmd {
        ContentCommands::List { kind } => {
            let kind = kind.map(|k| k.parse::<ContentKind>()).transpose()?;
            list(config, kind).await
        }
        ContentCommands::Check => check(config).await,
    }
}

async fn list(config: &Config, kind: Option<ContentKind>) -> Result<()> {
    let catalog = folio_engine::content_loader(config)?.load().await;
    let wanted = |k: ContentKind| kind.is_none_or(|kind| kind == k);

    if catalog.is_empty() {
        println!("No content found.");
        return Ok(());
    }

    if wanted(ContentKind::Blog) {
        println!("Blog ({}):", catalog.posts().len());
        for post in catalog.posts() {
            println!("  {}  {} ({})", post.date, post.title, post.slug);
        }
    }

    if wanted(ContentKind::Project) {
        println!("Projects ({}):", catalog.projects().len());
        for project in catalog.projects() {
            let featured = if project.featured { " ★" } else { "" };
            println!("  {}  {} [{}]{}", project.date, project.title, project.status, featured);
        }
    }

    if wanted(ContentKind::Publication) {
        println!("Publications ({}):", catalog.publications().len());
        for publication in catalog.publications() {
            println!("  {}  {} ({})", publication.year, publication.title, publication.venue);
        }
    }

    Ok(())
}

async fn check(config: &Config) -> Result<()> {
    let (_, report) = folio_engine::content_loader(config)?.load_with_report().await;

    println!(
        "Loaded {} posts ({} drafts), {} projects, {} publications",
        report.posts, report.drafts, report.projects, report.publications
    );
    if !report.about {
        println!("  No about.md found");
    }

    if report.skipped.is_empty() {
        println!("✓ All content files loaded");
        return Ok(());
    }

    for skipped in &report.skipped {
        println!("  ✗ {}: {}", skipped.path, skipped.reason);
    }
    anyhow::bail!("{} content file(s) failed to load", report.skipped.len())
}
