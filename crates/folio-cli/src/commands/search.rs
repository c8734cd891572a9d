use anyhow::Result;
use folio_config::Config;
use folio_core::SearchQuery;

pub async fn handle(config: &Config, query: &str, tag: Option<String>, json: bool) -> Result<()> {
    let catalog = folio_engine::content_loader(config)?.load().await;

    let mut search = SearchQuery::new(query);
    if let Some(tag) = tag {
        search = search.with_tag(tag);
    }
    let hits = catalog.search(&search);

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results for '{}'.", query);
        return Ok(());
    }

    for hit in &hits {
        println!("  [{}] {}  {} ({})", hit.kind, hit.date, hit.title, hit.slug);
        if !hit.summary.is_empty() {
            println!("      {}", hit.summary);
        }
    }
    println!("{} result(s)", hits.len());

    Ok(())
}
