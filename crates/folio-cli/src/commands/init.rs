use std::path::Path;

use anyhow::Result;
use folio_config::Config;

const WELCOME_POST: &str = r#"---
title: Hello, world
date: 2024-01-01
tags: [meta]
---

This is the first post. Edit or delete it, then add your own markdown files
under `blog/`, `projects/` and `publications/`.
"#;

const ABOUT_PAGE: &str = r#"---
title: About
---

A few words about you.
"#;

pub fn handle(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = Config::default();
    config.save(config_path)?;
    println!("✓ Wrote {}", config_path.display());

    let created = scaffold(&config.content.dir)?;
    if created > 0 {
        println!("✓ Created content skeleton in {}", config.content.dir.display());
    }
    println!("  Run 'folio serve' to start the server");

    Ok(())
}

/// Create the content directories and sample files; existing files are kept
pub fn scaffold(root: &Path) -> Result<usize> {
    let mut created = 0;

    for dir in ["blog", "projects", "publications"] {
        std::fs::create_dir_all(root.join(dir))?;
    }

    for (rel, content) in [("blog/hello-world.md", WELCOME_POST), ("about.md", ABOUT_PAGE)] {
        let path = root.join(rel);
        if !path.exists() {
            std::fs::write(&path, content)?;
            created += 1;
        }
    }

    Ok(created)
}
