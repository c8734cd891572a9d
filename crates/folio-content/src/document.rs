//! Turning parsed markdown documents into content records

use std::path::Path;

use folio_core::frontmatter::{self, FrontMatter, parse_date};
use folio_core::{About, BlogPost, Project, Publication};
use time::{Date, Month};

use crate::markdown::{excerpt, reading_time, render_html};
use crate::{ContentError, Result};

const DEFAULT_PROJECT_STATUS: &str = "completed";
const DEFAULT_PUBLICATION_KIND: &str = "article";

/// Slug from the front matter, or the filename without its extension
fn slug_for(file: &str, fm: &FrontMatter) -> String {
    fm.str("slug").unwrap_or_else(|| {
        Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string()
    })
}

fn required(file: &str, fm: &FrontMatter, field: &str) -> Result<String> {
    fm.str(field).ok_or_else(|| ContentError::MissingField {
        file: file.to_string(),
        field: field.to_string(),
    })
}

fn date_field(file: &str, fm: &FrontMatter, field: &str) -> Result<Option<Date>> {
    fm.date(field)
        .transpose()
        .map_err(|e| ContentError::Invalid {
            file: file.to_string(),
            reason: e.to_string(),
        })
}

fn first_of_year(file: &str, year: i32) -> Result<Date> {
    Date::from_calendar_date(year, Month::January, 1).map_err(|e| ContentError::Invalid {
        file: file.to_string(),
        reason: format!("invalid year {year}: {e}"),
    })
}

fn year_field(fm: &FrontMatter) -> Option<i32> {
    fm.number("year").map(|y| y as i32)
}

pub fn parse_post(file: &str, raw: &str) -> Result<BlogPost> {
    let doc = frontmatter::parse(raw);
    let fm = &doc.front_matter;

    let title = required(file, fm, "title")?;
    let date = date_field(file, fm, "date")?.ok_or_else(|| ContentError::MissingField {
        file: file.to_string(),
        field: "date".to_string(),
    })?;

    let reading_time_minutes = fm
        .number("readTime")
        .or_else(|| fm.number("reading_time"))
        .map(|n| n.max(1.0) as usize)
        .unwrap_or_else(|| reading_time(&doc.body));

    Ok(BlogPost {
        slug: slug_for(file, fm),
        title,
        date,
        excerpt: fm
            .str_any(&["excerpt", "description", "summary"])
            .unwrap_or_else(|| excerpt(&doc.body)),
        tags: fm.string_list("tags"),
        author: fm.str("author"),
        cover_image: fm.str_any(&["coverImage", "cover_image", "image"]),
        published: fm.bool("published").unwrap_or(true) && !fm.bool("draft").unwrap_or(false),
        reading_time_minutes,
        content_html: render_html(&doc.body),
        content: doc.body,
    })
}

pub fn parse_project(file: &str, raw: &str) -> Result<Project> {
    let doc = frontmatter::parse(raw);
    let fm = &doc.front_matter;

    let title = required(file, fm, "title")?;
    let date = match date_field(file, fm, "date")? {
        Some(date) => date,
        None => match year_field(fm) {
            Some(year) => first_of_year(file, year)?,
            None => {
                return Err(ContentError::MissingField {
                    file: file.to_string(),
                    field: "date".to_string(),
                });
            }
        },
    };

    let mut technologies = fm.string_list("technologies");
    if technologies.is_empty() {
        technologies = fm.string_list("tech");
    }

    Ok(Project {
        slug: slug_for(file, fm),
        title,
        description: fm
            .str_any(&["description", "excerpt", "summary"])
            .unwrap_or_else(|| excerpt(&doc.body)),
        date,
        tags: fm.string_list("tags"),
        technologies,
        github_url: fm.str_any(&["github", "githubUrl", "github_url"]),
        demo_url: fm.str_any(&["demo", "demoUrl", "demo_url", "liveUrl"]),
        image: fm.str_any(&["image", "coverImage", "thumbnail"]),
        featured: fm.bool("featured").unwrap_or(false),
        status: fm
            .str("status")
            .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string())
            .to_ascii_lowercase(),
        content_html: render_html(&doc.body),
        content: doc.body,
    })
}

pub fn parse_publication(file: &str, raw: &str) -> Result<Publication> {
    let doc = frontmatter::parse(raw);
    let fm = &doc.front_matter;

    let title = required(file, fm, "title")?;
    let date = date_field(file, fm, "date")?;
    let (year, date) = match (year_field(fm), date) {
        (Some(year), Some(date)) => (year, date),
        (None, Some(date)) => (date.year(), date),
        (Some(year), None) => (year, first_of_year(file, year)?),
        (None, None) => {
            return Err(ContentError::MissingField {
                file: file.to_string(),
                field: "year".to_string(),
            });
        }
    };

    Ok(Publication {
        slug: slug_for(file, fm),
        title,
        authors: fm.string_list("authors"),
        venue: fm
            .str_any(&["venue", "journal", "conference"])
            .unwrap_or_default(),
        year,
        date,
        kind: fm
            .str_any(&["type", "kind"])
            .unwrap_or_else(|| DEFAULT_PUBLICATION_KIND.to_string())
            .to_ascii_lowercase(),
        tags: fm.string_list("tags"),
        abstract_text: fm
            .str_any(&["abstract", "excerpt", "description"])
            .unwrap_or_else(|| excerpt(&doc.body)),
        doi: fm.str("doi"),
        pdf_url: fm.str_any(&["pdf", "pdfUrl", "pdf_url"]),
        url: fm.str("url"),
        content_html: render_html(&doc.body),
        content: doc.body,
    })
}

pub fn parse_about(raw: &str) -> About {
    let doc = frontmatter::parse(raw);
    let fm = &doc.front_matter;

    About {
        title: fm.str("title").unwrap_or_else(|| "About".to_string()),
        subtitle: fm.str_any(&["subtitle", "role"]),
        email: fm.str("email"),
        links: fm.string_list("links"),
        content_html: render_html(&doc.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_post() {
        let raw = r#"---
title: Hello World
date: 2024-05-01
tags: [intro, meta]
author: Sam
---

This is the first post. It has a few words.
"#;
        let post = parse_post("hello-world.md", raw).unwrap();

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.date, date!(2024 - 05 - 01));
        assert_eq!(post.tags, vec!["intro".to_string(), "meta".to_string()]);
        assert_eq!(post.excerpt, "This is the first post. It has a few words.");
        assert_eq!(post.reading_time_minutes, 1);
        assert!(post.published);
        assert!(post.content_html.contains("<p>This is the first post."));
    }

    #[test]
    fn test_post_explicit_slug_and_draft() {
        let raw = "---\ntitle: Draft\nslug: custom\ndate: 2024-01-01\npublished: false\n---\nbody";
        let post = parse_post("file.md", raw).unwrap();
        assert_eq!(post.slug, "custom");
        assert!(!post.published);

        let raw = "---\ntitle: Draft\ndate: 2024-01-01\ndraft: true\n---\nbody";
        assert!(!parse_post("file.md", raw).unwrap().published);
    }

    #[test]
    fn test_post_missing_fields() {
        let no_title = "---\ndate: 2024-01-01\n---\nbody";
        assert!(matches!(
            parse_post("a.md", no_title),
            Err(ContentError::MissingField { ref field, .. }) if field == "title"
        ));

        let no_front_matter = "# Just text";
        assert!(matches!(
            parse_post("a.md", no_front_matter),
            Err(ContentError::MissingField { .. })
        ));

        let bad_date = "---\ntitle: T\ndate: yesterday\n---\n";
        assert!(matches!(
            parse_post("a.md", bad_date),
            Err(ContentError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_project() {
        let raw = r#"---
title: Folio
description: Personal site
year: 2022
technologies: [Rust, SQLite]
github: https://github.com/me/folio
featured: true
status: Active
---
Details.
"#;
        let project = parse_project("folio.md", raw).unwrap();

        assert_eq!(project.slug, "folio");
        assert_eq!(project.date, date!(2022 - 01 - 01));
        assert_eq!(project.technologies, vec!["Rust".to_string(), "SQLite".to_string()]);
        assert_eq!(project.github_url.as_deref(), Some("https://github.com/me/folio"));
        assert!(project.featured);
        assert_eq!(project.status, "active");
    }

    #[test]
    fn test_project_defaults() {
        let raw = "---\ntitle: Tiny\ndate: 2021-03-04\n---\nA tiny tool.";
        let project = parse_project("tiny.md", raw).unwrap();
        assert_eq!(project.status, "completed");
        assert!(!project.featured);
        assert_eq!(project.description, "A tiny tool.");
    }

    #[test]
    fn test_parse_publication() {
        let raw = r#"---
title: Fast Things
authors:
  - A. Author
  - B. Author
venue: SOSP
year: 2023
type: Conference
doi: 10.1145/000
abstract: We make things fast.
---
"#;
        let publication = parse_publication("fast-things.md", raw).unwrap();

        assert_eq!(publication.year, 2023);
        assert_eq!(publication.date, date!(2023 - 01 - 01));
        assert_eq!(publication.authors.len(), 2);
        assert_eq!(publication.kind, "conference");
        assert_eq!(publication.abstract_text, "We make things fast.");
        assert_eq!(publication.doi.as_deref(), Some("10.1145/000"));
    }

    #[test]
    fn test_publication_year_from_date() {
        let raw = "---\ntitle: P\ndate: 2020-09-15\n---\n";
        let publication = parse_publication("p.md", raw).unwrap();
        assert_eq!(publication.year, 2020);
        assert_eq!(publication.kind, "article");

        let undated = "---\ntitle: P\n---\n";
        assert!(parse_publication("p.md", undated).is_err());
    }

    #[test]
    fn test_parse_about() {
        let about = parse_about("---\ntitle: Hi, I'm Sam\nemail: sam@example.com\n---\nI build things.");
        assert_eq!(about.title, "Hi, I'm Sam");
        assert_eq!(about.email.as_deref(), Some("sam@example.com"));
        assert!(about.content_html.contains("I build things."));

        let bare = parse_about("Just text");
        assert_eq!(bare.title, "About");
    }
}
