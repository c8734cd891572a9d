//! Content records loaded from markdown files

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;

use crate::CoreError;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// The kinds of markdown content the site publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Blog,
    Project,
    Publication,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [Self::Blog, Self::Project, Self::Publication];

    /// Directory (or URL path segment) holding this kind's markdown files
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Project => "projects",
            Self::Publication => "publications",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Project => "project",
            Self::Publication => "publication",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blog" | "post" | "posts" => Ok(Self::Blog),
            "project" | "projects" => Ok(Self::Project),
            "publication" | "publications" => Ok(Self::Publication),
            other => Err(CoreError::Validation(format!("unknown content kind: {other}"))),
        }
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub published: bool,
    pub reading_time_minutes: usize,
    pub content: String,
    pub content_html: String,
}

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub featured: bool,
    pub status: String,
    pub content: String,
    pub content_html: String,
}

/// A paper, talk or other publication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub venue: String,
    pub year: i32,
    #[serde(with = "iso_date")]
    pub date: Date,
    /// journal, conference, preprint, thesis, talk...
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: String,
    pub content_html: String,
}

/// The about page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct About {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    pub content_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("posts".parse::<ContentKind>().unwrap(), ContentKind::Blog);
        assert_eq!(
            "Publications".parse::<ContentKind>().unwrap(),
            ContentKind::Publication
        );
        assert!("videos".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_kind_dirs() {
        assert_eq!(ContentKind::Blog.dir_name(), "blog");
        assert_eq!(ContentKind::Project.dir_name(), "projects");
        assert_eq!(ContentKind::Publication.dir_name(), "publications");
    }

    #[test]
    fn test_post_date_serializes_as_iso() {
        let post = BlogPost {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: time::macros::date!(2024 - 03 - 09),
            excerpt: String::new(),
            tags: vec![],
            author: None,
            cover_image: None,
            published: true,
            reading_time_minutes: 1,
            content: String::new(),
            content_html: String::new(),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["date"], "2024-03-09");
        assert!(json.get("author").is_none());
    }
}
