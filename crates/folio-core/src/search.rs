//! Linear search and filtering over loaded content
//!
//! No index: every query is a case-insensitive substring scan over the
//! searchable fields of each record. Result order follows input order.

use serde::Serialize;
use time::Date;

use crate::{BlogPost, ContentKind, Project, Publication};

/// Key under which tags are compared and counted
pub fn tag_key(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Anything that can be matched by a free text query
pub trait Searchable {
    /// Text fields scanned by the query (title, excerpt, content...)
    fn search_fields(&self) -> Vec<&str>;

    fn tags(&self) -> &[String];
}

impl Searchable for BlogPost {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.excerpt.as_str(), self.content.as_str()];
        fields.extend(self.author.as_deref());
        fields
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.content.as_str(),
        ];
        fields.extend(self.technologies.iter().map(String::as_str));
        fields
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Searchable for Publication {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.abstract_text.as_str(),
            self.venue.as_str(),
            self.content.as_str(),
        ];
        fields.extend(self.authors.iter().map(String::as_str));
        fields
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Free text query plus an optional tag filter
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub tag: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.tag = (!tag.trim().is_empty()).then_some(tag);
        self
    }

    fn terms(&self) -> Vec<String> {
        self.text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    /// Every term must appear in some field or tag; the tag filter matches by [`tag_key`]
    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        if let Some(tag) = &self.tag {
            let key = tag_key(tag);
            if !item.tags().iter().any(|t| tag_key(t) == key) {
                return false;
            }
        }

        let terms = self.terms();
        if terms.is_empty() {
            return true;
        }

        let haystacks: Vec<String> = item
            .search_fields()
            .into_iter()
            .chain(item.tags().iter().map(String::as_str))
            .map(str::to_lowercase)
            .collect();

        terms
            .iter()
            .all(|term| haystacks.iter().any(|field| field.contains(term.as_str())))
    }

    pub fn filter<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

/// Project listing filter
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub query: SearchQuery,
    pub status: Option<String>,
    pub featured: Option<bool>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(status) = &self.status
            && !project.status.eq_ignore_ascii_case(status.trim())
        {
            return false;
        }
        if let Some(featured) = self.featured
            && project.featured != featured
        {
            return false;
        }
        self.query.matches(project)
    }

    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Publication listing filter
#[derive(Debug, Clone, Default)]
pub struct PublicationFilter {
    pub query: SearchQuery,
    pub year: Option<i32>,
    pub kind: Option<String>,
}

impl PublicationFilter {
    pub fn matches(&self, publication: &Publication) -> bool {
        if let Some(year) = self.year
            && publication.year != year
        {
            return false;
        }
        if let Some(kind) = &self.kind
            && !publication.kind.eq_ignore_ascii_case(kind.trim())
        {
            return false;
        }
        self.query.matches(publication)
    }

    pub fn apply<'a>(&self, publications: &'a [Publication]) -> Vec<&'a Publication> {
        publications.iter().filter(|p| self.matches(p)).collect()
    }
}

/// A cross-collection search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub kind: ContentKind,
    pub slug: String,
    pub title: String,
    pub summary: String,
    #[serde(with = "hit_date")]
    pub date: Date,
}

time::serde::format_description!(hit_date, Date, "[year]-[month]-[day]");

impl From<&BlogPost> for SearchHit {
    fn from(post: &BlogPost) -> Self {
        Self {
            kind: ContentKind::Blog,
            slug: post.slug.clone(),
            title: post.title.clone(),
            summary: post.excerpt.clone(),
            date: post.date,
        }
    }
}

impl From<&Project> for SearchHit {
    fn from(project: &Project) -> Self {
        Self {
            kind: ContentKind::Project,
            slug: project.slug.clone(),
            title: project.title.clone(),
            summary: project.description.clone(),
            date: project.date,
        }
    }
}

impl From<&Publication> for SearchHit {
    fn from(publication: &Publication) -> Self {
        Self {
            kind: ContentKind::Publication,
            slug: publication.slug.clone(),
            title: publication.title.clone(),
            summary: publication.abstract_text.clone(),
            date: publication.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn post(slug: &str, title: &str, excerpt: &str, tags: &[&str], content: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date!(2024 - 01 - 01),
            excerpt: excerpt.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            cover_image: None,
            published: true,
            reading_time_minutes: 1,
            content: content.to_string(),
            content_html: String::new(),
        }
    }

    fn publication(slug: &str, year: i32, kind: &str, authors: &[&str]) -> Publication {
        Publication {
            slug: slug.to_string(),
            title: format!("Paper {slug}"),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            venue: "NeurIPS".to_string(),
            year,
            date: date!(2023 - 06 - 01),
            kind: kind.to_string(),
            tags: vec![],
            abstract_text: "We study things.".to_string(),
            doi: None,
            pdf_url: None,
            url: None,
            content: String::new(),
            content_html: String::new(),
        }
    }

    fn posts() -> Vec<BlogPost> {
        vec![
            post("rust-async", "Async Rust", "Futures explained", &["rust", "async"], "tokio runtime"),
            post("go-gc", "Garbage collection in Go", "GC internals", &["go"], "mark and sweep"),
            post("notes", "Weekly notes", "Misc", &["life"], "I tried Tokio this week"),
        ]
    }

    fn slugs<T>(items: &[&T], slug: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| slug(i).to_string()).collect()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let posts = posts();
        assert_eq!(SearchQuery::new("").filter(&posts).len(), 3);
        assert_eq!(SearchQuery::new("   ").filter(&posts).len(), 3);
    }

    #[test]
    fn test_title_match_case_insensitive() {
        let posts = posts();
        let hits = SearchQuery::new("ASYNC").filter(&posts);
        assert_eq!(slugs(&hits, |p: &BlogPost| p.slug.as_str()), vec!["rust-async"]);
    }

    #[test]
    fn test_content_match_keeps_order() {
        let posts = posts();
        let hits = SearchQuery::new("tokio").filter(&posts);
        assert_eq!(
            slugs(&hits, |p: &BlogPost| p.slug.as_str()),
            vec!["rust-async", "notes"]
        );
    }

    #[test]
    fn test_all_terms_must_match() {
        let posts = posts();
        let hits = SearchQuery::new("tokio week").filter(&posts);
        assert_eq!(slugs(&hits, |p: &BlogPost| p.slug.as_str()), vec!["notes"]);
    }

    #[test]
    fn test_tag_filter() {
        let posts = posts();
        let hits = SearchQuery::new("").with_tag("Rust").filter(&posts);
        assert_eq!(slugs(&hits, |p: &BlogPost| p.slug.as_str()), vec!["rust-async"]);

        let none = SearchQuery::new("tokio").with_tag("go").filter(&posts);
        assert!(none.is_empty());
    }

    #[test]
    fn test_tag_filter_folds_non_ascii() {
        let posts = vec![post("cafe", "Café", "", &["Économie"], "")];
        let hits = SearchQuery::new("").with_tag("économie").filter(&posts);
        assert_eq!(hits.len(), 1);
        assert_eq!(tag_key(" ÉCONOMIE "), tag_key("économie"));
    }

    #[test]
    fn test_tag_text_is_searchable() {
        let posts = posts();
        let hits = SearchQuery::new("life").filter(&posts);
        assert_eq!(slugs(&hits, |p: &BlogPost| p.slug.as_str()), vec!["notes"]);
    }

    #[test]
    fn test_no_match() {
        let posts = posts();
        assert!(SearchQuery::new("haskell").filter(&posts).is_empty());
    }

    #[test]
    fn test_publication_filter() {
        let pubs = vec![
            publication("a", 2023, "conference", &["Grace Hopper"]),
            publication("b", 2022, "journal", &["Alan Kay"]),
            publication("c", 2023, "journal", &["Grace Hopper", "Alan Kay"]),
        ];

        let filter = PublicationFilter {
            year: Some(2023),
            ..Default::default()
        };
        let hits = filter.apply(&pubs);
        assert_eq!(slugs(&hits, |p: &Publication| p.slug.as_str()), vec!["a", "c"]);

        let filter = PublicationFilter {
            query: SearchQuery::new("kay"),
            kind: Some("Journal".to_string()),
            ..Default::default()
        };
        let hits = filter.apply(&pubs);
        assert_eq!(slugs(&hits, |p: &Publication| p.slug.as_str()), vec!["b", "c"]);
    }

    #[test]
    fn test_search_hit_from_post() {
        let posts = posts();
        let hit = SearchHit::from(&posts[0]);
        assert_eq!(hit.kind, ContentKind::Blog);
        assert_eq!(hit.summary, "Futures explained");

        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["kind"], "blog");
        assert_eq!(json["date"], "2024-01-01");
    }
}
