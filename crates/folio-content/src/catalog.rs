//! In-memory store of all loaded content

use std::collections::{HashMap, HashSet};

use folio_core::search::tag_key;
use folio_core::{About, BlogPost, Project, Publication, SearchHit, SearchQuery, Searchable, TagCount};
use tracing::warn;

/// All published content, each collection sorted by date (newest first)
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    posts: Vec<BlogPost>,
    projects: Vec<Project>,
    publications: Vec<Publication>,
    about: Option<About>,
}

impl Catalog {
    /// Build a catalog; drafts are dropped and the first of any duplicate slug wins
    pub fn new(
        posts: Vec<BlogPost>,
        projects: Vec<Project>,
        publications: Vec<Publication>,
        about: Option<About>,
    ) -> Self {
        let mut posts = dedup_by_slug(posts.into_iter().filter(|p| p.published), |p| &p.slug);
        let mut projects = dedup_by_slug(projects, |p| &p.slug);
        let mut publications = dedup_by_slug(publications, |p| &p.slug);

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
        projects.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
        publications.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));

        Self {
            posts,
            projects,
            publications,
            about,
        }
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn post(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn recent_posts(&self, limit: usize) -> &[BlogPost] {
        &self.posts[..self.posts.len().min(limit)]
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn featured_projects(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.featured).collect()
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn publication(&self, slug: &str) -> Option<&Publication> {
        self.publications.iter().find(|p| p.slug == slug)
    }

    pub fn recent_publications(&self, limit: usize) -> &[Publication] {
        &self.publications[..self.publications.len().min(limit)]
    }

    pub fn about(&self) -> Option<&About> {
        self.about.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.projects.is_empty() && self.publications.is_empty()
    }

    /// Tag usage across all collections, most used first
    ///
    /// Tags differing only in case are counted together under the first spelling seen.
    pub fn tags(&self) -> Vec<TagCount> {
        let mut counts: HashMap<String, TagCount> = HashMap::new();

        let all_tags = self
            .posts
            .iter()
            .flat_map(|p| p.tags())
            .chain(self.projects.iter().flat_map(|p| p.tags()))
            .chain(self.publications.iter().flat_map(|p| p.tags()));

        for tag in all_tags {
            counts
                .entry(tag_key(tag))
                .or_insert_with(|| TagCount {
                    tag: tag.clone(),
                    count: 0,
                })
                .count += 1;
        }

        let mut tags: Vec<TagCount> = counts.into_values().collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags
    }

    /// Search every collection; hits are ordered newest first
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = query
            .filter(&self.posts)
            .into_iter()
            .map(SearchHit::from)
            .chain(query.filter(&self.projects).into_iter().map(SearchHit::from))
            .chain(query.filter(&self.publications).into_iter().map(SearchHit::from))
            .collect();

        hits.sort_by(|a, b| b.date.cmp(&a.date));
        hits
    }
}

fn dedup_by_slug<T>(items: impl IntoIterator<Item = T>, slug: impl Fn(&T) -> &String) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for item in items {
        if seen.insert(slug(&item).clone()) {
            out.push(item);
        } else {
            warn!("Duplicate slug '{}' ignored", slug(&item));
        }
    }

    out
}
