use folio_core::ContentKind;
use glob::Pattern;

/// Known markdown filenames per content kind, plus exclusion patterns
///
/// A kind with no listed files falls back to whatever the source can discover.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    blog: Vec<String>,
    projects: Vec<String>,
    publications: Vec<String>,
    exclude: Vec<Pattern>,
}

impl Manifest {
    pub fn new(blog: Vec<String>, projects: Vec<String>, publications: Vec<String>) -> Self {
        Self {
            blog,
            projects,
            publications,
            exclude: Vec::new(),
        }
    }

    /// Add glob patterns for filenames to skip; invalid patterns are ignored
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns
            .into_iter()
            .filter_map(|p| Pattern::new(&p).ok())
            .collect();
        self
    }

    pub fn files(&self, kind: ContentKind) -> &[String] {
        match kind {
            ContentKind::Blog => &self.blog,
            ContentKind::Project => &self.projects,
            ContentKind::Publication => &self.publications,
        }
    }

    pub fn is_listed(&self, kind: ContentKind) -> bool {
        !self.files(kind).is_empty()
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(filename))
    }

    /// First matching exclusion pattern (for logs)
    pub fn matching_pattern(&self, filename: &str) -> Option<String> {
        self.exclude
            .iter()
            .find(|p| p.matches(filename))
            .map(|p| p.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_per_kind() {
        let manifest = Manifest::new(
            vec!["hello.md".to_string()],
            vec![],
            vec!["paper.md".to_string()],
        );

        assert_eq!(manifest.files(ContentKind::Blog), ["hello.md".to_string()]);
        assert!(manifest.is_listed(ContentKind::Publication));
        assert!(!manifest.is_listed(ContentKind::Project));
    }

    #[test]
    fn test_exclude_patterns() {
        let manifest = Manifest::default()
            .with_exclude(vec!["_*".to_string(), "*.draft.md".to_string()]);

        assert!(manifest.is_excluded("_template.md"));
        assert!(manifest.is_excluded("post.draft.md"));
        assert!(!manifest.is_excluded("post.md"));
        assert_eq!(
            manifest.matching_pattern("_template.md"),
            Some("_*".to_string())
        );
        assert_eq!(manifest.matching_pattern("post.md"), None);
    }
}
