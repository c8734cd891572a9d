use async_trait::async_trait;
use folio_core::ContentKind;

use crate::handler::{ContentSource, validate_relative};
use crate::{ContentError, Result};

/// Markdown files served over HTTP from a base URL
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ContentError::InvalidPath(format!(
                "content URL must start with http:// or https://: {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ContentError::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Static hosts often answer unknown paths with the HTML app shell
fn looks_like_html(content_type: &str, body: &str) -> bool {
    if content_type.contains("text/html") {
        return true;
    }
    let head = body.trim_start();
    let head = head.get(..15).unwrap_or(head);
    head.eq_ignore_ascii_case("<!doctype html>") || head.to_ascii_lowercase().starts_with("<html")
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        validate_relative(path)?;
        let url = self.url_for(path);

        let fetch_err = |reason: String| ContentError::Fetch {
            path: url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status().as_u16())));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let body = response
            .text()
            .await
            .map_err(|e| fetch_err(format!("failed to read response: {e}")))?;

        if looks_like_html(&content_type, &body) {
            return Err(fetch_err("received HTML instead of markdown".to_string()));
        }

        Ok(body)
    }

    async fn discover(&self, _kind: ContentKind) -> Result<Vec<String>> {
        // A plain static host has no directory listing; rely on the manifest
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let source = HttpSource::new("https://example.com/content/").unwrap();
        assert_eq!(
            source.url_for("blog/hello.md"),
            "https://example.com/content/blog/hello.md"
        );
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(HttpSource::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_html_detection() {
        assert!(looks_like_html("text/html; charset=utf-8", "# Title"));
        assert!(looks_like_html("", "  <!DOCTYPE html><html></html>"));
        assert!(looks_like_html("text/plain", "<html><body/></html>"));
        assert!(!looks_like_html("text/markdown", "---\ntitle: x\n---\n"));
    }
}
