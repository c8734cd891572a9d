use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Site configuration, read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub comments: CommentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,

    /// Fetch markdown over HTTP from here instead of `dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Known filenames per kind; an empty list means "discover"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default)]
    pub blog: Vec<String>,

    #[serde(default)]
    pub projects: Vec<String>,

    #[serde(default)]
    pub publications: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_link_ttl")]
    pub link_ttl_minutes: i64,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            base_url: None,
            exclude: default_exclude(),
            manifest: ManifestConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            link_ttl_minutes: default_link_ttl(),
            session_ttl_hours: default_session_ttl(),
        }
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_exclude() -> Vec<String> {
    vec!["_*".to_string(), "README.md".to_string()]
}

fn default_site_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_link_ttl() -> i64 {
    15
}

fn default_session_ttl() -> i64 {
    720
}

fn default_max_length() -> usize {
    2000
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "folio", "folio") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.folio/config.toml")
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.content.dir, PathBuf::from("content"));
        assert_eq!(config.auth.link_ttl_minutes, 15);
        assert_eq!(config.auth.session_ttl_hours, 720);
        assert_eq!(config.comments.max_length, 2000);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.content.exclude, config.content.exclude);
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config = toml::from_str(
            r#"
[server]
port = 3000

[content]
base_url = "https://example.com/content"

[content.manifest]
blog = ["hello.md", "second.md"]
"#,
        )
        .unwrap();

        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.content.base_url.as_deref(), Some("https://example.com/content"));
        assert_eq!(parsed.content.manifest.blog.len(), 2);
        assert!(parsed.content.manifest.projects.is_empty());
        assert_eq!(parsed.auth.site_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_load_from_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 8080);

        std::fs::write(&path, "[comments]\nmax_length = 10\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.comments.max_length, 10);
    }
}
