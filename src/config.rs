//! Server configuration assembled from CLI flags and the environment.

use std::path::PathBuf;

use crate::catalog::CatalogSource;

/// Environment variable overriding the canonical base URL.
pub const BASE_URL_ENV: &str = "JMEV_BASE_URL";

/// Canonical origin used when neither the flag nor the environment set one.
pub const DEFAULT_BASE_URL: &str = "https://jmev-tunisia.tn";

/// Everything `serve` needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
    /// Catalog directory on disk; `None` serves the bundled catalogs.
    pub messages_dir: Option<PathBuf>,
    /// Directory holding `images/` and `static/`.
    pub public_dir: PathBuf,
    /// Public origin without trailing slash.
    pub base_url: String,
    /// Refuse to start when a catalog has a load issue.
    pub strict: bool,
}

impl SiteConfig {
    /// Builds the configuration. An explicit `base_url` wins over
    /// `JMEV_BASE_URL`, which wins over [`DEFAULT_BASE_URL`].
    pub fn new(
        host: String,
        port: u16,
        messages_dir: Option<PathBuf>,
        public_dir: PathBuf,
        base_url: Option<String>,
        strict: bool,
    ) -> Self {
        let base_url = base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            host,
            port,
            messages_dir,
            public_dir,
            base_url: normalize_base_url(&base_url),
            strict,
        }
    }

    /// Where translation catalogs are read from.
    pub fn catalog_source(&self) -> CatalogSource {
        match &self.messages_dir {
            Some(dir) => CatalogSource::Directory(dir.clone()),
            None => CatalogSource::Bundled,
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_url_is_normalized() {
        let config = SiteConfig::new(
            "127.0.0.1".into(),
            3000,
            None,
            PathBuf::from("public"),
            Some("https://example.tn/ ".into()),
            false,
        );
        assert_eq!(config.base_url, "https://example.tn");
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 3000));
    }

    #[test]
    fn test_catalog_source() {
        let bundled = SiteConfig::new(
            "0.0.0.0".into(),
            8080,
            None,
            PathBuf::from("public"),
            Some(DEFAULT_BASE_URL.into()),
            true,
        );
        assert_eq!(bundled.catalog_source(), CatalogSource::Bundled);

        let on_disk = SiteConfig {
            messages_dir: Some(PathBuf::from("messages")),
            ..bundled
        };
        assert_eq!(
            on_disk.catalog_source(),
            CatalogSource::Directory(PathBuf::from("messages"))
        );
    }
}
