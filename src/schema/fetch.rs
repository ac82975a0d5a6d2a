// Schema download and cache management.
// Fetches the published Cloudflare OpenAPI document, caching it on disk for 24 hours.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{self, CACHE_TTL, CacheMeta};
use crate::error::{CfError, Result};

/// Upstream location of the published OpenAPI document.
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/cloudflare/api-schemas/refs/heads/main/openapi.json";

// The document is ~8MB; allow a slow link.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// On-disk cache of the schema document plus its metadata sidecar.
pub struct SchemaCache {
    schema_path: PathBuf,
    meta_path: PathBuf,
    url: String,
}

impl SchemaCache {
    /// Cache at the platform default location, fetching from the published URL.
    pub fn new() -> Result<Self> {
        let schema_path = cache::schema_path().ok_or(CfError::NoCacheDir)?;
        let meta_path = cache::meta_path().ok_or(CfError::NoCacheDir)?;

        Ok(Self {
            schema_path,
            meta_path,
            url: SCHEMA_URL.to_string(),
        })
    }

    /// Cache rooted at an explicit directory, fetching from an explicit URL.
    pub fn at(dir: &Path, url: &str) -> Self {
        Self {
            schema_path: dir.join("openapi.json"),
            meta_path: dir.join("meta.json"),
            url: url.to_string(),
        }
    }

    /// Whether a cached copy exists and is within the TTL.
    pub fn is_fresh(&self) -> bool {
        self.schema_path.exists()
            && cache::read_meta(&self.meta_path)
                .map(|meta| meta.is_fresh(CACHE_TTL))
                .unwrap_or(false)
    }

    /// Metadata for the cached copy, if any.
    pub fn meta(&self) -> Option<CacheMeta> {
        cache::read_meta(&self.meta_path)
    }

    /// Load the schema, downloading only when the cache is stale or missing.
    pub async fn load(&self) -> Result<Value> {
        if self.is_fresh() {
            if let Some(schema) = self.read_cached() {
                debug!("using cached schema");
                return Ok(schema);
            }
        }

        self.fetch(false).await
    }

    /// Download the schema, reusing a fresh cached copy unless `force` is set.
    pub async fn fetch(&self, force: bool) -> Result<Value> {
        if !force && self.is_fresh() {
            if let Some(schema) = self.read_cached() {
                eprintln!("Using cached schema (< 24h old)");
                return Ok(schema);
            }
        }

        eprintln!("Fetching latest Cloudflare API schema...");
        let text = match self.download().await {
            Ok(text) => text,
            Err(err) => {
                // A stale copy beats no schema at all.
                if let Some(schema) = self.read_cached() {
                    warn!(error = %err, "schema fetch failed, serving stale cache");
                    eprintln!("Error fetching schema: {err}");
                    eprintln!("Falling back to stale cache");
                    return Ok(schema);
                }
                return Err(err);
            }
        };

        let schema: Value = serde_json::from_str(&text)?;
        self.store(&text, &schema)?;
        Ok(schema)
    }

    async fn download(&self) -> Result<String> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        let response = client.get(&self.url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Write the document byte-for-byte as downloaded, plus its metadata.
    fn store(&self, text: &str, schema: &Value) -> Result<()> {
        cache::write_text(&self.schema_path, text)?;

        let meta = CacheMeta::new(schema_version(schema), path_count(schema));
        cache::write_meta(&self.meta_path, &meta)?;

        eprintln!("Cached schema: {} endpoints", meta.path_count);
        Ok(())
    }

    fn read_cached(&self) -> Option<Value> {
        let text = cache::read_text(&self.schema_path).ok()??;
        match serde_json::from_str(&text) {
            Ok(schema) => Some(schema),
            Err(err) => {
                warn!(error = %err, "cached schema is not valid JSON, discarding");
                None
            }
        }
    }
}

fn schema_version(schema: &Value) -> String {
    schema
        .pointer("/info/version")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn path_count(schema: &Value) -> usize {
    schema
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| paths.len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCHEMA_BODY: &str = r#"{
        "openapi": "3.0.3",
        "info": {"title": "Cloudflare API", "version": "4.0.0"},
        "paths": {"/zones": {"get": {"summary": "List Zones"}}}
    }"#;

    fn mock_url(server: &MockServer) -> String {
        format!("{}/openapi.json", server.uri())
    }

    async fn serve_schema(server: &MockServer, expected_hits: u64) {
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SCHEMA_BODY))
            .expect(expected_hits)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let server = MockServer::start().await;
        serve_schema(&server, 1).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        let schema = cache.fetch(false).await.unwrap();
        assert_eq!(schema["info"]["version"], "4.0.0");
        assert!(cache.is_fresh());

        let meta = cache.meta().unwrap();
        assert_eq!(meta.version, "4.0.0");
        assert_eq!(meta.path_count, 1);
    }

    #[tokio::test]
    async fn test_load_uses_fresh_cache() {
        let server = MockServer::start().await;
        serve_schema(&server, 1).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        cache.fetch(false).await.unwrap();
        // Second load must come from disk; the mock expects one hit total.
        let schema = cache.load().await.unwrap();
        assert_eq!(schema["info"]["title"], "Cloudflare API");
    }

    #[tokio::test]
    async fn test_force_refetches() {
        let server = MockServer::start().await;
        serve_schema(&server, 2).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        cache.fetch(false).await.unwrap();
        cache.fetch(true).await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_refetch() {
        let server = MockServer::start().await;
        serve_schema(&server, 1).await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        // Seed a stale cache by hand
        crate::cache::write_text(&temp_dir.path().join("openapi.json"), "{}").unwrap();
        let mut meta = CacheMeta::new("old".to_string(), 0);
        meta.cached_at = Utc::now() - chrono::Duration::hours(25);
        crate::cache::write_meta(&temp_dir.path().join("meta.json"), &meta).unwrap();

        assert!(!cache.is_fresh());
        let schema = cache.load().await.unwrap();
        assert_eq!(schema["info"]["version"], "4.0.0");
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_stale_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        // Seed a stale but readable cache
        crate::cache::write_text(&temp_dir.path().join("openapi.json"), SCHEMA_BODY).unwrap();
        let mut meta = CacheMeta::new("4.0.0".to_string(), 1);
        meta.cached_at = Utc::now() - chrono::Duration::hours(48);
        crate::cache::write_meta(&temp_dir.path().join("meta.json"), &meta).unwrap();

        let schema = cache.fetch(false).await.unwrap();
        assert_eq!(schema["info"]["version"], "4.0.0");
    }

    #[tokio::test]
    async fn test_fetch_failure_without_cache_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let cache = SchemaCache::at(temp_dir.path(), &mock_url(&server));

        assert!(cache.fetch(false).await.is_err());
    }
}
