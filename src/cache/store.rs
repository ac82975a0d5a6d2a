// Cache store for the schema document and its metadata sidecar.
// Handles atomic file writes, JSON metadata, and TTL checking.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How long a cached schema document stays fresh: 24 hours.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Metadata written alongside the cached schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    /// When the document was downloaded.
    pub cached_at: DateTime<Utc>,
    /// Schema version reported by the document's info block.
    pub version: String,
    /// Number of path entries in the document.
    pub path_count: usize,
}

impl CacheMeta {
    /// Create metadata stamped with the current time.
    pub fn new(version: String, path_count: usize) -> Self {
        Self {
            cached_at: Utc::now(),
            version,
            path_count,
        }
    }

    /// Check if the cached document is still fresh within the TTL.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed < ttl
    }
}

/// Read a cached document as raw text.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(contents))
}

/// Write raw text to the cache.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read cache metadata. A missing or corrupt meta file reads as absent,
/// which callers treat as "stale".
pub fn read_meta(path: &Path) -> Option<CacheMeta> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Write cache metadata as JSON.
pub fn write_meta(path: &Path, meta: &CacheMeta) -> Result<()> {
    write_text(path, &serde_json::to_string_pretty(meta)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("openapi.json");

        let text = r#"{"openapi": "3.0.3"}"#;
        write_text(&path, text).unwrap();

        let read = read_text(&path).unwrap();
        assert_eq!(read, Some(text.to_string()));

        // The temp file from the atomic write must be gone
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        assert!(read_text(&path).unwrap().is_none());
        assert!(read_meta(&path).is_none());
    }

    #[test]
    fn test_meta_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");

        let meta = CacheMeta::new("4.0.0".to_string(), 1780);
        write_meta(&path, &meta).unwrap();

        let read = read_meta(&path).unwrap();
        assert_eq!(read.version, "4.0.0");
        assert_eq!(read.path_count, 1780);
        assert_eq!(read.cached_at, meta.cached_at);
    }

    #[test]
    fn test_fresh_meta() {
        let meta = CacheMeta::new("4.0.0".to_string(), 10);
        assert!(meta.is_fresh(CACHE_TTL));
    }

    #[test]
    fn test_stale_meta() {
        let mut meta = CacheMeta::new("4.0.0".to_string(), 10);

        // Set cached_at to 25 hours ago
        meta.cached_at = Utc::now() - chrono::Duration::hours(25);

        assert!(!meta.is_fresh(CACHE_TTL));
    }

    #[test]
    fn test_corrupt_meta_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("meta.json");

        write_text(&path, "not json at all").unwrap();
        assert!(read_meta(&path).is_none());
    }
}
