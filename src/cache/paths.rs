// Cache path utilities.
// Locates the on-disk cache holding the downloaded OpenAPI schema document.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/cloudflare-api on macOS/Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cloudflare-api").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the cached OpenAPI schema document.
pub fn schema_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("openapi.json"))
}

/// Path to the schema cache metadata file.
pub fn meta_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("meta.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_paths() {
        // These tests verify path construction, not actual filesystem
        let schema_p = schema_path().unwrap();
        assert!(schema_p.ends_with("cloudflare-api/openapi.json"));

        let meta_p = meta_path().unwrap();
        assert!(meta_p.ends_with("cloudflare-api/meta.json"));

        assert_eq!(schema_p.parent(), meta_p.parent());
    }
}
