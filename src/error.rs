// Error types for cf-tools.
// Covers HTTP transport, cache I/O, and credential lookup failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "no authentication configured: set CLOUDFLARE_API_TOKEN or (CLOUDFLARE_API_KEY + CLOUDFLARE_EMAIL)"
    )]
    MissingCredentials,

    #[error("could not determine a cache directory for this platform")]
    NoCacheDir,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CfError>;
