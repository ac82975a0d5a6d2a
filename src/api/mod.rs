// Cloudflare API module.
// Credentials, authenticated HTTP client, and the v4 response envelope.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::Credentials;
pub use client::{CloudflareClient, DEFAULT_BASE_URL};
pub use types::{ApiEnvelope, ApiMessage, ResultInfo};
