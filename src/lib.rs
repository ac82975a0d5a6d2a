// cf-tools library.
// Shared plumbing for the cf-schema and cf-api binaries: schema cache and
// queries, authenticated Cloudflare client, and error types.

pub mod api;
pub mod cache;
pub mod error;
pub mod schema;

pub use error::{CfError, Result};
