// Schema module.
// Downloads and caches the Cloudflare OpenAPI document and answers lookups over it.

pub mod fetch;
pub mod query;

pub use fetch::{SCHEMA_URL, SchemaCache};
pub use query::{
    EXPAND_DEPTH, Endpoint, PathEntry, SchemaInfo, SearchHit, expand_refs, get_endpoint,
    list_paths, schema_info, search, similar_paths,
};
