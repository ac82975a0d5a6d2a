// Schema lookup operations.
// Keyword search, endpoint retrieval, path listing, and stats over the parsed document.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tracing::debug;

/// HTTP method keys that mark an operation under a path entry. Everything
/// else (`parameters`, `x-*` extensions) is not an operation.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// How many levels of `$ref` resolution `get` output expands.
pub const EXPAND_DEPTH: usize = 2;

const SUMMARY_MAX: usize = 100;

/// One search result: an operation whose text matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub method: String,
    pub summary: String,
    pub operation_id: String,
}

/// An endpoint entry: a path and its method map from the document.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub methods: Value,
}

/// A path with its available methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: String,
    pub methods: Vec<String>,
}

/// Document metadata and operation statistics.
#[derive(Debug, Clone, Default)]
pub struct SchemaInfo {
    pub title: String,
    pub version: String,
    pub endpoint_count: usize,
    pub method_counts: BTreeMap<String, usize>,
    pub top_level_paths: Vec<String>,
}

fn paths(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("paths")?.as_object()
}

/// Iterate the operations under a path entry, in method order.
fn operations<'a>(entry: &'a Value) -> impl Iterator<Item = (&'static str, &'a Value)> {
    METHODS
        .iter()
        .filter_map(|method| {
            entry
                .get(*method)
                .filter(|op| op.is_object())
                .map(|op| (*method, op))
        })
}

fn str_field<'a>(op: &'a Value, key: &str) -> &'a str {
    op.get(key).and_then(Value::as_str).unwrap_or("")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

/// Search operations by keyword in path, summary, description, or operationId.
/// Matching is case-insensitive substring.
pub fn search(schema: &Value, query: &str) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();

    let Some(paths) = paths(schema) else {
        return hits;
    };

    for (path, entry) in paths {
        for (method, op) in operations(entry) {
            let summary = str_field(op, "summary");
            let description = str_field(op, "description");
            let operation_id = str_field(op, "operationId");

            let haystack =
                format!("{path} {summary} {description} {operation_id}").to_lowercase();
            if haystack.contains(&needle) {
                hits.push(SearchHit {
                    path: path.clone(),
                    method: method.to_uppercase(),
                    summary: truncate(summary, SUMMARY_MAX),
                    operation_id: operation_id.to_string(),
                });
            }
        }
    }

    hits
}

/// Get the full entry for an endpoint path.
/// Tries an exact match, then a leading-slash-normalized match, then the
/// first path containing the query as a substring.
pub fn get_endpoint(schema: &Value, path: &str) -> Option<Endpoint> {
    let paths = paths(schema)?;

    if let Some(entry) = paths.get(path) {
        return Some(Endpoint {
            path: path.to_string(),
            methods: entry.clone(),
        });
    }

    let slashed = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if let Some(entry) = paths.get(&slashed) {
        return Some(Endpoint {
            path: slashed,
            methods: entry.clone(),
        });
    }

    paths
        .iter()
        .find(|(candidate, _)| candidate.contains(path))
        .map(|(candidate, entry)| Endpoint {
            path: candidate.clone(),
            methods: entry.clone(),
        })
}

/// Resolve an internal `#/...` pointer against the document root.
pub fn resolve_ref<'a>(schema: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    schema.pointer(pointer)
}

/// Expand `$ref` objects up to `depth` levels of resolution. External
/// references and pointers that do not resolve are left untouched.
pub fn expand_refs(value: &Value, schema: &Value, depth: usize) -> Value {
    if depth == 0 {
        return value.clone();
    }

    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    if let Some(resolved) = resolve_ref(schema, reference) {
                        return expand_refs(resolved, schema, depth - 1);
                    }
                    debug!(%reference, "leaving unresolvable $ref in place");
                    return value.clone();
                }
            }
            Value::Object(
                map.iter()
                    .map(|(key, inner)| (key.clone(), expand_refs(inner, schema, depth)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| expand_refs(item, schema, depth))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// List all paths sorted, optionally filtered by prefix.
pub fn list_paths(schema: &Value, prefix: &str) -> Vec<PathEntry> {
    let Some(paths) = paths(schema) else {
        return Vec::new();
    };

    let mut entries: Vec<PathEntry> = paths
        .iter()
        .filter(|(path, _)| prefix.is_empty() || path.starts_with(prefix))
        .map(|(path, entry)| PathEntry {
            path: path.clone(),
            methods: operations(entry)
                .map(|(method, _)| method.to_uppercase())
                .collect(),
        })
        .collect();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

/// Collect document metadata and per-method operation counts.
pub fn schema_info(schema: &Value) -> SchemaInfo {
    let title = schema
        .pointer("/info/title")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let version = schema
        .pointer("/info/version")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let Some(paths) = paths(schema) else {
        return SchemaInfo {
            title,
            version,
            ..SchemaInfo::default()
        };
    };

    let mut method_counts = BTreeMap::new();
    let mut top_level = BTreeSet::new();

    for (path, entry) in paths {
        for (method, _) in operations(entry) {
            *method_counts.entry(method.to_uppercase()).or_insert(0) += 1;
        }

        if let Some(first) = path.trim_matches('/').split('/').next() {
            if !first.is_empty() {
                top_level.insert(format!("/{first}"));
            }
        }
    }

    SchemaInfo {
        title,
        version,
        endpoint_count: paths.len(),
        method_counts,
        top_level_paths: top_level.into_iter().collect(),
    }
}

/// Paths containing `needle`, for "did you mean" suggestions on a failed get.
pub fn similar_paths(schema: &Value, needle: &str, limit: usize) -> Vec<String> {
    let needle = needle.to_lowercase();

    paths(schema)
        .map(|paths| {
            paths
                .keys()
                .filter(|path| path.to_lowercase().contains(&needle))
                .take(limit)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}
