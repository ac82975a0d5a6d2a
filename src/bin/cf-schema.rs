// cf-schema: fetch, cache, and query the Cloudflare OpenAPI schema.
// Lookups are served from a local copy refreshed every 24 hours.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cf_tools::Result;
use cf_tools::schema::{
    EXPAND_DEPTH, SchemaCache, expand_refs, get_endpoint, list_paths, schema_info, search,
    similar_paths,
};

const SEARCH_LIMIT: usize = 50;
const LIST_LIMIT: usize = 100;
const SUGGESTION_LIMIT: usize = 5;
const PREFIX_LIMIT: usize = 20;

#[derive(Parser)]
#[command(
    name = "cf-schema",
    version,
    about = "Fetch, cache, and query the Cloudflare API schema",
    long_about = "Downloads the published Cloudflare OpenAPI document, caches it locally \
                  for 24 hours, and answers endpoint lookups from the cached copy."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the schema, refreshing the local cache
    Fetch {
        /// Refetch even if the cached copy is still fresh
        #[arg(long)]
        force: bool,
    },

    /// Search endpoints by keyword
    #[command(arg_required_else_help = true)]
    Search {
        /// Keywords matched against paths, summaries, and operation ids
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show the full spec for an endpoint path
    Get {
        /// Endpoint path, e.g. /zones
        path: String,
    },

    /// List endpoint paths
    List {
        /// Only show paths starting with this prefix, e.g. /accounts
        prefix: Option<String>,
    },

    /// Show schema metadata and stats
    Info,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("cf_tools=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<ExitCode> {
    let cache = SchemaCache::new()?;

    match command {
        Command::Fetch { force } => {
            let schema = cache.fetch(force).await?;
            let info = schema_info(&schema);
            println!("Schema version: {}", info.version);
            println!("Total endpoints: {}", info.endpoint_count);
        }

        Command::Search { query } => {
            let query = query.join(" ");
            let schema = cache.load().await?;
            let hits = search(&schema, &query);

            if hits.is_empty() {
                println!("No endpoints found matching '{query}'");
            } else {
                println!("Found {} matching endpoints:\n", hits.len());
                for hit in hits.iter().take(SEARCH_LIMIT) {
                    println!("{:7} {}", hit.method, hit.path);
                    if !hit.summary.is_empty() {
                        println!("        {}", hit.summary);
                    }
                }
                if hits.len() > SEARCH_LIMIT {
                    println!("\n... and {} more", hits.len() - SEARCH_LIMIT);
                }
            }
        }

        Command::Get { path } => {
            let schema = cache.load().await?;
            match get_endpoint(&schema, &path) {
                Some(endpoint) => {
                    let expanded = expand_refs(&endpoint.methods, &schema, EXPAND_DEPTH);
                    let document = serde_json::json!({
                        "path": endpoint.path,
                        "methods": expanded,
                    });
                    println!("{}", serde_json::to_string_pretty(&document)?);
                }
                None => {
                    println!("Endpoint not found: {path}");
                    let suggestions = similar_paths(&schema, &path, SUGGESTION_LIMIT);
                    if !suggestions.is_empty() {
                        println!("\nDid you mean:");
                        for suggestion in suggestions {
                            println!("  {suggestion}");
                        }
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Command::List { prefix } => {
            let schema = cache.load().await?;
            let entries = list_paths(&schema, prefix.as_deref().unwrap_or(""));

            for entry in entries.iter().take(LIST_LIMIT) {
                println!("{}: {}", entry.path, entry.methods.join(", "));
            }
            if entries.len() > LIST_LIMIT {
                println!("\n... and {} more paths", entries.len() - LIST_LIMIT);
            }
        }

        Command::Info => {
            let schema = cache.load().await?;
            let info = schema_info(&schema);

            println!("Cloudflare API Schema");
            println!("=====================");
            println!("Title: {}", info.title);
            println!("Version: {}", info.version);
            println!("Total Endpoints: {}", info.endpoint_count);
            println!("\nMethods:");
            for (method, count) in &info.method_counts {
                println!("  {method}: {count}");
            }
            println!("\nTop-level paths:");
            for prefix in info.top_level_paths.iter().take(PREFIX_LIMIT) {
                println!("  {prefix}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
