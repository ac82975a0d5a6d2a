// cf-api: make authenticated calls against the Cloudflare v4 API.
// Credentials come from CLOUDFLARE_API_TOKEN, or the legacy
// CLOUDFLARE_API_KEY + CLOUDFLARE_EMAIL pair.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

use cf_tools::api::{ApiEnvelope, CloudflareClient, Credentials};
use cf_tools::{CfError, Result};

#[derive(Parser)]
#[command(
    name = "cf-api",
    version,
    about = "Make authenticated Cloudflare API calls",
    long_about = "Sends requests to the Cloudflare v4 API and prints the JSON response \
                  envelope. Requires CLOUDFLARE_API_TOKEN, or CLOUDFLARE_API_KEY plus \
                  CLOUDFLARE_EMAIL. CLOUDFLARE_BASE_URL overrides the API endpoint."
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
    /// GET request
    Get {
        /// Request path, e.g. /zones or "/zones?name=example.com"
        path: String,
    },

    /// POST request with an optional JSON body
    Post {
        path: String,
        /// JSON body, e.g. '{"name":"example.com"}'
        body: Option<String>,
    },

    /// PUT request with an optional JSON body
    Put {
        path: String,
        body: Option<String>,
    },

    /// PATCH request with an optional JSON body
    Patch {
        path: String,
        body: Option<String>,
    },

    /// DELETE request
    Delete { path: String },

    /// Verify the configured credentials against /user/tokens/verify
    Verify,
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
    match command {
        Command::Verify => {
            let credentials = Credentials::from_env()?;
            println!("{}", credentials.describe());

            let client = CloudflareClient::from_env()?;
            print_envelope(&client.verify().await?)
        }
        Command::Get { path } => call(Method::GET, path, None).await,
        Command::Post { path, body } => call(Method::POST, path, body).await,
        Command::Put { path, body } => call(Method::PUT, path, body).await,
        Command::Patch { path, body } => call(Method::PATCH, path, body).await,
        Command::Delete { path } => call(Method::DELETE, path, None).await,
    }
}

async fn call(method: Method, path: String, body: Option<String>) -> Result<ExitCode> {
    // Reject malformed bodies before anything goes on the wire
    let body = body.map(|raw| parse_body(&raw)).transpose()?;

    let client = CloudflareClient::from_env()?;
    let envelope = client.request(method, &path, body.as_ref()).await?;
    print_envelope(&envelope)
}

fn parse_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|err| CfError::Other(format!("invalid JSON body: {err}")))
}

/// Print the envelope to stdout and a one-line summary to stderr.
/// The exit code follows the envelope's success flag.
fn print_envelope(envelope: &ApiEnvelope) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(envelope)?);

    if envelope.success {
        match &envelope.result {
            Some(Value::Array(items)) => {
                eprintln!("\n[Success: {} items returned]", items.len());
            }
            Some(Value::Object(map)) if map.contains_key("id") => {
                let id = match &map["id"] {
                    Value::String(id) => id.clone(),
                    other => other.to_string(),
                };
                eprintln!("\n[Success: ID={id}]");
            }
            _ => eprintln!("\n[Success]"),
        }
        Ok(ExitCode::SUCCESS)
    } else {
        if envelope.errors.is_empty() {
            eprintln!("\n[Error]: request failed");
        }
        for error in &envelope.errors {
            match error.code {
                Some(code) => eprintln!("\n[Error {code}]: {}", error.message),
                None => eprintln!("\n[Error]: {}", error.message),
            }
        }
        Ok(ExitCode::FAILURE)
    }
}
