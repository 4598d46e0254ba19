//! # minutes-extract
//!
//! Pulls the meeting notes out of one document and prints them. Content goes to
//! stdout and everything else to stderr, so the output can be piped.
//!
//! Exit codes: `0` on success (and for `--help` / `--version`), `1` on any
//! failure, including argument errors.

mod extract;

use clap::{error::ErrorKind, Parser};
use extract::Method;
use minutes::config::ExtractionConfig;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "minutes-extract", author, version, about, long_about = None)]
struct Cli {
    /// The id of the document to extract, with or without dashes
    document_id: String,
    /// Which extraction tier to use
    #[arg(long, value_enum, default_value_t = Method::Hybrid)]
    method: Method,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    dotenvy::dotenv().ok();
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging is unavailable");
    }

    match run(&cli).await {
        Ok(content) => {
            println!("{content}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = ExtractionConfig::load()?;
    let result = extract::extract(&config, &cli.document_id, cli.method).await?;
    if let Some(method) = result.method {
        info!("Extraction succeeded via {method}");
    }
    Ok(result.content.unwrap_or_default())
}
