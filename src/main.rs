//! regex-search-cli: minimal command-line front end for the search engine.
//!
//! Usage: `regex-search-cli <pattern> <path>`
//!
//! Runs one search with default configuration and prints
//! `path:line:col: text` per match to stdout. Exit code 0 on success, even
//! with zero matches; 1 only when the pattern fails to compile or the root
//! does not exist. No other flags are part of this surface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use regex_search_core::{search, EffectiveConfig, SearchHandle, SearchRequest};

#[derive(Parser)]
#[command(name = "regex-search-cli")]
#[command(about = "Recursive regex search over a local file tree")]
struct Cli {
    /// Regular expression to search for
    pattern: String,

    /// Root file or directory to search
    path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if !cli.path.exists() {
        eprintln!("{}: no such file or directory", cli.path.display());
        return ExitCode::FAILURE;
    }

    let request = SearchRequest::new(cli.pattern, vec![cli.path], EffectiveConfig::default());
    let bundle = search(request, SearchHandle::new()).await;

    if bundle.errors.iter().any(|e| e.contains("Invalid regex pattern")) {
        for error in &bundle.errors {
            eprintln!("{error}");
        }
        return ExitCode::FAILURE;
    }

    for record in &bundle.results {
        println!(
            "{}:{}:{}: {}",
            record.path.display(),
            record.line_number,
            record.match_start + 1,
            record.line
        );
    }

    for error in &bundle.errors {
        eprintln!("{error}");
    }

    ExitCode::SUCCESS
}
