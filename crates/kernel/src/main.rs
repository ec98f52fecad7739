//! Novarch Content Kernel
//!
//! Command-line driver for the document renderer and entry mapping.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use novarch_kernel::Config;
use novarch_kernel::content::{Document, QueryResponse, render_document};

#[derive(Debug, Parser)]
#[command(name = "novarch", version, about = "Render CMS rich documents to HTML")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a JSON block array into an HTML fragment.
    Render {
        /// Input file; reads stdin when omitted or "-".
        path: Option<PathBuf>,
    },
    /// Map a CMS query response (`{"result": ...}`) to public entries.
    Entries {
        /// Input file; reads stdin when omitted or "-".
        path: Option<PathBuf>,

        /// Treat `result` as a single entry instead of a list.
        #[arg(long)]
        single: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;
    init_tracing(&config);

    match cli.command {
        Command::Render { path } => {
            let input = read_input(path.as_deref())?;
            let document = Document::from_json_str(&input).context("failed to decode document")?;
            let html = render_document(&document);
            info!(blocks = document.len(), bytes = html.len(), "document rendered");
            write_output(&html)
        }
        Command::Entries { path, single } => {
            let input = read_input(path.as_deref())?;
            let response =
                QueryResponse::from_json_str(&input).context("failed to decode query response")?;
            if single {
                let entry = response.entry().context("failed to map entry")?;
                info!(found = entry.is_some(), "entry mapped");
                write_json(&entry, &config)
            } else {
                let entries = response.entries().context("failed to map entries")?;
                info!(count = entries.len(), "entries mapped");
                write_json(&entries, &config)
            }
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn write_json<T: Serialize>(value: &T, config: &Config) -> Result<()> {
    let json = if config.pretty_json {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize output")?;
    write_output(&json)
}

fn write_output(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("failed to write output")
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
