/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Pandoc JSON filter: `pandoc talks.md --filter inject-talks -o talks.html`

use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pandoc_inject::{InjectConfig, Injector};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod demo;

#[derive(Parser, Debug)]
#[command(name = "inject-talks")]
#[command(version, about = "Inject a talks listing into a Pandoc JSON document", long_about = None)]
struct Args {
    /// Output format pandoc passes to filters (unused)
    target_format: Option<String>,

    /// TOML file with injector settings
    #[arg(short, long, env = "INJECT_TALKS_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // stdout carries the document, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inject_talks=info,pandoc_inject=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    tracing::debug!("target format: {:?}", args.target_format);

    let config = match &args.config {
        Some(path) => InjectConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => InjectConfig::default(),
    };
    let config = match config.kind {
        Some(_) => config,
        None => config.with_kind("inject-talk"),
    };

    let mut injector = Injector::with_pandoc(config, demo::selectors(), demo::formatters());
    let mut input = BufReader::new(io::stdin().lock());
    let mut output = BufWriter::new(io::stdout().lock());
    injector.filter_json(&mut input, &mut output)?;

    if injector.diagnostics().has_errors() {
        tracing::warn!(
            "finished with errors; affected markers were left empty:\n{}",
            injector.diagnostics().to_text().join("\n")
        );
    }
    Ok(())
}
