//! CLI for `onein-openapi`.
//!
//! ```text
//! # ./openapi.yaml + ./onein.yaml → ./openapi.onein.json
//! onein-openapi
//!
//! # directory input: <dir>/openapi.yaml + <dir>/onein.yaml
//! onein-openapi api
//!
//! # file input with explicit config and output directory
//! onein-openapi api/petstore.yaml --config api/onein.yaml --out-dir target
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use onein_openapi::{Invocation, DEFAULT_CONFIG_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Convert an `OpenAPI` 3 document into the onein dialect.
#[derive(Parser, Debug)]
#[command(name = "onein-openapi", version, about)]
struct Cli {
    /// `OpenAPI` YAML/JSON file, or a directory containing `openapi.yaml`.
    #[arg(default_value = ".")]
    input: PathBuf,

    /// Config file. Relative paths are resolved against a directory input.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory the `<stem>.onein.json` output is written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Only log warnings and errors. Ignored when `RUST_LOG` is set.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet)?;

    let written = Invocation::new(&cli.input)
        .config(&cli.config)
        .out_dir(&cli.out_dir)
        .run()
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    println!("{}", written.display());
    Ok(())
}

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`.
fn init_logging(quiet: bool) -> anyhow::Result<()> {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("Failed to initialize logging")
}
