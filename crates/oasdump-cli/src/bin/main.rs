//! oasdump CLI - generate a multi-file OpenAPI spec from captured traffic
//!
//! Reads a capture file (one JSON record per line), parameterizes the
//! observed paths, infers schemas from the observed bodies, and writes the
//! `$ref`-linked document tree under the output root. The tree is meant to
//! be flattened by an external bundler; every `$ref` is a relative file
//! path resolvable from its referencing file.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use oas_generator::Pipeline;
use oasdump_core::{DumpSettings, JsonlStore};

/// Generate a multi-file OpenAPI spec from captured HTTP traffic
#[derive(Parser, Debug)]
#[command(name = "oasdump")]
#[command(version)]
#[command(about = "Generate a multi-file OpenAPI spec from captured HTTP traffic")]
struct Args {
    /// Capture file, one JSON exchange record per line
    #[arg(long)]
    input: PathBuf,

    /// Output root directory for the document tree
    #[arg(long, env = "OASDUMP_OUT", default_value = "oas")]
    out: PathBuf,

    /// Spec info title
    #[arg(long, default_value = "Captured API")]
    title: String,

    /// Spec info description
    #[arg(long, default_value = "OpenAPI spec generated from captured traffic")]
    description: String,

    /// Spec info version
    #[arg(long, default_value = "0.0.1")]
    spec_version: String,

    /// Server URL for the spec servers block (repeatable)
    #[arg(long = "server")]
    servers: Vec<String>,

    /// Write schemas into components/schemas and $ref them instead of inlining
    #[arg(long)]
    externalize_schemas: bool,

    /// Remove the output root before generating. A previous aborted run
    /// leaves a partial tree that must not be trusted.
    #[arg(long)]
    clean: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.clean && args.out.exists() {
        info!("removing existing output root {}", args.out.display());
        std::fs::remove_dir_all(&args.out)?;
    } else if args.out.exists() {
        warn!(
            "output root {} already exists and will be overwritten in place",
            args.out.display()
        );
    }

    let store = JsonlStore::open(&args.input)
        .map_err(|e| format!("failed to open capture file {}: {}", args.input.display(), e))?;
    if store.is_empty() {
        warn!("no usable exchanges in {}", args.input.display());
    }

    let settings = DumpSettings {
        out_root: args.out,
        title: args.title,
        description: args.description,
        version: args.spec_version,
        server_urls: args.servers,
        externalize_schemas: args.externalize_schemas,
    };

    let report = Pipeline::new(&store, &settings).run().await?;

    info!(
        "done: {} exchanges seen, {} patterns written, {} deduped, {} endpoints",
        report.exchanges_seen,
        report.patterns_written,
        report.patterns_deduped,
        report.endpoints_written
    );
    println!(
        "spec written to {}/index.yml ({} endpoints)",
        settings.out_root.display(),
        report.endpoints_written
    );

    Ok(())
}
