//! Catalog Build CLI
//!
//! Rebuilds the catalog from the artifact root. Exits non-zero when any
//! record was skipped, after the best-effort catalog has been written.

use std::path::PathBuf;

use artifact_vault::{rebuild, OutputFormat, VaultConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vault-build")]
#[command(about = "Compile artifact metadata into catalog.json")]
struct Cli {
    /// Artifact root (overrides config)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Catalog output file (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file to load
    #[arg(short, long)]
    config: Option<String>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the build was clean
fn run(cli: Cli) -> anyhow::Result<bool> {
    let cfg = VaultConfig::load_from(cli.config.as_deref())?;
    let root = match cli.root {
        Some(root) => root,
        None => cfg.root_path()?,
    };
    let output = match cli.output {
        Some(output) => output,
        None => cfg.output_path()?,
    };
    let format = if cli.compact {
        OutputFormat::Compact
    } else {
        cfg.catalog.output_format
    };

    println!("🔍 Scanning for artifacts...");
    if !root.exists() {
        println!("⚠️ No artifacts directory found at {}", root.display());
    }

    let report = rebuild(&root, &output, &cfg.build_options(), format)?;

    println!(
        "✅ Generated catalog with {} artifacts at {}",
        report.catalog.len(),
        output.display()
    );

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        println!("\n⚠️ Warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }

    if report.has_failures() {
        eprintln!("\n❌ Errors found:");
        for error in report.failures() {
            eprintln!("  - {}", error);
        }
        return Ok(false);
    }

    Ok(true)
}
