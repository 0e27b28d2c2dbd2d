//! Catalog Query CLI
//!
//! Filters a compiled catalog the way the browsing UI does.

use std::path::PathBuf;

use artifact_vault::{Catalog, Query, TagStats, VaultConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vault-query")]
#[command(about = "Search and filter a compiled artifact catalog")]
struct Cli {
    /// Catalog file (defaults to the configured output)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Config file to load
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List artifacts matching every given filter
    Search {
        /// Case-insensitive text found in title or description
        #[arg(short, long, default_value = "")]
        text: String,

        /// Exact category (`function`)
        #[arg(short = 'f', long)]
        category: Option<String>,

        /// Required tag; repeat to require several
        #[arg(short = 'g', long = "tag")]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tags ranked by how many artifacts carry them
    Tags {
        /// Show every tag instead of the first few
        #[arg(long)]
        all: bool,

        /// Only tags containing this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show configured and cataloged categories
    Categories,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = VaultConfig::load_from(cli.config.as_deref())?;
    let path = match cli.catalog {
        Some(path) => path,
        None => cfg.output_path()?,
    };
    let catalog = Catalog::load(&path)?;

    match cli.command {
        Commands::Search {
            text,
            category,
            tags,
            json,
        } => {
            let mut query = Query::new().search(text).tags(tags);
            query.category = category;

            let view = catalog.query(&query);

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            let n = view.entries.len();
            println!("📚 {} result{}", n, if n == 1 { "" } else { "s" });
            for entry in &view.entries {
                println!();
                println!("  {} [{}] {}", entry.meta.title, entry.meta.function, entry.meta.created_at);
                println!("    {}", entry.meta.description);
                if !entry.meta.tags.is_empty() {
                    println!("    tags: {}", entry.meta.tags.join(", "));
                }
                println!("    {}", entry.path);
            }

            print_tags(&view.tags, cfg.display.visible_tags, false, "");
        }

        Commands::Tags { all, search } => {
            print_tags(&TagStats::compute(&catalog), cfg.display.visible_tags, all, &search);
        }

        Commands::Categories => {
            println!("📋 Categories");
            for known in &cfg.categories.known {
                let count = catalog.iter().filter(|e| &e.meta.function == known).count();
                println!("  {} ({})", known, count);
            }
            let unknown: Vec<_> = catalog
                .categories()
                .into_iter()
                .filter(|c| !cfg.is_known_category(c))
                .collect();
            if !unknown.is_empty() {
                println!("\n⚠️ Not configured: {}", unknown.join(", "));
            }
        }
    }

    Ok(())
}

fn print_tags(stats: &TagStats, limit: usize, show_all: bool, search: &str) {
    let visible = stats.visible(limit, show_all, search);
    println!("\n🏷️ Tags");
    if visible.is_empty() {
        println!("  No tags found");
        return;
    }
    for tag in &visible {
        println!("  {} ({})", tag.tag, tag.count);
    }
    if visible.len() < stats.ranked.len() && search.is_empty() && !show_all {
        println!("  … {} more (use --all)", stats.ranked.len() - visible.len());
    }
}
