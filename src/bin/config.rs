//! Vault Config CLI
//!
//! View and manage artifact vault configuration.

use artifact_vault::VaultConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vault-config")]
#[command(about = "View and manage artifact vault configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "vault.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = VaultConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Artifact Vault Configuration\n");
                println!("Catalog:");
                println!("  Root: {:?}", cfg.catalog.root);
                println!("  Output: {:?}", cfg.catalog.output);
                println!("  Metadata file: {}", cfg.catalog.metadata_file);
                println!("  Renderable file: {}", cfg.catalog.renderable_file);
                println!("  Public prefix: {}", cfg.catalog.public_prefix);
                println!("  Follow links: {}", cfg.catalog.follow_links);
                println!("  Format: {:?}", cfg.catalog.output_format);

                println!("\nCategories:");
                for c in &cfg.categories.known {
                    println!("  - {}", c);
                }

                println!("\nDisplay:");
                println!("  Visible tags: {}", cfg.display.visible_tags);
            }
        }

        Commands::Init { output } => {
            let cfg = VaultConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => match VaultConfig::load_from(config.as_deref()) {
            Ok(cfg) => {
                println!("✅ Configuration is valid");
                println!("   Root: {:?}", cfg.catalog.root);
                println!("   Output: {:?}", cfg.catalog.output);
                println!("   Categories: {}", cfg.categories.known.len());
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
