//! UpvoidMiner - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use miner_tools::validate::{load_rules, load_save, validate_data_directory};

#[derive(Parser)]
#[command(name = "miner-tools")]
#[command(about = "Development tools for UpvoidMiner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// List the rules of a crafting table
    Rules {
        /// Path to the crafting table
        #[arg(default_value = "assets/data/crafting.ron")]
        path: PathBuf,
    },
    /// Print the contents of an inventory save
    InspectSave {
        /// Path to the save file
        path: PathBuf,
    },
}

fn list_rules(path: &Path) -> Result<(), miner_tools::validate::DataLoadError> {
    let registry = load_rules(path)?;
    for (id, rule) in registry.iter() {
        let ingredients: Vec<String> = rule.ingredients().iter().map(ToString::to_string).collect();
        println!("{:>3}  {}  <-  {}", id.0, rule.result(), ingredients.join(" + "));
    }
    Ok(())
}

fn inspect_save(path: &Path) -> Result<(), miner_tools::validate::DataLoadError> {
    let save = load_save(path)?;
    println!("version {}, selected slot {}", save.version, save.selected_slot);
    for saved in &save.items {
        let slot = saved
            .quick_access
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("#{:<4} [{slot}] {}", saved.id, saved.item);
    }
    for key in &save.discovered_rules {
        println!("discovered: {key}");
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            validate_data_directory(&path).map(|report| {
                tracing::info!(
                    rules = report.rules,
                    starting_items = report.starting_items,
                    "Validation passed"
                );
            })
        }
        Commands::Rules { path } => list_rules(&path),
        Commands::InspectSave { path } => inspect_save(&path),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
