//! Data validation utilities.

use std::path::Path;

use miner_core::config::GameplayConfig;
use miner_core::crafting::RuleRegistry;
use miner_core::data::RecipeTable;
use miner_core::error::MinerError;
use miner_core::persistence::InventorySave;
use thiserror::Error;

/// Crafting table file name inside a data directory.
pub const CRAFTING_FILE: &str = "crafting.ron";

/// Gameplay config file name inside a data directory.
pub const GAMEPLAY_FILE: &str = "gameplay.ron";

/// Errors that can occur while loading data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Failed to read file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// File contents rejected by the gameplay core.
    #[error("Invalid data in '{path}': {source}")]
    InvalidData {
        /// Path to the file.
        path: String,
        /// Underlying error.
        #[source]
        source: MinerError,
    },
}

/// Result type for data loading operations.
pub type DataLoadResult<T> = Result<T, DataLoadError>;

/// Summary of a validated data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of crafting rules.
    pub rules: usize,
    /// Number of starting items.
    pub starting_items: usize,
}

fn read(path: &Path) -> DataLoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| DataLoadError::IoError {
        path: path.display().to_string(),
        source,
    })
}

fn invalid(path: &Path) -> impl FnOnce(MinerError) -> DataLoadError + '_ {
    move |source| DataLoadError::InvalidData {
        path: path.display().to_string(),
        source,
    }
}

/// Load and check a crafting table file.
pub fn load_rules(path: &Path) -> DataLoadResult<RuleRegistry> {
    let text = read(path)?;
    let name = path.display().to_string();
    RecipeTable::from_ron_str(&name, &text)
        .and_then(|table| RuleRegistry::from_table(&table))
        .map_err(invalid(path))
}

/// Load and check a gameplay config file.
pub fn load_config(path: &Path) -> DataLoadResult<GameplayConfig> {
    let text = read(path)?;
    GameplayConfig::from_ron_str(&path.display().to_string(), &text).map_err(invalid(path))
}

/// Load a save file.
pub fn load_save(path: &Path) -> DataLoadResult<InventorySave> {
    InventorySave::load(path).map_err(invalid(path))
}

/// Validate all RON data files in a directory.
///
/// # Errors
///
/// Returns an error if any data file fails validation.
pub fn validate_data_directory(path: &Path) -> DataLoadResult<ValidationReport> {
    let registry = load_rules(&path.join(CRAFTING_FILE))?;
    tracing::info!(rules = registry.len(), "Crafting table is valid");

    let config = load_config(&path.join(GAMEPLAY_FILE))?;
    tracing::info!(
        starting_items = config.starting_items.len(),
        "Gameplay config is valid"
    );

    Ok(ValidationReport {
        rules: registry.len(),
        starting_items: config.starting_items.len(),
    })
}
