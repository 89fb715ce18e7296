//! Error types for the gameplay core.
//!
//! Only recoverable failures live here. Expected refusals (not enough
//! resources, incompatible merges) are plain booleans, and broken caller
//! contracts such as crafting an uncraftable rule panic.

use thiserror::Error;

use crate::digging::drone::{DroneId, DroneType};

/// Result type alias using [`MinerError`].
pub type Result<T> = std::result::Result<T, MinerError>;

/// Top-level error type for the gameplay core.
#[derive(Debug, Error)]
pub enum MinerError {
    /// Data file parsing error.
    #[error("Failed to parse data '{source_name}': {message}")]
    DataParseError {
        /// Name of the data source that failed to parse.
        source_name: String,
        /// Error message.
        message: String,
    },

    /// Two crafting rules produce the same result.
    #[error("Duplicate crafting rule for result '{0}'")]
    DuplicateRule(String),

    /// A crafting rule without ingredients.
    #[error("Crafting rule for '{0}' has no ingredients")]
    EmptyIngredients(String),

    /// A data table entry that cannot describe a valid item.
    #[error("Invalid item definition: {0}")]
    InvalidItem(String),

    /// Placement of a drone type that has no constraint geometry.
    #[error("Drone type {0:?} is not supported")]
    UnsupportedDroneType(DroneType),

    /// Drone reference that no constraint knows about.
    #[error("Drone not found: {0}")]
    DroneNotFound(DroneId),

    /// Quick-access slot outside of the slot table.
    #[error("Invalid quick-access slot: {0}")]
    InvalidQuickSlot(usize),

    /// Item reference that the inventory does not hold.
    #[error("Item not found: {0}")]
    ItemNotFound(u64),

    /// Invalid gameplay configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Save data could not be encoded or decoded.
    #[error("Save data error: {0}")]
    SaveData(String),

    /// Save data written by an incompatible version.
    #[error("Save version mismatch: expected {expected}, got {found}")]
    SaveVersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version stamped in the save.
        found: u32,
    },
}
