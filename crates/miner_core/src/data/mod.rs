//! Data structures for gameplay content.
//!
//! This module contains pure data structures describing items, crafting
//! rules and gameplay tuning. All structs are designed to be deserialized
//! from RON. Tables are parsed from strings; reading files is left to
//! the caller.

mod item_data;
mod recipe_data;

pub use item_data::ItemData;
pub use recipe_data::{ExplicitRuleData, MaterialRuleData, RecipeTable};

/// Parse a RON document, naming `source_name` in errors.
pub(crate) fn parse_ron<T: serde::de::DeserializeOwned>(
    source_name: &str,
    text: &str,
) -> crate::Result<T> {
    ron::from_str(text).map_err(|e| crate::MinerError::DataParseError {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}
