//! # Miner Core
//!
//! Gameplay core of a voxel mining game: items, inventories, crafting and
//! digging.
//!
//! This crate contains **only** gameplay logic:
//! - No rendering
//! - No terrain storage (terrain is behind the [`digging::TerrainEngine`] trait)
//! - No physics (ray queries arrive as [`actions::RayHit`] values)
//!
//! ## Crate Structure
//!
//! - [`substance`] - Material kinds and their taxonomy
//! - [`item`] - The item sum type and its merge protocol
//! - [`collection`] - Ordered, self-stacking item container
//! - [`crafting`] - Crafting rules, rule registry and discovery
//! - [`inventory`] - Player inventory with quick-access slots
//! - [`digging`] - CSG shapes, drones and the terrain boundary
//! - [`miner`] - Player facade tying it all together
//! - [`data`] - RON data tables

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod collection;
pub mod config;
pub mod crafting;
pub mod data;
pub mod digging;
pub mod error;
pub mod inventory;
pub mod item;
pub mod miner;
pub mod persistence;
pub mod substance;

pub use error::{MinerError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{plan_use, ItemUse, RayHit};
    pub use crate::collection::{CollectionEvent, ItemCollection, ItemId, StoredItem};
    pub use crate::config::{DiggingConfig, DroneConfig, GameplayConfig};
    pub use crate::crafting::{
        CraftingBook, CraftingRule, ExplicitRule, MaterialRule, RuleId, RuleRegistry,
    };
    pub use crate::data::{ItemData, RecipeTable};
    pub use crate::digging::{
        Boundary, CsgNode, DigEvent, DigMode, DigShape, DiggingController, DroneId, DroneSet,
        DroneType, MaterialFilter, MaterialIndex, ResourceSink, TerrainEngine, TerrainEvent,
        TerrainModification, TerrainOp,
    };
    pub use crate::error::{MinerError, Result};
    pub use crate::inventory::{Inventory, ItemView, RuleView, QUICK_SLOT_COUNT};
    pub use crate::item::{
        CraftingItemType, Item, ItemCategory, MaterialShape, MergeOp, Quantity, ToolType,
    };
    pub use crate::miner::{Miner, MinerEvent};
    pub use crate::persistence::{InventorySave, SavedItem, SAVE_VERSION};
    pub use crate::substance::{Substance, SubstanceCategory};
}
