//! Inventory save data.
//!
//! Saves are bincode-encoded and stamped with [`SAVE_VERSION`]. A save
//! written by another version is rejected; callers fall back to a fresh
//! default inventory.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collection::{ItemCollection, ItemId, StoredItem};
use crate::config::GameplayConfig;
use crate::crafting::{CraftingBook, RuleRegistry};
use crate::error::{MinerError, Result};
use crate::inventory::{Inventory, QUICK_SLOT_COUNT};
use crate::item::Item;

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// One saved inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    /// Id within the inventory.
    pub id: u64,
    /// Quick-access slot, if any.
    pub quick_access: Option<usize>,
    /// The item.
    pub item: Item,
}

/// Complete inventory save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySave {
    /// Save format version. Must stay the first field.
    pub version: u32,
    /// Held items in collection order.
    pub items: Vec<SavedItem>,
    /// Selected quick-access slot.
    pub selected_slot: usize,
    /// Keys of discovered crafting rules.
    pub discovered_rules: Vec<String>,
}

impl InventorySave {
    /// Capture `inventory`.
    #[must_use]
    pub fn capture(inventory: &Inventory, registry: &RuleRegistry) -> Self {
        let items = inventory
            .items()
            .iter()
            .map(|entry| SavedItem {
                id: entry.id.0,
                quick_access: inventory.quick_slot_of(entry.id),
                item: entry.item.clone(),
            })
            .collect();
        let discovered_rules = inventory
            .book()
            .discovered()
            .into_iter()
            .filter_map(|id| registry.get(id).map(|rule| rule.key()))
            .collect();
        Self {
            version: SAVE_VERSION,
            items,
            selected_slot: inventory.selected_slot(),
            discovered_rules,
        }
    }

    /// Rebuild the inventory.
    ///
    /// Discovered rules that no longer exist are skipped. Two entries with
    /// the same id make the save invalid.
    pub fn restore(self, registry: &RuleRegistry) -> Result<Inventory> {
        if self.version != SAVE_VERSION {
            return Err(MinerError::SaveVersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        if self.selected_slot >= QUICK_SLOT_COUNT {
            return Err(MinerError::InvalidQuickSlot(self.selected_slot));
        }

        let mut quick_slots = [None; QUICK_SLOT_COUNT];
        let mut stored = Vec::with_capacity(self.items.len());
        let mut seen = HashSet::with_capacity(self.items.len());
        for saved in self.items {
            let id = ItemId(saved.id);
            if !seen.insert(id) {
                return Err(MinerError::SaveData(format!("Duplicate item id {id}")));
            }
            if let Some(slot) = saved.quick_access {
                let entry = quick_slots
                    .get_mut(slot)
                    .ok_or(MinerError::InvalidQuickSlot(slot))?;
                *entry = Some(id);
            }
            stored.push(StoredItem {
                id,
                item: saved.item,
            });
        }
        let items = ItemCollection::from_stored(stored);
        for slot in &mut quick_slots {
            if slot.is_some_and(|id| items.item_by_id(id).is_none()) {
                *slot = None;
            }
        }

        let mut book = CraftingBook::new();
        for key in &self.discovered_rules {
            match registry.by_key(key) {
                Some(id) => {
                    book.discover(id);
                }
                None => tracing::debug!(rule = %key, "Skipping unknown discovered rule"),
            }
        }

        Ok(Inventory::from_parts(items, quick_slots, self.selected_slot, book))
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| MinerError::SaveData(format!("Failed to serialize inventory: {e}")))
    }

    /// Decode from bincode, checking the version first.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let version: u32 = bincode::deserialize(bytes)
            .map_err(|e| MinerError::SaveData(format!("Failed to read save version: {e}")))?;
        if version != SAVE_VERSION {
            tracing::warn!(expected = SAVE_VERSION, found = version, "Save version mismatch");
            return Err(MinerError::SaveVersionMismatch {
                expected: SAVE_VERSION,
                found: version,
            });
        }
        bincode::deserialize(bytes)
            .map_err(|e| MinerError::SaveData(format!("Failed to deserialize inventory: {e}")))
    }

    /// Save to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)
            .map_err(|e| MinerError::SaveData(format!("Failed to write save file: {e}")))
    }

    /// Load from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| MinerError::SaveData(format!("Failed to read save file: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl Inventory {
    /// Restore an inventory from save bytes, or build the default
    /// inventory if the save is missing, unreadable or from another
    /// version.
    pub fn restore_or_default(
        bytes: Option<&[u8]>,
        registry: &RuleRegistry,
        config: &GameplayConfig,
    ) -> Result<Self> {
        let restored = bytes.map(|bytes| {
            InventorySave::from_bytes(bytes).and_then(|save| save.restore(registry))
        });
        match restored {
            Some(Ok(inventory)) => Ok(inventory),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Discarding saved inventory");
                Self::default_inventory(config)
            }
            None => Self::default_inventory(config),
        }
    }
}
