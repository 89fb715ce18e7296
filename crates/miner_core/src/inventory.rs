//! Player inventory.
//!
//! Wraps an [`ItemCollection`] with a table of quick-access slots, the
//! selected slot and the player's [`CraftingBook`]. New items are assigned
//! to the first free slot; removed items release theirs. Slot upkeep is
//! driven by the collection's change events, so every mutation path keeps
//! the table consistent.

use crate::collection::{CollectionEvent, ItemCollection, ItemId, StoredItem};
use crate::config::GameplayConfig;
use crate::crafting::{CraftingBook, RuleId, RuleRegistry};
use crate::digging::ResourceSink;
use crate::error::{MinerError, Result};
use crate::item::{Item, ItemCategory};
use crate::substance::Substance;

/// Number of quick-access slots.
pub const QUICK_SLOT_COUNT: usize = 10;

/// Read-only projection of an item for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    /// Item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Icon layers.
    pub icon: String,
    /// Quantity text.
    pub stack_description: String,
    /// Display category.
    pub category: ItemCategory,
    /// Quick-access slot holding the item.
    pub quick_slot: Option<usize>,
    /// Whether another unit could be crafted now.
    pub craftable: bool,
}

/// Read-only projection of a crafting rule for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleView {
    /// Rule id.
    pub id: RuleId,
    /// Name of the result.
    pub name: String,
    /// Icon of the result.
    pub icon: String,
    /// Whether the rule can be crafted now.
    pub craftable: bool,
    /// Whether the rule was crafted before.
    pub discovered: bool,
}

/// A player's items.
#[derive(Debug, Clone)]
pub struct Inventory {
    items: ItemCollection,
    quick_slots: [Option<ItemId>; QUICK_SLOT_COUNT],
    selected_slot: usize,
    book: CraftingBook,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: ItemCollection::new(),
            quick_slots: [None; QUICK_SLOT_COUNT],
            selected_slot: 0,
            book: CraftingBook::new(),
        }
    }

    /// Inventory holding the configured starting items.
    pub fn default_inventory(config: &GameplayConfig) -> Result<Self> {
        let mut inventory = Self::new();
        for item in config.starting_items()? {
            inventory.add_item(item);
        }
        tracing::debug!(items = inventory.items.len(), "Created default inventory");
        Ok(inventory)
    }

    pub(crate) fn from_parts(
        items: ItemCollection,
        quick_slots: [Option<ItemId>; QUICK_SLOT_COUNT],
        selected_slot: usize,
        book: CraftingBook,
    ) -> Self {
        Self {
            items,
            quick_slots,
            selected_slot,
            book,
        }
    }

    /// Held items.
    #[must_use]
    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    /// Discovery state.
    #[must_use]
    pub fn book(&self) -> &CraftingBook {
        &self.book
    }

    /// Item in a quick-access slot.
    #[must_use]
    pub fn quick_slot(&self, slot: usize) -> Option<ItemId> {
        self.quick_slots.get(slot).copied().flatten()
    }

    /// Slot holding `id`.
    #[must_use]
    pub fn quick_slot_of(&self, id: ItemId) -> Option<usize> {
        self.quick_slots.iter().position(|s| *s == Some(id))
    }

    /// Currently selected slot.
    #[must_use]
    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Select a quick-access slot.
    pub fn select_slot(&mut self, slot: usize) -> Result<()> {
        if slot >= QUICK_SLOT_COUNT {
            return Err(MinerError::InvalidQuickSlot(slot));
        }
        self.selected_slot = slot;
        Ok(())
    }

    /// Item in the selected slot.
    #[must_use]
    pub fn selected_item(&self) -> Option<&StoredItem> {
        self.quick_slot(self.selected_slot)
            .and_then(|id| self.items.item_by_id(id))
    }

    /// Put `id` into `slot`, moving it out of any other slot. Whatever
    /// occupied `slot` loses its slot.
    pub fn assign_quick_slot(&mut self, slot: usize, id: ItemId) -> Result<()> {
        if slot >= QUICK_SLOT_COUNT {
            return Err(MinerError::InvalidQuickSlot(slot));
        }
        if self.items.item_by_id(id).is_none() {
            return Err(MinerError::ItemNotFound(id.0));
        }
        if let Some(previous) = self.quick_slot_of(id) {
            self.quick_slots[previous] = None;
        }
        self.quick_slots[slot] = Some(id);
        Ok(())
    }

    /// Empty a quick-access slot.
    pub fn clear_quick_slot(&mut self, slot: usize) -> Result<()> {
        let entry = self
            .quick_slots
            .get_mut(slot)
            .ok_or(MinerError::InvalidQuickSlot(slot))?;
        *entry = None;
        Ok(())
    }

    /// Add an item. See [`ItemCollection::add_item`].
    pub fn add_item(&mut self, item: Item) -> bool {
        let appended = self.items.add_item(item);
        self.sync_quick_slots();
        appended
    }

    /// Remove an item. See [`ItemCollection::remove_item`].
    pub fn remove_item(&mut self, item: &Item, force: bool) -> bool {
        let removed = self.items.remove_item(item, force);
        self.sync_quick_slots();
        removed
    }

    /// Change the held volume of a resource. Positive volumes add, negative
    /// volumes force-remove, zero does nothing.
    pub fn add_resource(&mut self, substance: Substance, volume: f32) {
        if volume > 0.0 {
            self.add_item(Item::resource(substance, volume));
        } else if volume < 0.0 {
            self.remove_item(&Item::resource(substance, -volume), true);
        }
    }

    /// Craft `rule` if affordable. Returns `false` and changes nothing
    /// otherwise.
    pub fn craft(&mut self, registry: &RuleRegistry, rule: RuleId, reference: Option<&Item>) -> bool {
        let crafted = self.book.craft(registry, rule, reference, &mut self.items);
        self.sync_quick_slots();
        crafted
    }

    /// Dismantle one unit of `item` if a rule allows it and it is held.
    pub fn dismantle(&mut self, registry: &RuleRegistry, item: &Item) -> bool {
        let Some(rule) = registry.rule_for(item).and_then(|id| registry.get(id)) else {
            tracing::debug!(item = %item, "No rule dismantles item");
            return false;
        };
        if !rule.is_dismantlable(item, &self.items) {
            tracing::debug!(item = %item, "Item cannot be dismantled");
            return false;
        }
        rule.dismantle(item, &mut self.items);
        self.sync_quick_slots();
        true
    }

    /// Remove a droppable item and return what leaves the inventory: the
    /// whole entry, or a single unit.
    pub fn drop_item(&mut self, id: ItemId, whole_stack: bool) -> Option<Item> {
        let item = self.items.item_by_id(id)?.item.clone();
        if !item.is_droppable() {
            tracing::debug!(item = %item, "Item cannot be dropped");
            return None;
        }
        let dropped = if whole_stack || item.is_volume_item() {
            self.items.take(id)?
        } else {
            let single = item.single();
            if !self.items.remove_item(&single, false) {
                return None;
            }
            single
        };
        self.sync_quick_slots();
        tracing::debug!(item = %dropped, "Dropped item");
        Some(dropped)
    }

    /// Display projections of held items, sorted by identifier.
    #[must_use]
    pub fn item_views(&self, registry: &RuleRegistry) -> Vec<ItemView> {
        self.items
            .sorted()
            .into_iter()
            .map(|entry| ItemView {
                id: entry.id,
                name: entry.item.name(),
                icon: entry.item.icon(),
                stack_description: entry.item.stack_description(),
                category: entry.item.category(),
                quick_slot: self.quick_slot_of(entry.id),
                craftable: registry
                    .rule_for(&entry.item)
                    .and_then(|id| registry.get(id))
                    .is_some_and(|rule| rule.is_craftable(Some(&entry.item), &self.items)),
            })
            .collect()
    }

    /// Display projections of every rule.
    #[must_use]
    pub fn rule_views(&self, registry: &RuleRegistry) -> Vec<RuleView> {
        registry
            .iter()
            .map(|(id, rule)| {
                let result = rule.result();
                RuleView {
                    id,
                    name: result.name(),
                    icon: result.icon(),
                    craftable: rule.is_craftable(None, &self.items),
                    discovered: self.book.is_discovered(id),
                }
            })
            .collect()
    }

    fn sync_quick_slots(&mut self) {
        for event in self.items.drain_events() {
            match event {
                CollectionEvent::Added(id) => {
                    if let Some(free) = self.quick_slots.iter_mut().find(|s| s.is_none()) {
                        *free = Some(id);
                    }
                }
                CollectionEvent::Removed(id) => {
                    if let Some(slot) = self.quick_slot_of(id) {
                        self.quick_slots[slot] = None;
                    }
                }
                CollectionEvent::QuantityChanged(_) => {}
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn quick_slots(&self) -> &[Option<ItemId>; QUICK_SLOT_COUNT] {
        &self.quick_slots
    }
}

impl ResourceSink for Inventory {
    fn add_resource(&mut self, substance: Substance, volume: f32) {
        Inventory::add_resource(self, substance, volume);
    }
}
