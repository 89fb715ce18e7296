//! Ordered item container with stacking semantics.
//!
//! An [`ItemCollection`] never holds two entries that would fold into one
//! another on add: [`ItemCollection::add_item`] merges into an existing
//! compatible entry before appending. Entries that become empty are
//! pruned. Every mutation queues a [`CollectionEvent`] for the owner to
//! pick up with [`ItemCollection::drain_events`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item::{Item, MergeOp};

/// Stable identifier of an item held in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An item together with the id the collection assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// Identifier, unique within the collection.
    pub id: ItemId,
    /// The item.
    pub item: Item,
}

/// Change notification queued by a collection mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A new entry was appended.
    Added(ItemId),
    /// An entry was removed.
    Removed(ItemId),
    /// The quantity of an entry changed.
    QuantityChanged(ItemId),
}

/// Ordered collection of items.
///
/// `Clone` is a deep copy; the clone is independent of the original.
#[derive(Debug, Clone)]
pub struct ItemCollection {
    items: Vec<StoredItem>,
    next_id: u64,
    events: Vec<CollectionEvent>,
}

impl Default for ItemCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    /// Rebuild a collection from previously stored entries, keeping their ids.
    ///
    /// Entries are inserted through [`ItemCollection::add_item`] semantics,
    /// so compatible duplicates are folded together and empty entries are
    /// dropped. No events are queued.
    #[must_use]
    pub fn from_stored(entries: impl IntoIterator<Item = StoredItem>) -> Self {
        let mut collection = Self::new();
        for entry in entries {
            if entry.item.is_empty() {
                continue;
            }
            if let Some(existing) = collection
                .items
                .iter_mut()
                .find(|e| e.item.can_merge(&entry.item, MergeOp::Add))
            {
                existing.item.try_merge(&entry.item, MergeOp::Add);
                continue;
            }
            collection.next_id = collection.next_id.max(entry.id.0 + 1);
            collection.items.push(entry);
        }
        collection
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StoredItem> {
        self.items.iter()
    }

    /// Entries sorted by item identifier, for display.
    #[must_use]
    pub fn sorted(&self) -> Vec<&StoredItem> {
        let mut sorted: Vec<&StoredItem> = self.items.iter().collect();
        sorted.sort_by_cached_key(|e| (e.item.identifier(), e.id));
        sorted
    }

    /// Total weight of all entries in kg.
    #[must_use]
    pub fn total_weight(&self) -> f32 {
        self.items.iter().map(|e| e.item.weight()).sum()
    }

    /// Add an item, folding it into the first compatible entry.
    ///
    /// Returns `true` if the item was appended as a new entry and `false`
    /// if it was merged into an existing one. An empty item still merges
    /// its quantity into a compatible entry but is never appended.
    pub fn add_item(&mut self, item: Item) -> bool {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|e| e.item.can_merge(&item, MergeOp::Add))
        {
            existing.item.try_merge(&item, MergeOp::Add);
            tracing::trace!(id = %existing.id, item = %existing.item, "Merged item");
            self.events.push(CollectionEvent::QuantityChanged(existing.id));
            return false;
        }

        if item.is_empty() {
            tracing::trace!(item = %item.name(), "Ignoring empty item");
            return false;
        }

        let id = ItemId(self.next_id);
        self.next_id += 1;
        tracing::trace!(%id, item = %item, "Appended item");
        self.items.push(StoredItem { id, item });
        self.events.push(CollectionEvent::Added(id));
        #[cfg(feature = "debug-validation")]
        self.validate();
        true
    }

    /// Remove the quantity of `item` from the first entry sharing its
    /// identity.
    ///
    /// Without `force`, fails and leaves the collection untouched if no
    /// such entry exists or it holds too little. With `force` the removal
    /// always reports success; an entry that ends up empty is pruned.
    pub fn remove_item(&mut self, item: &Item, force: bool) -> bool {
        let op = if force {
            MergeOp::ForceSubtract
        } else {
            MergeOp::Subtract
        };

        let Some(index) = self.items.iter().position(|e| e.item.same_identity(item)) else {
            if force {
                tracing::debug!(item = %item, "Forced removal of an item that is not held");
            }
            return force;
        };

        let entry = &mut self.items[index];
        if !entry.item.try_merge(item, op) {
            return false;
        }

        let id = entry.id;
        if entry.item.is_empty() {
            self.items.remove(index);
            tracing::trace!(%id, "Pruned empty item");
            self.events.push(CollectionEvent::Removed(id));
        } else {
            self.events.push(CollectionEvent::QuantityChanged(id));
        }
        #[cfg(feature = "debug-validation")]
        self.validate();
        true
    }

    /// Whether [`ItemCollection::remove_item`] without `force` would succeed.
    #[must_use]
    pub fn contains_item(&self, item: &Item) -> bool {
        self.items
            .iter()
            .find(|e| e.item.same_identity(item))
            .is_some_and(|e| e.item.can_merge(item, MergeOp::Subtract))
    }

    /// Remove a whole entry by id.
    pub fn take(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|e| e.id == id)?;
        let entry = self.items.remove(index);
        self.events.push(CollectionEvent::Removed(id));
        Some(entry.item)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn item_by_id(&self, id: ItemId) -> Option<&StoredItem> {
        self.items.iter().find(|e| e.id == id)
    }

    /// Look up the first entry with the given identifier.
    #[must_use]
    pub fn item_by_identifier(&self, identifier: &str) -> Option<&StoredItem> {
        self.items.iter().find(|e| e.item.identifier() == identifier)
    }

    /// Take all queued change notifications in the order they happened.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(feature = "debug-validation")]
    fn validate(&self) {
        for (index, entry) in self.items.iter().enumerate() {
            assert!(!entry.item.is_empty(), "collection holds empty item {}", entry.id);
            for other in &self.items[index + 1..] {
                assert!(
                    !entry.item.can_merge(&other.item, MergeOp::Add),
                    "collection holds stackable duplicates {} and {}",
                    entry.id,
                    other.id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Quantity, ToolType, VOLUME_EPSILON};
    use crate::substance::Substance;

    fn iron(volume: f32) -> Item {
        Item::resource(Substance::Iron, volume)
    }

    #[test]
    fn test_add_appends_then_merges() {
        let mut items = ItemCollection::new();
        assert!(items.add_item(iron(1.0)));
        assert!(!items.add_item(iron(2.0)));
        assert_eq!(items.len(), 1);

        let entry = items.iter().next().unwrap();
        assert_eq!(entry.item.quantity(), Quantity::Volume(3.0));
        let entry_id = entry.id;

        let events = items.drain_events();
        assert_eq!(
            events,
            vec![
                CollectionEvent::Added(entry_id),
                CollectionEvent::QuantityChanged(entry_id)
            ]
        );
        assert!(items.drain_events().is_empty());
    }

    #[test]
    fn test_add_remove_round_trip() {
        let mut items = ItemCollection::new();
        let pickaxe = Item::tool(ToolType::Pickaxe, Substance::Iron);

        assert!(items.add_item(pickaxe.clone()));
        assert!(items.remove_item(&pickaxe.clone(), false));
        assert!(items.is_empty());

        items.add_item(iron(5.0));
        items.add_item(iron(1.0));
        assert!(items.remove_item(&iron(1.0), false));
        assert_eq!(
            items.iter().next().unwrap().item.quantity(),
            Quantity::Volume(5.0)
        );
    }

    #[test]
    fn test_remove_insufficient_fails_without_mutation() {
        let mut items = ItemCollection::new();
        items.add_item(iron(1.0));
        items.drain_events();

        assert!(!items.remove_item(&iron(2.0), false));
        assert!(!items.remove_item(&Item::torch(1), false));
        assert_eq!(
            items.iter().next().unwrap().item.quantity(),
            Quantity::Volume(1.0)
        );
        assert!(items.drain_events().is_empty());
    }

    #[test]
    fn test_forced_remove_prunes() {
        let mut items = ItemCollection::new();
        items.add_item(iron(1.0));
        let id = items.iter().next().unwrap().id;
        items.drain_events();

        assert!(items.remove_item(&iron(3.0), true));
        assert!(items.is_empty());
        assert_eq!(items.drain_events(), vec![CollectionEvent::Removed(id)]);

        assert!(items.remove_item(&iron(1.0), true));
    }

    #[test]
    fn test_contains_is_dry_run() {
        let mut items = ItemCollection::new();
        items.add_item(iron(2.0));
        items.drain_events();

        assert!(items.contains_item(&iron(2.0)));
        assert!(!items.contains_item(&iron(2.5)));
        assert!(items.drain_events().is_empty());
        assert!(items.remove_item(&iron(2.0), false));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut items = ItemCollection::new();
        items.add_item(iron(2.0));
        let mut copy = items.clone();
        copy.remove_item(&iron(2.0), false);

        assert!(copy.is_empty());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_lookup() {
        let mut items = ItemCollection::new();
        items.add_item(Item::torch(2));
        items.add_item(iron(1.0));

        let torch = items.item_by_identifier(&Item::torch(1).identifier()).unwrap();
        assert_eq!(items.item_by_id(torch.id).unwrap().item, Item::torch(2));
        assert!(items.item_by_id(ItemId(999)).is_none());
    }

    #[test]
    fn test_recipes_do_not_stack() {
        let recipe = Item::recipe(iron(1.0), vec![iron(1.0)], false);
        let mut items = ItemCollection::new();
        assert!(items.add_item(recipe.clone()));
        assert!(items.add_item(recipe.clone()));
        assert_eq!(items.len(), 2);
        assert!(items.remove_item(&recipe, false));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_empty_items_are_ignored() {
        let mut items = ItemCollection::new();
        assert!(!items.add_item(iron(0.0)));
        assert!(items.is_empty());
    }

    #[test]
    fn test_tiny_volume_merges_into_existing() {
        let mut items = ItemCollection::new();
        items.add_item(iron(1.0));
        assert!(!items.add_item(iron(VOLUME_EPSILON / 2.0)));
        assert_eq!(items.len(), 1);
        assert_eq!(
            items.iter().next().unwrap().item.quantity(),
            Quantity::Volume(1.0 + VOLUME_EPSILON / 2.0)
        );
    }

    #[test]
    fn test_from_stored_keeps_ids() {
        let items = ItemCollection::from_stored(vec![
            StoredItem {
                id: ItemId(7),
                item: iron(1.0),
            },
            StoredItem {
                id: ItemId(3),
                item: Item::torch(2),
            },
        ]);
        assert!(items.item_by_id(ItemId(7)).is_some());

        let mut items = items;
        items.add_item(Item::pipette());
        assert!(items.item_by_id(ItemId(8)).is_some());
    }

    #[test]
    fn test_sorted_by_identifier() {
        let mut items = ItemCollection::new();
        items.add_item(Item::torch(1));
        items.add_item(iron(1.0));
        items.add_item(Item::tool(ToolType::Shovel, Substance::Copper));

        let names: Vec<String> = items.sorted().iter().map(|e| e.item.name()).collect();
        assert_eq!(names, vec!["Copper Shovel", "Iron", "Torch"]);
    }
}
