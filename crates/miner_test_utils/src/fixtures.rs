//! Test fixtures and helpers.
//!
//! A terrain engine that records what it is asked to do, plus helpers for
//! building inventories and reading volumes back.

use glam::Vec3;
use miner_core::actions::RayHit;
use miner_core::collection::ItemCollection;
use miner_core::digging::{
    Boundary, MaterialIndex, TerrainEngine, TerrainEventSender, TerrainModification,
};
use miner_core::item::{Item, Quantity};
use miner_core::substance::Substance;

/// Terrain engine that hands out sequential material indices and records
/// every modification.
#[derive(Debug, Default)]
pub struct RecordingTerrain {
    /// Registered material names; index `i` was returned as `i + 1`.
    pub materials: Vec<String>,
    /// Submitted modifications in order.
    pub submitted: Vec<(Boundary, TerrainModification)>,
}

impl RecordingTerrain {
    /// Create an engine with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index returned for a material name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<MaterialIndex> {
        self.materials
            .iter()
            .position(|m| m == name)
            .and_then(|i| u32::try_from(i + 1).ok())
            .map(MaterialIndex)
    }

    /// Index returned for a substance.
    #[must_use]
    pub fn index_of_substance(&self, substance: Substance) -> Option<MaterialIndex> {
        self.index_of(&substance.terrain_material_name())
    }

    /// Last submitted modification.
    #[must_use]
    pub fn last(&self) -> Option<&TerrainModification> {
        self.submitted.last().map(|(_, m)| m)
    }
}

impl TerrainEngine for RecordingTerrain {
    fn register_material(&mut self, name: &str) -> MaterialIndex {
        self.materials.push(name.to_string());
        MaterialIndex(u32::try_from(self.materials.len()).unwrap_or(u32::MAX))
    }

    fn modify_terrain(&mut self, boundary: Boundary, modification: TerrainModification) {
        tracing::trace!(?boundary, "Recorded terrain modification");
        self.submitted.push((boundary, modification));
    }
}

/// Report that `volume` m³ of `substance` was dug out.
///
/// # Panics
///
/// Panics if the substance was never registered or the channel is closed.
pub fn report_dug(
    terrain: &RecordingTerrain,
    sender: &TerrainEventSender,
    substance: Substance,
    volume: f32,
) {
    let index = terrain
        .index_of_substance(substance)
        .expect("substance registered");
    sender
        .on_chunk_stat(index, -volume, 0)
        .expect("terrain channel open");
}

/// Ray hit on terrain at `position`, facing up.
#[must_use]
pub fn terrain_hit(position: Vec3, substance: Option<Substance>) -> RayHit {
    RayHit {
        position,
        normal: Vec3::Y,
        has_terrain_collision: true,
        substance,
    }
}

/// Collection holding the given resource volumes.
#[must_use]
pub fn resources(volumes: &[(Substance, f32)]) -> ItemCollection {
    let mut items = ItemCollection::new();
    for &(substance, volume) in volumes {
        items.add_item(Item::resource(substance, volume));
    }
    items.drain_events();
    items
}

/// Held volume of a resource, zero if none is held.
#[must_use]
pub fn resource_volume(items: &ItemCollection, substance: Substance) -> f32 {
    items
        .iter()
        .find(|e| e.item.same_identity(&Item::resource(substance, 0.0)))
        .map_or(0.0, |e| match e.item.quantity() {
            Quantity::Volume(v) => v,
            Quantity::Stack(_) => 0.0,
        })
}

/// Held stack size of an item, zero if none is held.
#[must_use]
pub fn stack_size(items: &ItemCollection, item: &Item) -> u32 {
    items
        .iter()
        .find(|e| e.item.same_identity(item))
        .map_or(0, |e| match e.item.quantity() {
            Quantity::Stack(n) => n,
            Quantity::Volume(_) => 0,
        })
}
