//! Boundary to the external terrain engine.
//!
//! The engine applies CSG modifications and reports what changed. Reports
//! arrive as [`TerrainEvent`] messages on a channel so the engine may
//! deliver them from any thread; the gameplay update loop drains them in
//! order.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, SendError, Sender};

use glam::Vec3;

use super::csg::{Boundary, CsgNode};
use crate::substance::{Substance, SubstanceCategory};

/// Index of a material registered with the terrain engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialIndex(pub u32);

impl MaterialIndex {
    /// Empty space.
    pub const AIR: Self = Self(0);

    /// Whether this is empty space.
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// Boolean operation applied to the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainOp {
    /// Remove terrain inside the shape.
    Diff,
    /// Fill the shape with a material.
    Union {
        /// Material to fill with.
        material: MaterialIndex,
    },
}

/// A modification submitted to the terrain engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainModification {
    /// Operation.
    pub op: TerrainOp,
    /// Region to modify.
    pub shape: CsgNode,
    /// Only materials in this list are affected; empty affects all.
    pub material_filter: Vec<MaterialIndex>,
    /// Whether to report per-material volume changes.
    pub report_stats: bool,
    /// Whether to report changed sample points.
    pub report_points: bool,
}

/// Terrain engine operations used by gameplay.
pub trait TerrainEngine {
    /// Register a material by name and return its index. Index 0 is
    /// reserved for air.
    fn register_material(&mut self, name: &str) -> MaterialIndex;

    /// Apply a modification within `boundary`. Results are reported through
    /// a [`TerrainEventSender`].
    fn modify_terrain(&mut self, boundary: Boundary, modification: TerrainModification);
}

/// Report from the terrain engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerrainEvent {
    /// Volume of a material changed by a modification.
    ChunkStat {
        /// Material.
        material: MaterialIndex,
        /// Change of terrain volume in m³; negative when removed.
        changed_volume: f32,
        /// Level of detail of the reporting chunk.
        lod: u32,
    },
    /// Material at a sample point changed.
    PointChanged {
        /// Sample position.
        position: Vec3,
        /// Material before.
        before: MaterialIndex,
        /// Material after.
        after: MaterialIndex,
        /// Level of detail of the reporting chunk.
        lod: u32,
    },
}

/// Sending half of the terrain report channel.
#[derive(Debug, Clone)]
pub struct TerrainEventSender(Sender<TerrainEvent>);

impl TerrainEventSender {
    /// Send a report.
    pub fn send(&self, event: TerrainEvent) -> Result<(), SendError<TerrainEvent>> {
        self.0.send(event)
    }

    /// Report a material volume change.
    pub fn on_chunk_stat(
        &self,
        material: MaterialIndex,
        changed_volume: f32,
        lod: u32,
    ) -> Result<(), SendError<TerrainEvent>> {
        self.send(TerrainEvent::ChunkStat {
            material,
            changed_volume,
            lod,
        })
    }

    /// Report a changed sample point.
    pub fn on_point_changed(
        &self,
        position: Vec3,
        before: MaterialIndex,
        after: MaterialIndex,
        lod: u32,
    ) -> Result<(), SendError<TerrainEvent>> {
        self.send(TerrainEvent::PointChanged {
            position,
            before,
            after,
            lod,
        })
    }
}

/// Create the terrain report channel.
#[must_use]
pub fn terrain_channel() -> (TerrainEventSender, Receiver<TerrainEvent>) {
    let (sender, receiver) = mpsc::channel();
    (TerrainEventSender(sender), receiver)
}

/// Mapping between substances and terrain material indices.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    by_index: HashMap<MaterialIndex, Substance>,
    by_substance: HashMap<Substance, MaterialIndex>,
}

impl MaterialRegistry {
    /// Register every substance with `engine`.
    pub fn register_all(engine: &mut impl TerrainEngine) -> Self {
        let mut registry = Self::default();
        for substance in Substance::ALL {
            let name = substance.terrain_material_name();
            let index = engine.register_material(&name);
            if index.is_air() {
                tracing::warn!(material = %name, "Terrain engine returned the air index");
                continue;
            }
            tracing::trace!(material = %name, index = index.0, "Registered terrain material");
            registry.by_index.insert(index, substance);
            registry.by_substance.insert(substance, index);
        }
        registry
    }

    /// Substance of a terrain material.
    #[must_use]
    pub fn substance(&self, index: MaterialIndex) -> Option<Substance> {
        self.by_index.get(&index).copied()
    }

    /// Terrain material of a substance.
    #[must_use]
    pub fn index(&self, substance: Substance) -> Option<MaterialIndex> {
        self.by_substance.get(&substance).copied()
    }

    /// Indices of every substance matched by `filter`, sorted.
    #[must_use]
    pub fn filter_indices(&self, filter: MaterialFilter) -> Vec<MaterialIndex> {
        let mut indices: Vec<MaterialIndex> = self
            .by_substance
            .iter()
            .filter(|(substance, _)| filter.matches(**substance))
            .map(|(_, index)| *index)
            .collect();
        indices.sort_unstable();
        indices
    }
}

/// Which substances a dig may remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialFilter {
    /// Everything.
    All,
    /// Only substances of the listed categories.
    Only(&'static [SubstanceCategory]),
}

impl MaterialFilter {
    /// Whether `substance` passes the filter.
    #[must_use]
    pub fn matches(self, substance: Substance) -> bool {
        match self {
            Self::All => true,
            Self::Only(categories) => categories.contains(&substance.category()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        names: Vec<String>,
    }

    impl TerrainEngine for Counter {
        fn register_material(&mut self, name: &str) -> MaterialIndex {
            self.names.push(name.to_string());
            MaterialIndex(u32::try_from(self.names.len()).unwrap())
        }

        fn modify_terrain(&mut self, _boundary: Boundary, _modification: TerrainModification) {}
    }

    #[test]
    fn test_register_all() {
        let mut engine = Counter::default();
        let registry = MaterialRegistry::register_all(&mut engine);
        assert_eq!(engine.names.len(), Substance::ALL.len());
        assert_eq!(registry.substance(MaterialIndex(1)), Some(Substance::Dirt));
        assert_eq!(registry.substance(MaterialIndex::AIR), None);
        assert_eq!(registry.index(Substance::Dirt), Some(MaterialIndex(1)));
    }

    #[test]
    fn test_filter_indices() {
        let mut engine = Counter::default();
        let registry = MaterialRegistry::register_all(&mut engine);
        let loose = registry.filter_indices(MaterialFilter::Only(&[SubstanceCategory::Loose]));
        assert_eq!(loose, vec![MaterialIndex(1), MaterialIndex(2)]);
        assert_eq!(
            registry.filter_indices(MaterialFilter::All).len(),
            Substance::ALL.len()
        );
    }

    #[test]
    fn test_channel_preserves_order() {
        let (sender, receiver) = terrain_channel();
        sender.on_chunk_stat(MaterialIndex(1), 1.0, 0).unwrap();
        sender
            .on_point_changed(Vec3::ZERO, MaterialIndex(1), MaterialIndex::AIR, 0)
            .unwrap();
        let events: Vec<TerrainEvent> = receiver.try_iter().collect();
        assert!(matches!(events[0], TerrainEvent::ChunkStat { .. }));
        assert!(matches!(events[1], TerrainEvent::PointChanged { .. }));
    }
}
