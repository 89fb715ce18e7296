//! Digging and placement against the terrain engine.
//!
//! The controller composes dig shapes with the drone constraints, submits
//! the result to the terrain engine, and turns the engine's reports into
//! resource changes and particle spawns.

use std::sync::mpsc::Receiver;

use glam::Vec3;

use super::csg::{Boundary, CsgNode, DigShape};
use super::drone::DroneSet;
use super::terrain::{
    terrain_channel, MaterialFilter, MaterialRegistry, TerrainEngine, TerrainEvent,
    TerrainEventSender, TerrainModification, TerrainOp,
};
use crate::substance::Substance;

/// Receives resource volume changes caused by terrain modifications.
pub trait ResourceSink {
    /// Change the held volume of `substance` by `volume`. Negative volumes
    /// remove.
    fn add_resource(&mut self, substance: Substance, volume: f32);
}

/// What a dig does to the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigMode {
    /// Remove terrain matching the filter.
    Subtract {
        /// Materials that may be removed.
        filter: MaterialFilter,
    },
    /// Fill with a substance.
    Add {
        /// Substance to place.
        substance: Substance,
        /// Whether the placed volume is charged to the resource sink.
        charge_resources: bool,
    },
}

/// Gameplay reaction to a terrain report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DigEvent {
    /// A solid sample point became air.
    SpawnParticle {
        /// Where.
        position: Vec3,
        /// Substance that was dug out.
        substance: Substance,
    },
    /// A resource volume was applied to the sink.
    ResourceChanged {
        /// Substance.
        substance: Substance,
        /// Applied volume change.
        volume: f32,
    },
}

/// Digging state of one player.
#[derive(Debug)]
pub struct DiggingController {
    materials: MaterialRegistry,
    drones: DroneSet,
    sender: TerrainEventSender,
    receiver: Receiver<TerrainEvent>,
}

impl DiggingController {
    /// Register terrain materials with `engine` and create a controller
    /// without drones.
    pub fn new(engine: &mut impl TerrainEngine) -> Self {
        let (sender, receiver) = terrain_channel();
        Self {
            materials: MaterialRegistry::register_all(engine),
            drones: DroneSet::new(),
            sender,
            receiver,
        }
    }

    /// Sender the terrain engine reports through.
    #[must_use]
    pub fn event_sender(&self) -> TerrainEventSender {
        self.sender.clone()
    }

    /// Registered terrain materials.
    #[must_use]
    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Placed drones.
    #[must_use]
    pub fn drones(&self) -> &DroneSet {
        &self.drones
    }

    /// Placed drones, for placement and removal.
    pub fn drones_mut(&mut self) -> &mut DroneSet {
        &mut self.drones
    }

    /// Build the modification for `shape`, cut by every drone constraint
    /// as seen from the boundary centre.
    ///
    /// Returns `None` when placing a substance that has no terrain
    /// material.
    #[must_use]
    pub fn build_modification(
        &self,
        shape: CsgNode,
        boundary: Boundary,
        mode: DigMode,
    ) -> Option<TerrainModification> {
        let shape = match self.drones.constraint_volume(boundary.center) {
            Some(constraints) => CsgNode::Diff {
                base: Box::new(shape),
                subtract: vec![constraints],
            },
            None => shape,
        };

        let modification = match mode {
            DigMode::Subtract { filter } => TerrainModification {
                op: TerrainOp::Diff,
                shape,
                material_filter: match filter {
                    MaterialFilter::All => Vec::new(),
                    only => self.materials.filter_indices(only),
                },
                report_stats: true,
                report_points: true,
            },
            DigMode::Add {
                substance,
                charge_resources,
            } => TerrainModification {
                op: TerrainOp::Union {
                    material: self.materials.index(substance)?,
                },
                shape,
                material_filter: Vec::new(),
                report_stats: charge_resources,
                report_points: false,
            },
        };
        Some(modification)
    }

    /// Submit a modification to the engine. Returns `false` if nothing
    /// could be submitted.
    pub fn dig(
        &self,
        engine: &mut impl TerrainEngine,
        shape: CsgNode,
        boundary: Boundary,
        mode: DigMode,
    ) -> bool {
        let Some(modification) = self.build_modification(shape, boundary, mode) else {
            tracing::warn!(?mode, "No terrain material for placement");
            return false;
        };
        tracing::debug!(
            ?mode,
            center = ?boundary.center,
            radius = boundary.radius,
            constrained = matches!(modification.shape, CsgNode::Diff { .. }),
            "Submitting terrain modification"
        );
        engine.modify_terrain(boundary, modification);
        true
    }

    /// [`DiggingController::dig`] with a primitive shape.
    pub fn dig_shape(
        &self,
        engine: &mut impl TerrainEngine,
        shape: DigShape,
        mode: DigMode,
    ) -> bool {
        self.dig(engine, shape.expression().into(), shape.boundary(), mode)
    }

    /// Apply every pending terrain report in delivery order.
    ///
    /// Volume reports change `sink` by the negated terrain volume change.
    /// Reports about air or unknown materials are skipped.
    pub fn process_events(&self, sink: &mut impl ResourceSink) -> Vec<DigEvent> {
        let mut events = Vec::new();
        for event in self.receiver.try_iter() {
            match event {
                TerrainEvent::ChunkStat {
                    material,
                    changed_volume,
                    ..
                } => {
                    if material.is_air() {
                        continue;
                    }
                    let Some(substance) = self.materials.substance(material) else {
                        tracing::warn!(index = material.0, "Volume report for unknown material");
                        continue;
                    };
                    let volume = -changed_volume;
                    sink.add_resource(substance, volume);
                    events.push(DigEvent::ResourceChanged { substance, volume });
                }
                TerrainEvent::PointChanged {
                    position,
                    before,
                    after,
                    ..
                } => {
                    if before.is_air() || !after.is_air() {
                        continue;
                    }
                    if let Some(substance) = self.materials.substance(before) {
                        events.push(DigEvent::SpawnParticle {
                            position,
                            substance,
                        });
                    }
                }
            }
        }
        events
    }
}
