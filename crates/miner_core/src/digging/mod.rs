//! Terrain digging, placement and drone constraints.

pub mod controller;
pub mod csg;
pub mod drone;
pub mod terrain;

pub use controller::{DigEvent, DigMode, DiggingController, ResourceSink};
pub use csg::{Boundary, CsgNode, DigShape, Expr};
pub use drone::{Drone, DroneConstraint, DroneId, DroneSet, DroneType};
pub use terrain::{
    terrain_channel, MaterialFilter, MaterialIndex, MaterialRegistry, TerrainEngine,
    TerrainEvent, TerrainEventSender, TerrainModification, TerrainOp,
};
