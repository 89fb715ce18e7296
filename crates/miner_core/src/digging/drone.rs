//! Drones and the constraint volumes they span.
//!
//! Drones are point markers placed in the world. Drones of the same type
//! form a [`DroneConstraint`]; consecutive pairs span walls that protect
//! the terrain behind them from digging and placement. Constraint geometry
//! is built from target positions, so a drone still flying to its spot
//! already constrains where it will end up.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::csg::{CsgNode, Expr};
use crate::config::DroneConfig;
use crate::error::{MinerError, Result};

/// Identifier of a placed drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DroneId(pub u64);

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drone#{}", self.0)
    }
}

/// Kind of constraint a drone participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneType {
    /// Open chain of vertical walls.
    Chain,
    /// Closed loop.
    Loop,
    /// Circle around a centre drone.
    Circular,
    /// Single plane.
    Plane,
}

impl DroneType {
    /// Whether constraint geometry exists for this type.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Chain)
    }
}

/// A placed drone.
#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    /// Identifier.
    pub id: DroneId,
    /// Constraint kind.
    pub drone_type: DroneType,
    /// Where the drone is flying to.
    pub target_position: Vec3,
    /// Where the drone is now.
    pub current_position: Vec3,
    /// Idle oscillation phase in radians.
    pub phase: f32,
}

impl Drone {
    fn new(id: DroneId, drone_type: DroneType, position: Vec3) -> Self {
        Self {
            id,
            drone_type,
            target_position: position,
            current_position: position,
            phase: 0.0,
        }
    }

    /// Move towards the target at the configured speed and advance the
    /// hover phase.
    pub fn update(&mut self, dt: f32, config: &DroneConfig) {
        let to_target = self.target_position - self.current_position;
        let step = config.speed * dt;
        if to_target.length() <= step {
            self.current_position = self.target_position;
        } else {
            self.current_position += to_target.normalize_or_zero() * step;
        }
        self.phase = (self.phase + TAU * config.hover_frequency * dt).rem_euclid(TAU);
    }

    /// Position including the hover offset.
    #[must_use]
    pub fn render_position(&self, config: &DroneConfig) -> Vec3 {
        self.current_position + Vec3::Y * (config.hover_amplitude * self.phase.sin())
    }

    /// Send the drone somewhere else.
    pub fn set_target(&mut self, target: Vec3) {
        self.target_position = target;
    }
}

/// Shadow normals closer to the wall normal than this are treated as
/// parallel.
const PARALLEL_LIMIT: f32 = 0.999;

/// Excluded region behind the wall between `a` and `b`, seen from
/// `reference`.
///
/// The wall plane passes through the midpoint of the pair and is oriented
/// so `reference` lies outside. A reference on the wall plane excludes the
/// side `(b - a) × Y` points to. Two shadow planes through `a` and `b` fan
/// out from `reference` and close the region sideways. When a shadow plane
/// degenerates, because `reference` is directly above or below a drone or
/// in line with the pair, it is replaced by a plane across the pair
/// direction through that drone. Returns `None` only for coincident or
/// vertically stacked drones.
#[must_use]
pub fn chain_segment(a: Vec3, b: Vec3, reference: Vec3) -> Option<Expr> {
    let mid = (a + b) * 0.5;

    let wall = orient((b - a).cross(Vec3::Y).try_normalize()?, reference - mid, true);
    let along = Vec3::new(b.x - a.x, 0.0, b.z - a.z).normalize();
    let shadow_a = orient(
        shadow_normal(Vec3::Y.cross(a - reference), wall, along),
        mid - a,
        false,
    );
    let shadow_b = orient(
        shadow_normal((b - reference).cross(Vec3::Y), wall, along),
        mid - b,
        false,
    );

    Some(Expr::Max(vec![
        Expr::HalfSpace {
            anchor: mid,
            normal: wall,
        },
        Expr::HalfSpace {
            anchor: a,
            normal: shadow_a,
        },
        Expr::HalfSpace {
            anchor: b,
            normal: shadow_b,
        },
    ]))
}

fn shadow_normal(candidate: Vec3, wall: Vec3, along: Vec3) -> Vec3 {
    match candidate.try_normalize() {
        Some(normal) if normal.dot(wall).abs() < PARALLEL_LIMIT => normal,
        _ => along,
    }
}

/// Flip `normal` so `probe` lies on the requested side of the plane.
///
/// A probe on the plane counts as inside.
fn orient(normal: Vec3, probe: Vec3, outside: bool) -> Vec3 {
    let dot = normal.dot(probe);
    let flip = if outside { dot <= 0.0 } else { dot > 0.0 };
    if flip {
        -normal
    } else {
        normal
    }
}

/// Ordered group of same-type drones.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneConstraint {
    drones: Vec<Drone>,
}

impl DroneConstraint {
    fn new(first: Drone) -> Self {
        Self {
            drones: vec![first],
        }
    }

    /// Whether a drone of `drone_type` joins this constraint.
    #[must_use]
    pub fn accepts(&self, drone_type: DroneType) -> bool {
        self.drones
            .first()
            .is_some_and(|d| d.drone_type == drone_type)
    }

    /// Drones in placement order.
    #[must_use]
    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    /// Number of drones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drones.len()
    }

    /// Whether the constraint has lost all drones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Excluded region as seen from `reference`, or `None` if fewer than
    /// two drones or only degenerate pairs remain.
    #[must_use]
    pub fn constraint_node(&self, reference: Vec3) -> Option<CsgNode> {
        let segments: Vec<CsgNode> = self
            .drones
            .windows(2)
            .filter_map(|pair| {
                chain_segment(pair[0].target_position, pair[1].target_position, reference)
            })
            .map(CsgNode::Expression)
            .collect();
        (!segments.is_empty()).then_some(CsgNode::Union(segments))
    }
}

/// All placed drones, grouped into constraints.
#[derive(Debug, Clone, Default)]
pub struct DroneSet {
    constraints: Vec<DroneConstraint>,
    next_id: u64,
}

impl DroneSet {
    /// Create a set without drones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a drone. It joins the first constraint of its type, or starts
    /// a new one.
    pub fn place(&mut self, drone_type: DroneType, position: Vec3) -> Result<DroneId> {
        if !drone_type.is_supported() {
            return Err(MinerError::UnsupportedDroneType(drone_type));
        }

        self.next_id += 1;
        let id = DroneId(self.next_id);
        let drone = Drone::new(id, drone_type, position);

        match self
            .constraints
            .iter_mut()
            .find(|c| c.accepts(drone_type))
        {
            Some(constraint) => constraint.drones.push(drone),
            None => self.constraints.push(DroneConstraint::new(drone)),
        }
        tracing::debug!(%id, ?drone_type, ?position, "Placed drone");
        Ok(id)
    }

    /// Remove a drone, deleting its constraint if it was the last one.
    pub fn remove(&mut self, id: DroneId) -> Result<Drone> {
        for (index, constraint) in self.constraints.iter_mut().enumerate() {
            if let Some(position) = constraint.drones.iter().position(|d| d.id == id) {
                let drone = constraint.drones.remove(position);
                if constraint.is_empty() {
                    self.constraints.remove(index);
                }
                tracing::debug!(%id, "Removed drone");
                return Ok(drone);
            }
        }
        Err(MinerError::DroneNotFound(id))
    }

    /// Look up a drone.
    #[must_use]
    pub fn get(&self, id: DroneId) -> Option<&Drone> {
        self.drones().find(|d| d.id == id)
    }

    /// Look up a drone for modification.
    pub fn get_mut(&mut self, id: DroneId) -> Option<&mut Drone> {
        self.constraints
            .iter_mut()
            .flat_map(|c| c.drones.iter_mut())
            .find(|d| d.id == id)
    }

    /// All drones.
    pub fn drones(&self) -> impl Iterator<Item = &Drone> {
        self.constraints.iter().flat_map(|c| c.drones.iter())
    }

    /// All constraints.
    #[must_use]
    pub fn constraints(&self) -> &[DroneConstraint] {
        &self.constraints
    }

    /// Advance every drone.
    pub fn update(&mut self, dt: f32, config: &DroneConfig) {
        for drone in self.constraints.iter_mut().flat_map(|c| c.drones.iter_mut()) {
            drone.update(dt, config);
        }
    }

    /// Union of every constraint's excluded region, or `None` if nothing
    /// constrains.
    #[must_use]
    pub fn constraint_volume(&self, reference: Vec3) -> Option<CsgNode> {
        let nodes: Vec<CsgNode> = self
            .constraints
            .iter()
            .filter_map(|c| c.constraint_node(reference))
            .collect();
        (!nodes.is_empty()).then_some(CsgNode::Union(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_pair() -> (Vec3, Vec3) {
        (Vec3::new(-5.0, 0.0, 5.0), Vec3::new(5.0, 0.0, 5.0))
    }

    #[test]
    fn test_chain_segment_clips_behind_wall() {
        let (a, b) = wall_pair();
        let segment = chain_segment(a, b, Vec3::ZERO).unwrap();
        assert!(segment.distance(Vec3::new(0.0, 0.0, 7.0)) < 0.0);
        assert!(segment.distance(Vec3::new(0.0, 0.0, 4.0)) > 0.0);
        assert!(segment.distance(Vec3::ZERO) > 0.0);
    }

    #[test]
    fn test_chain_segment_limited_by_shadows() {
        let (a, b) = wall_pair();
        let segment = chain_segment(a, b, Vec3::ZERO).unwrap();
        assert!(segment.distance(Vec3::new(20.0, 0.0, 7.0)) > 0.0);
        assert!(segment.distance(Vec3::new(-20.0, 3.0, 7.0)) > 0.0);
    }

    #[test]
    fn test_chain_segment_degenerate() {
        let a = Vec3::new(1.0, 0.0, 1.0);
        assert!(chain_segment(a, a, Vec3::ZERO).is_none());
        assert!(chain_segment(a, a + Vec3::Y, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_chain_segment_reference_below_drone() {
        let (a, b) = wall_pair();
        let below_b = Vec3::new(5.0, -1.5, 5.0);
        let segment = chain_segment(a, b, below_b).unwrap();
        assert!(segment.distance(Vec3::new(4.0, 0.0, 7.0)) < 0.0);
        assert!(segment.distance(Vec3::new(4.0, 0.0, 3.0)) > 0.0);
        assert!(segment.distance(Vec3::new(8.0, 0.0, 7.0)) > 0.0);
    }

    #[test]
    fn test_chain_segment_reference_near_drone_matches_side() {
        let (a, b) = wall_pair();
        let near = chain_segment(a, b, Vec3::new(5.0, -1.5, 4.99)).unwrap();
        let exact = chain_segment(a, b, Vec3::new(5.0, -1.5, 5.0)).unwrap();
        let behind = Vec3::new(4.0, 0.0, 7.0);
        assert!(near.distance(behind) < 0.0);
        assert!(exact.distance(behind) < 0.0);
    }

    #[test]
    fn test_constraint_lifecycle() {
        let mut drones = DroneSet::new();
        let (a, b) = wall_pair();

        let first = drones.place(DroneType::Chain, a).unwrap();
        assert_eq!(drones.constraints().len(), 1);
        assert!(drones.constraint_volume(Vec3::ZERO).is_none());

        let second = drones.place(DroneType::Chain, b).unwrap();
        assert_eq!(drones.constraints().len(), 1);
        assert_eq!(drones.constraints()[0].len(), 2);
        assert!(drones.constraint_volume(Vec3::ZERO).is_some());

        drones.remove(first).unwrap();
        assert!(drones.constraint_volume(Vec3::ZERO).is_none());
        drones.remove(second).unwrap();
        assert!(drones.constraints().is_empty());
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let mut drones = DroneSet::new();
        let result = drones.place(DroneType::Loop, Vec3::ZERO);
        assert!(matches!(
            result,
            Err(MinerError::UnsupportedDroneType(DroneType::Loop))
        ));
        assert!(drones.constraints().is_empty());
    }

    #[test]
    fn test_remove_unknown() {
        let mut drones = DroneSet::new();
        assert!(matches!(
            drones.remove(DroneId(42)),
            Err(MinerError::DroneNotFound(DroneId(42)))
        ));
    }

    #[test]
    fn test_drone_moves_towards_target() {
        let config = DroneConfig {
            speed: 2.0,
            ..DroneConfig::default()
        };
        let mut drones = DroneSet::new();
        let id = drones.place(DroneType::Chain, Vec3::ZERO).unwrap();
        drones.get_mut(id).unwrap().set_target(Vec3::new(10.0, 0.0, 0.0));

        drones.update(1.0, &config);
        assert_eq!(drones.get(id).unwrap().current_position, Vec3::new(2.0, 0.0, 0.0));

        drones.update(10.0, &config);
        assert_eq!(drones.get(id).unwrap().current_position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_render_position_hovers() {
        let config = DroneConfig::default();
        let mut drone = Drone::new(DroneId(1), DroneType::Chain, Vec3::ZERO);
        drone.update(0.5, &config);
        let offset = drone.render_position(&config) - drone.current_position;
        assert!(offset.y.abs() <= config.hover_amplitude + f32::EPSILON);
        assert_eq!(offset.x, 0.0);
    }
}
