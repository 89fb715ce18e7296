//! What using an item at a ray hit does.
//!
//! The physics engine answers the ray query; [`plan_use`] turns the hit
//! and the selected item into an [`ItemUse`] without touching any state.

use glam::Vec3;

use crate::config::DiggingConfig;
use crate::digging::{DigShape, DroneType, MaterialFilter};
use crate::item::{Item, MaterialItem, MaterialShape, ToolType};
use crate::substance::{Substance, SubstanceCategory};

const SHOVEL_DIGS: &[SubstanceCategory] = &[SubstanceCategory::Loose];
const PICKAXE_DIGS: &[SubstanceCategory] = &[SubstanceCategory::Loose, SubstanceCategory::Rock];

/// Result of a ray query against the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Hit point.
    pub position: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
    /// Whether the ray hit terrain rather than an object.
    pub has_terrain_collision: bool,
    /// Substance at the hit point, if the engine knows it.
    pub substance: Option<Substance>,
}

/// Action resulting from using an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemUse {
    /// Remove terrain.
    Dig {
        /// Region.
        shape: DigShape,
        /// Materials that may be removed.
        filter: MaterialFilter,
    },
    /// Fill terrain with a substance.
    Place {
        /// Region.
        shape: DigShape,
        /// Substance to place.
        substance: Substance,
        /// Whether one unit of the used item is consumed instead of
        /// charging resource volume.
        consume_unit: bool,
    },
    /// Place a drone and consume one drone item.
    PlaceDrone {
        /// Drone kind.
        drone_type: DroneType,
        /// Target position.
        position: Vec3,
    },
    /// Place a torch and consume one.
    PlaceTorch {
        /// Position.
        position: Vec3,
        /// Surface normal the torch is attached to.
        normal: Vec3,
    },
    /// Sample the substance at the hit point.
    Sample {
        /// Sampled substance.
        substance: Substance,
    },
}

/// Terrain filter of a digging tool, `None` for tools that do not dig.
#[must_use]
pub const fn dig_filter(tool: ToolType) -> Option<MaterialFilter> {
    match tool {
        ToolType::Shovel => Some(MaterialFilter::Only(SHOVEL_DIGS)),
        ToolType::Pickaxe => Some(MaterialFilter::Only(PICKAXE_DIGS)),
        ToolType::GodsShovel => Some(MaterialFilter::All),
        ToolType::Axe | ToolType::Hammer | ToolType::DroneChain => None,
    }
}

/// Placement shape of one unit of material centred at `center`.
#[must_use]
pub fn material_shape(material: &MaterialItem, center: Vec3) -> DigShape {
    let size = material.size;
    match material.shape {
        MaterialShape::Cube => DigShape::Box {
            center,
            half_extents: size * 0.5,
        },
        MaterialShape::Cylinder => DigShape::Cylinder {
            center,
            radius: size.x,
            half_height: size.y,
        },
        MaterialShape::Sphere => DigShape::Sphere {
            center,
            radius: size.x,
        },
    }
}

/// Decide what using `item` at `hit` does. Returns `None` if nothing
/// happens.
#[must_use]
pub fn plan_use(item: &Item, hit: &RayHit, config: &DiggingConfig) -> Option<ItemUse> {
    if !hit.has_terrain_collision {
        return None;
    }
    let sphere = |radius| DigShape::Sphere {
        center: hit.position,
        radius,
    };

    match item {
        Item::Tool(tool) if tool.tool == ToolType::DroneChain => Some(ItemUse::PlaceDrone {
            drone_type: DroneType::Chain,
            position: hit.position + Vec3::Y * config.drone_hover_height,
        }),
        Item::Tool(tool) => Some(ItemUse::Dig {
            shape: sphere(config.dig_radius(tool.tool)?),
            filter: dig_filter(tool.tool)?,
        }),
        Item::Resource(resource) => Some(ItemUse::Place {
            shape: sphere(config.place_radius),
            substance: resource.substance,
            consume_unit: false,
        }),
        Item::Material(material) => Some(ItemUse::Place {
            shape: material_shape(material, hit.position),
            substance: material.substance,
            consume_unit: true,
        }),
        Item::Torch(_) => Some(ItemUse::PlaceTorch {
            position: hit.position,
            normal: hit.normal,
        }),
        Item::Pipette(_) => hit.substance.map(|substance| ItemUse::Sample { substance }),
        Item::Crafting(_) | Item::Recipe(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit() -> RayHit {
        RayHit {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            has_terrain_collision: true,
            substance: Some(Substance::Stone),
        }
    }

    #[test]
    fn test_shovel_digs_loose_only() {
        let shovel = Item::tool(ToolType::Shovel, Substance::Copper);
        let Some(ItemUse::Dig { shape, filter }) =
            plan_use(&shovel, &hit(), &DiggingConfig::default())
        else {
            panic!("shovel should dig");
        };
        assert_eq!(shape.boundary().radius, 1.0);
        assert!(filter.matches(Substance::Dirt));
        assert!(!filter.matches(Substance::Stone));
    }

    #[test]
    fn test_pickaxe_digs_rock() {
        let filter = dig_filter(ToolType::Pickaxe).unwrap();
        assert!(filter.matches(Substance::Basalt));
        assert!(!filter.matches(Substance::Iron));
        assert!(dig_filter(ToolType::GodsShovel).unwrap().matches(Substance::Gold));
    }

    #[test]
    fn test_non_digging_tools() {
        let axe = Item::tool(ToolType::Axe, Substance::Iron);
        assert_eq!(plan_use(&axe, &hit(), &DiggingConfig::default()), None);
    }

    #[test]
    fn test_no_terrain_no_use() {
        let mut miss = hit();
        miss.has_terrain_collision = false;
        let shovel = Item::tool(ToolType::Shovel, Substance::Copper);
        assert_eq!(plan_use(&shovel, &miss, &DiggingConfig::default()), None);
    }

    #[test]
    fn test_material_placement_consumes_unit() {
        let cube = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));
        let planned = plan_use(&cube, &hit(), &DiggingConfig::default());
        assert_eq!(
            planned,
            Some(ItemUse::Place {
                shape: DigShape::Box {
                    center: hit().position,
                    half_extents: Vec3::ONE
                },
                substance: Substance::Stone,
                consume_unit: true,
            })
        );
    }

    #[test]
    fn test_drone_hovers_above_hit() {
        let drone = Item::tool(ToolType::DroneChain, Substance::Copper);
        let Some(ItemUse::PlaceDrone { position, .. }) =
            plan_use(&drone, &hit(), &DiggingConfig::default())
        else {
            panic!("drone item should place a drone");
        };
        assert_eq!(position, Vec3::new(1.0, 3.5, 3.0));
    }

    #[test]
    fn test_pipette_samples() {
        assert_eq!(
            plan_use(&Item::pipette(), &hit(), &DiggingConfig::default()),
            Some(ItemUse::Sample {
                substance: Substance::Stone
            })
        );
    }
}
