//! Item templates for data tables.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};
use crate::item::{CraftingItemType, Item, MaterialShape, ToolType};
use crate::substance::Substance;

const fn default_stack() -> u32 {
    1
}

/// Data-driven item template.
///
/// # Example RON
///
/// ```ron
/// [
///     Resource(substance: Iron, volume: 0.5),
///     Material(substance: Stone, shape: Cube, size: (0.5, 0.5, 0.5), stack: 4),
///     Tool(tool: Pickaxe, substance: Copper),
///     Crafting(item_type: Handle, substance: BirchWood),
///     Torch(stack: 4),
///     Pipette,
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemData {
    /// Raw resource volume.
    Resource {
        /// Material kind.
        substance: Substance,
        /// Volume in m³.
        volume: f32,
    },
    /// Shaped material.
    Material {
        /// Material kind.
        substance: Substance,
        /// Shape of each unit.
        shape: MaterialShape,
        /// Per-shape size.
        size: (f32, f32, f32),
        /// Number of units.
        #[serde(default = "default_stack")]
        stack: u32,
    },
    /// Tool.
    Tool {
        /// Kind of tool.
        tool: ToolType,
        /// Substance the tool is made of.
        substance: Substance,
        /// Number of tools.
        #[serde(default = "default_stack")]
        stack: u32,
    },
    /// Crafting component.
    Crafting {
        /// Component kind.
        item_type: CraftingItemType,
        /// Substance the component is made of.
        substance: Substance,
        /// Number of components.
        #[serde(default = "default_stack")]
        stack: u32,
    },
    /// Torches.
    Torch {
        /// Number of torches.
        #[serde(default = "default_stack")]
        stack: u32,
    },
    /// The pipette.
    Pipette,
}

impl ItemData {
    /// Build the item, rejecting empty quantities and degenerate sizes.
    pub fn to_item(&self) -> Result<Item> {
        let item = match *self {
            Self::Resource { substance, volume } => {
                if !volume.is_finite() || volume <= 0.0 {
                    return Err(MinerError::InvalidItem(format!(
                        "resource {} has volume {volume}",
                        substance.name()
                    )));
                }
                Item::resource(substance, volume)
            }
            Self::Material {
                substance,
                shape,
                size: (x, y, z),
                stack,
            } => {
                let size = Vec3::new(x, y, z);
                if !size.is_finite() || size.min_element() <= 0.0 {
                    return Err(MinerError::InvalidItem(format!(
                        "{} {} has size {size}",
                        substance.name(),
                        shape.name()
                    )));
                }
                Item::material(substance, shape, size).with_stack(stack)
            }
            Self::Tool {
                tool,
                substance,
                stack,
            } => Item::tool(tool, substance).with_stack(stack),
            Self::Crafting {
                item_type,
                substance,
                stack,
            } => Item::crafting(item_type, substance).with_stack(stack),
            Self::Torch { stack } => Item::torch(stack),
            Self::Pipette => Item::pipette(),
        };
        if item.is_empty() {
            return Err(MinerError::InvalidItem(format!("{} has no units", item.name())));
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Quantity;

    #[test]
    fn test_parse_items() {
        let items: Vec<ItemData> = ron::from_str(
            "[Resource(substance: Iron, volume: 0.5), Tool(tool: Pickaxe, substance: Copper), Pipette]",
        )
        .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[1].to_item().unwrap(),
            Item::tool(ToolType::Pickaxe, Substance::Copper)
        );
    }

    #[test]
    fn test_stack_defaults_to_one() {
        let item: ItemData = ron::from_str("Tool(tool: Axe, substance: Iron)").unwrap();
        assert_eq!(item.to_item().unwrap().quantity(), Quantity::Stack(1));
    }

    #[test]
    fn test_rejects_empty() {
        let zero = ItemData::Resource {
            substance: Substance::Dirt,
            volume: 0.0,
        };
        assert!(zero.to_item().is_err());
        assert!(ItemData::Torch { stack: 0 }.to_item().is_err());
    }

    #[test]
    fn test_rejects_degenerate_size() {
        let flat = ItemData::Material {
            substance: Substance::Stone,
            shape: MaterialShape::Cube,
            size: (1.0, 0.0, 1.0),
            stack: 1,
        };
        assert!(matches!(flat.to_item(), Err(MinerError::InvalidItem(_))));
    }
}
