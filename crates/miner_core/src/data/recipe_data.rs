//! Crafting table data structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{parse_ron, ItemData};
use crate::crafting::{CraftingRule, ExplicitRule, MaterialRule};
use crate::error::{MinerError, Result};
use crate::item::MaterialShape;
use crate::substance::Substance;

const BUILTIN_TABLE: &str = include_str!("../../../../assets/data/crafting.ron");

/// Rule with fixed ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitRuleData {
    /// Item produced.
    pub result: ItemData,
    /// Ingredients consumed, in order.
    pub ingredients: Vec<ItemData>,
    /// Items returned when the result is dismantled.
    #[serde(default)]
    pub dismantle_result: Option<Vec<ItemData>>,
    /// Whether the result takes the substance of the first ingredient.
    #[serde(default)]
    pub carry_over_substance: bool,
}

impl ExplicitRuleData {
    fn to_rule(&self) -> Result<CraftingRule> {
        let ingredients = self
            .ingredients
            .iter()
            .map(ItemData::to_item)
            .collect::<Result<Vec<_>>>()?;
        let dismantle_result = self
            .dismantle_result
            .as_ref()
            .map(|parts| parts.iter().map(ItemData::to_item).collect::<Result<Vec<_>>>())
            .transpose()?;
        Ok(CraftingRule::Explicit(ExplicitRule {
            result: self.result.to_item()?,
            ingredients,
            dismantle_result,
            carry_over_substance: self.carry_over_substance,
        }))
    }
}

/// Material rules for one substance, one per listed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRuleData {
    /// Substance of resource and material.
    pub substance: Substance,
    /// Shapes to generate rules for.
    #[serde(default = "all_shapes")]
    pub shapes: Vec<MaterialShape>,
    /// Default size of a crafted unit.
    pub size: (f32, f32, f32),
}

fn all_shapes() -> Vec<MaterialShape> {
    MaterialShape::ALL.to_vec()
}

impl MaterialRuleData {
    fn to_rules(&self) -> Result<Vec<CraftingRule>> {
        let (x, y, z) = self.size;
        let size = Vec3::new(x, y, z);
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(MinerError::InvalidItem(format!(
                "material rule for {} has size {size}",
                self.substance.name()
            )));
        }
        Ok(self
            .shapes
            .iter()
            .map(|&shape| CraftingRule::Material(MaterialRule::new(self.substance, shape, size)))
            .collect())
    }
}

/// Complete crafting table.
///
/// # Example RON
///
/// ```ron
/// RecipeTable(
///     explicit: [
///         ExplicitRuleData(
///             result: Torch(stack: 4),
///             ingredients: [Resource(substance: BirchWood, volume: 0.2)],
///         ),
///     ],
///     material: [
///         MaterialRuleData(substance: Stone, size: (0.5, 0.5, 0.5)),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeTable {
    /// Rules with fixed ingredients.
    #[serde(default)]
    pub explicit: Vec<ExplicitRuleData>,
    /// Parametric material rules.
    #[serde(default)]
    pub material: Vec<MaterialRuleData>,
}

impl RecipeTable {
    /// Parse a table from RON text.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        parse_ron(source_name, text)
    }

    /// Table shipped with the game.
    pub fn builtin() -> Result<Self> {
        Self::from_ron_str("crafting.ron", BUILTIN_TABLE)
    }

    /// Convert every entry into a rule, explicit rules first.
    pub fn to_rules(&self) -> Result<Vec<CraftingRule>> {
        let mut rules = Vec::with_capacity(self.explicit.len() + self.material.len() * 3);
        for entry in &self.explicit {
            rules.push(entry.to_rule()?);
        }
        for entry in &self.material {
            rules.extend(entry.to_rules()?);
        }
        Ok(rules)
    }
}
