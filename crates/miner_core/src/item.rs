//! Item model and the merge/stack protocol.
//!
//! Every item is one variant of the closed [`Item`] enum. An item is
//! either a *volume* item (continuous quantity in m³) or a *discrete* item
//! (integer stack size); see [`Quantity`]. Items are plain values: moving
//! an item between collections or into the world clones it.
//!
//! Merging is the single primitive behind stacking, removal and
//! affordability checks. [`Item::try_merge`] applies a [`MergeOp`] and
//! [`Item::can_merge`] answers the same question without mutating anything.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::substance::Substance;

/// Volume at or below which a volume item counts as empty.
pub const VOLUME_EPSILON: f32 = 1e-4;

/// Display and sort category of an item.
///
/// The declaration order is the sort order used by item identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Tools used for digging and building.
    Tools,
    /// Raw terrain resources.
    Resources,
    /// Shaped building material.
    Material,
    /// Intermediate crafting components.
    Crafting,
    /// Drones and other mechanical helpers.
    Mechanics,
    /// Light sources.
    Lighting,
    /// Recipe descriptors.
    Recipes,
}

impl ItemCategory {
    /// Sort rank used as identifier prefix.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

/// Quantity of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    /// Continuous volume in m³.
    Volume(f32),
    /// Discrete stack size.
    Stack(u32),
}

impl Quantity {
    /// Whether this quantity counts as empty.
    #[must_use]
    pub fn is_empty(self) -> bool {
        match self {
            Self::Volume(v) => v <= VOLUME_EPSILON,
            Self::Stack(n) => n == 0,
        }
    }
}

/// Merge operation applied by [`Item::try_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    /// Add the other item's quantity.
    Add,
    /// Subtract the other item's quantity; fails if not enough is held.
    Subtract,
    /// Subtract even if not enough is held; the item may end up empty.
    ForceSubtract,
}

/// Shape of a material item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialShape {
    /// Box with size `(width, height, depth)`.
    Cube,
    /// Upright cylinder with size `(radius, height, radius)`.
    Cylinder,
    /// Sphere with size `(radius, radius, radius)`.
    Sphere,
}

impl MaterialShape {
    /// All shapes.
    pub const ALL: [Self; 3] = [Self::Cube, Self::Cylinder, Self::Sphere];

    /// Volume of one unit of this shape at `size`.
    ///
    /// Crafting costs are calibrated against these exact formulas, which
    /// scale the component product rather than using radius powers.
    #[must_use]
    pub fn volume(self, size: Vec3) -> f32 {
        let product = size.x * size.y * size.z;
        match self {
            Self::Cube => product,
            Self::Cylinder => 2.0 * PI * product,
            Self::Sphere => 4.0 / 3.0 * PI * product,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cube => "Cube",
            Self::Cylinder => "Cylinder",
            Self::Sphere => "Sphere",
        }
    }
}

/// Kind of tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Digs loose material and rock.
    Pickaxe,
    /// Digs loose material.
    Shovel,
    /// Fells trees.
    Axe,
    /// Places material.
    Hammer,
    /// Places chain drones.
    DroneChain,
    /// Digs everything; debug tool.
    GodsShovel,
}

impl ToolType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pickaxe => "Pickaxe",
            Self::Shovel => "Shovel",
            Self::Axe => "Axe",
            Self::Hammer => "Hammer",
            Self::DroneChain => "Chain Drone",
            Self::GodsShovel => "God's Shovel",
        }
    }

    /// Stable key used in identifiers and icons.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pickaxe => "Pickaxe",
            Self::Shovel => "Shovel",
            Self::Axe => "Axe",
            Self::Hammer => "Hammer",
            Self::DroneChain => "DroneChain",
            Self::GodsShovel => "GodsShovel",
        }
    }

    /// Volume of the substance part of one tool, in m³.
    #[must_use]
    pub const fn head_volume(self) -> f32 {
        match self {
            Self::Pickaxe => 0.0005,
            Self::Shovel => 0.0004,
            Self::Axe => 0.0004,
            Self::Hammer => 0.0003,
            Self::DroneChain => 0.0002,
            Self::GodsShovel => 0.0,
        }
    }
}

/// Kind of intermediate crafting component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftingItemType {
    /// Tool handle.
    Handle,
    /// Blade of a shovel.
    ShovelBlade,
    /// Head of a pickaxe.
    PickaxeHead,
    /// Head of an axe.
    AxeHead,
}

impl CraftingItemType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Handle => "Handle",
            Self::ShovelBlade => "Shovel Blade",
            Self::PickaxeHead => "Pickaxe Head",
            Self::AxeHead => "Axe Head",
        }
    }

    /// Stable key used in identifiers and icons.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Handle => "Handle",
            Self::ShovelBlade => "ShovelBlade",
            Self::PickaxeHead => "PickaxeHead",
            Self::AxeHead => "AxeHead",
        }
    }

    /// Volume of one component in m³.
    #[must_use]
    pub const fn volume(self) -> f32 {
        match self {
            Self::Handle => 0.002,
            Self::ShovelBlade => 0.0004,
            Self::PickaxeHead => 0.0005,
            Self::AxeHead => 0.0004,
        }
    }
}

/// Raw terrain material held by the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    /// Material kind.
    pub substance: Substance,
    /// Held volume in m³.
    pub volume: f32,
}

/// Shaped building material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    /// Material kind.
    pub substance: Substance,
    /// Shape of each unit.
    pub shape: MaterialShape,
    /// Per-shape size, see [`MaterialShape`].
    pub size: Vec3,
    /// Number of units.
    pub stack_size: u32,
}

impl MaterialItem {
    /// Volume of one unit.
    #[must_use]
    pub fn unit_volume(&self) -> f32 {
        self.shape.volume(self.size)
    }
}

/// A tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolItem {
    /// Kind of tool.
    pub tool: ToolType,
    /// Substance the tool is made of.
    pub substance: Substance,
    /// Number of tools.
    pub stack_size: u32,
    /// Remaining durability.
    pub durability: u32,
}

/// Default durability of a freshly crafted tool.
pub const DEFAULT_DURABILITY: u32 = 100;

/// Intermediate crafting component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingItem {
    /// Component kind.
    pub item_type: CraftingItemType,
    /// Substance the component is made of.
    pub substance: Substance,
    /// Number of components.
    pub stack_size: u32,
}

/// Recipe descriptor.
///
/// Never stacks: two identical recipes are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeItem {
    /// Item produced by the recipe.
    pub result: Box<Item>,
    /// Ordered ingredient templates.
    pub ingredients: Vec<Item>,
    /// Whether the result takes the substance of the first ingredient.
    pub carry_over_substance: bool,
    /// Always 1 while held, 0 once consumed.
    pub stack_size: u32,
}

/// Placeable light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorchItem {
    /// Number of torches.
    pub stack_size: u32,
}

/// Weight of one torch in kg.
pub const TORCH_WEIGHT: f32 = 0.5;

/// Samples the substance under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipetteItem {
    /// Always 1 while held, 0 once consumed.
    pub stack_size: u32,
}

/// An item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    /// Raw resource volume.
    Resource(ResourceItem),
    /// Shaped material.
    Material(MaterialItem),
    /// Tool.
    Tool(ToolItem),
    /// Crafting component.
    Crafting(CraftingItem),
    /// Recipe descriptor.
    Recipe(RecipeItem),
    /// Torch.
    Torch(TorchItem),
    /// Pipette.
    Pipette(PipetteItem),
}

impl Item {
    /// Resource item holding `volume` m³ of `substance`.
    #[must_use]
    pub const fn resource(substance: Substance, volume: f32) -> Self {
        Self::Resource(ResourceItem { substance, volume })
    }

    /// A single material item.
    #[must_use]
    pub const fn material(substance: Substance, shape: MaterialShape, size: Vec3) -> Self {
        Self::Material(MaterialItem {
            substance,
            shape,
            size,
            stack_size: 1,
        })
    }

    /// A single tool at full durability.
    #[must_use]
    pub const fn tool(tool: ToolType, substance: Substance) -> Self {
        Self::Tool(ToolItem {
            tool,
            substance,
            stack_size: 1,
            durability: DEFAULT_DURABILITY,
        })
    }

    /// A single crafting component.
    #[must_use]
    pub const fn crafting(item_type: CraftingItemType, substance: Substance) -> Self {
        Self::Crafting(CraftingItem {
            item_type,
            substance,
            stack_size: 1,
        })
    }

    /// A recipe descriptor.
    #[must_use]
    pub fn recipe(result: Item, ingredients: Vec<Item>, carry_over_substance: bool) -> Self {
        Self::Recipe(RecipeItem {
            result: Box::new(result),
            ingredients,
            carry_over_substance,
            stack_size: 1,
        })
    }

    /// A stack of torches.
    #[must_use]
    pub const fn torch(stack_size: u32) -> Self {
        Self::Torch(TorchItem { stack_size })
    }

    /// A pipette.
    #[must_use]
    pub const fn pipette() -> Self {
        Self::Pipette(PipetteItem { stack_size: 1 })
    }

    /// Replace the stack size of a discrete item. Volume items are unchanged.
    #[must_use]
    pub fn with_stack(mut self, stack_size: u32) -> Self {
        if matches!(self.quantity(), Quantity::Stack(_)) {
            self.set_quantity(Quantity::Stack(stack_size));
        }
        self
    }

    /// Current quantity.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        match self {
            Self::Resource(r) => Quantity::Volume(r.volume),
            Self::Material(m) => Quantity::Stack(m.stack_size),
            Self::Tool(t) => Quantity::Stack(t.stack_size),
            Self::Crafting(c) => Quantity::Stack(c.stack_size),
            Self::Recipe(r) => Quantity::Stack(r.stack_size),
            Self::Torch(t) => Quantity::Stack(t.stack_size),
            Self::Pipette(p) => Quantity::Stack(p.stack_size),
        }
    }

    fn set_quantity(&mut self, quantity: Quantity) {
        match (self, quantity) {
            (Self::Resource(r), Quantity::Volume(v)) => r.volume = v,
            (Self::Material(m), Quantity::Stack(n)) => m.stack_size = n,
            (Self::Tool(t), Quantity::Stack(n)) => t.stack_size = n,
            (Self::Crafting(c), Quantity::Stack(n)) => c.stack_size = n,
            (Self::Recipe(r), Quantity::Stack(n)) => r.stack_size = n,
            (Self::Torch(t), Quantity::Stack(n)) => t.stack_size = n,
            (Self::Pipette(p), Quantity::Stack(n)) => p.stack_size = n,
            (item, quantity) => {
                debug_assert!(false, "quantity model mismatch: {item:?} <- {quantity:?}");
            }
        }
    }

    /// Whether this item holds a continuous volume.
    #[must_use]
    pub fn is_volume_item(&self) -> bool {
        matches!(self.quantity(), Quantity::Volume(_))
    }

    /// Whether the item is empty and must leave any collection holding it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity().is_empty()
    }

    /// Whether equal items fold into one stack on add.
    #[must_use]
    pub const fn is_stackable(&self) -> bool {
        !matches!(self, Self::Recipe(_) | Self::Pipette(_))
    }

    /// Whether the item may be dropped into the world.
    #[must_use]
    pub const fn is_droppable(&self) -> bool {
        !matches!(self, Self::Recipe(_) | Self::Pipette(_))
    }

    /// Substance of the item, if it has one.
    #[must_use]
    pub fn substance(&self) -> Option<Substance> {
        match self {
            Self::Resource(r) => Some(r.substance),
            Self::Material(m) => Some(m.substance),
            Self::Tool(t) => Some(t.substance),
            Self::Crafting(c) => Some(c.substance),
            Self::Recipe(_) | Self::Torch(_) | Self::Pipette(_) => None,
        }
    }

    /// Copy of this item made of `substance`. Items without a substance
    /// are returned unchanged.
    #[must_use]
    pub fn with_substance(mut self, substance: Substance) -> Self {
        match &mut self {
            Self::Resource(r) => r.substance = substance,
            Self::Material(m) => m.substance = substance,
            Self::Tool(t) => t.substance = substance,
            Self::Crafting(c) => c.substance = substance,
            Self::Recipe(_) | Self::Torch(_) | Self::Pipette(_) => {}
        }
        self
    }

    /// Copy of this item holding a single unit. Volume items are copied whole.
    #[must_use]
    pub fn single(&self) -> Self {
        self.clone().with_stack(1)
    }

    /// Display category.
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        match self {
            Self::Resource(_) => ItemCategory::Resources,
            Self::Material(_) => ItemCategory::Material,
            Self::Tool(t) => match t.tool {
                ToolType::DroneChain => ItemCategory::Mechanics,
                _ => ItemCategory::Tools,
            },
            Self::Crafting(_) => ItemCategory::Crafting,
            Self::Recipe(_) => ItemCategory::Recipes,
            Self::Torch(_) => ItemCategory::Lighting,
            Self::Pipette(_) => ItemCategory::Tools,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Resource(r) => r.substance.display_name().to_string(),
            Self::Material(m) => format!("{} {}", m.substance, m.shape.name()),
            Self::Tool(t) => match t.tool {
                ToolType::GodsShovel | ToolType::DroneChain => t.tool.name().to_string(),
                _ => format!("{} {}", t.substance, t.tool.name()),
            },
            Self::Crafting(c) => format!("{} {}", c.substance, c.item_type.name()),
            Self::Recipe(r) => format!("Recipe: {}", r.result.name()),
            Self::Torch(_) => "Torch".to_string(),
            Self::Pipette(_) => "Pipette".to_string(),
        }
    }

    /// Human readable description.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Resource(r) => format!("Raw {} dug out of the terrain.", r.substance),
            Self::Material(m) => format!(
                "A {} of {} ({:.2} x {:.2} x {:.2}).",
                m.shape.name().to_lowercase(),
                m.substance,
                m.size.x,
                m.size.y,
                m.size.z
            ),
            Self::Tool(t) => format!(
                "{} made of {}, durability {}.",
                t.tool.name(),
                t.substance,
                t.durability
            ),
            Self::Crafting(c) => format!("{} made of {}.", c.item_type.name(), c.substance),
            Self::Recipe(r) => {
                let ingredients: Vec<String> = r.ingredients.iter().map(Item::name).collect();
                format!("Crafts {} from {}.", r.result.name(), ingredients.join(", "))
            }
            Self::Torch(_) => "Lights up the surroundings when placed.".to_string(),
            Self::Pipette(_) => "Picks the material under the cursor.".to_string(),
        }
    }

    /// Total weight in kg.
    #[must_use]
    pub fn weight(&self) -> f32 {
        match self {
            Self::Resource(r) => r.volume * r.substance.mass_density(),
            Self::Material(m) => {
                m.unit_volume() * m.substance.mass_density() * m.stack_size as f32
            }
            Self::Tool(t) => {
                t.tool.head_volume() * t.substance.mass_density() * t.stack_size as f32
            }
            Self::Crafting(c) => {
                c.item_type.volume() * c.substance.mass_density() * c.stack_size as f32
            }
            Self::Torch(t) => TORCH_WEIGHT * t.stack_size as f32,
            Self::Recipe(_) | Self::Pipette(_) => 0.0,
        }
    }

    /// Comma-joined icon layer identifiers.
    #[must_use]
    pub fn icon(&self) -> String {
        match self {
            Self::Resource(r) => format!(
                "Resource,{},{}",
                r.substance.category().icon_layer(),
                r.substance.name()
            ),
            Self::Material(m) => format!("{},{}", m.shape.name(), m.substance.name()),
            Self::Tool(t) => format!("{},{}", t.tool.key(), t.substance.name()),
            Self::Crafting(c) => format!("{},{}", c.item_type.key(), c.substance.name()),
            Self::Recipe(r) => format!("Recipe,{}", r.result.icon()),
            Self::Torch(_) => "Torch".to_string(),
            Self::Pipette(_) => "Pipette".to_string(),
        }
    }

    /// Short quantity text shown on the item slot.
    #[must_use]
    pub fn stack_description(&self) -> String {
        match (self, self.quantity()) {
            (Self::Recipe(_), _) => "Recipe".to_string(),
            (_, Quantity::Volume(v)) => format!("{v:.1} m³"),
            (_, Quantity::Stack(n)) if n > 1 => format!("{n}x"),
            (_, Quantity::Stack(_)) => String::new(),
        }
    }

    /// Stable key that sorts items by category and identifies their
    /// merge identity. Quantities are not part of the identifier.
    #[must_use]
    pub fn identifier(&self) -> String {
        let body = match self {
            Self::Resource(r) => format!("Resource-{}", r.substance.name()),
            Self::Material(m) => format!(
                "Material-{}-{}-{:.3}x{:.3}x{:.3}",
                m.substance.name(),
                m.shape.name(),
                m.size.x,
                m.size.y,
                m.size.z
            ),
            Self::Tool(t) => format!(
                "Tool-{}-{}-{}",
                t.tool.key(),
                t.substance.name(),
                t.durability
            ),
            Self::Crafting(c) => format!("Crafting-{}-{}", c.item_type.key(), c.substance.name()),
            Self::Recipe(r) => format!("Recipe-{}", r.result.identifier()),
            Self::Torch(_) => "Torch".to_string(),
            Self::Pipette(_) => "Pipette".to_string(),
        };
        format!("{:02}-{}", self.category().rank(), body)
    }

    /// Whether both items are the same variant with equal identity fields.
    #[must_use]
    pub fn same_identity(&self, other: &Item) -> bool {
        match (self, other) {
            (Self::Resource(a), Self::Resource(b)) => a.substance == b.substance,
            (Self::Material(a), Self::Material(b)) => {
                a.substance == b.substance && a.shape == b.shape && a.size == b.size
            }
            (Self::Tool(a), Self::Tool(b)) => {
                a.tool == b.tool && a.substance == b.substance && a.durability == b.durability
            }
            (Self::Crafting(a), Self::Crafting(b)) => {
                a.item_type == b.item_type && a.substance == b.substance
            }
            (Self::Recipe(a), Self::Recipe(b)) => {
                a.result == b.result
                    && a.ingredients == b.ingredients
                    && a.carry_over_substance == b.carry_over_substance
            }
            (Self::Torch(_), Self::Torch(_)) | (Self::Pipette(_), Self::Pipette(_)) => true,
            _ => false,
        }
    }

    /// Quantity this item would hold after merging `other` with `op`, or
    /// `None` if the merge is not possible.
    fn merged_quantity(&self, other: &Item, op: MergeOp) -> Option<Quantity> {
        if !self.same_identity(other) {
            return None;
        }
        match (self.quantity(), other.quantity()) {
            (Quantity::Volume(mine), Quantity::Volume(theirs)) => match op {
                MergeOp::Add => Some(Quantity::Volume(mine + theirs)),
                MergeOp::Subtract => {
                    let rest = mine - theirs;
                    (rest >= -VOLUME_EPSILON).then_some(Quantity::Volume(rest))
                }
                MergeOp::ForceSubtract => Some(Quantity::Volume(mine - theirs)),
            },
            (Quantity::Stack(mine), Quantity::Stack(theirs)) => match op {
                MergeOp::Add => self
                    .is_stackable()
                    .then(|| Quantity::Stack(mine.saturating_add(theirs))),
                MergeOp::Subtract => mine.checked_sub(theirs).map(Quantity::Stack),
                MergeOp::ForceSubtract => Some(Quantity::Stack(mine.saturating_sub(theirs))),
            },
            _ => None,
        }
    }

    /// Merge `other` into this item. Returns `false` and leaves this item
    /// untouched if the items are incompatible or, for
    /// [`MergeOp::Subtract`], if not enough is held. `other` is never
    /// modified.
    pub fn try_merge(&mut self, other: &Item, op: MergeOp) -> bool {
        match self.merged_quantity(other, op) {
            Some(quantity) => {
                self.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Dry run of [`Item::try_merge`].
    #[must_use]
    pub fn can_merge(&self, other: &Item, op: MergeOp) -> bool {
        self.merged_quantity(other, op).is_some()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack = self.stack_description();
        if stack.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{} ({stack})", self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iron(volume: f32) -> Item {
        Item::resource(Substance::Iron, volume)
    }

    fn volume_of(item: &Item) -> f32 {
        match item.quantity() {
            Quantity::Volume(v) => v,
            Quantity::Stack(_) => panic!("not a volume item"),
        }
    }

    #[test]
    fn test_cube_volume() {
        assert_eq!(MaterialShape::Cube.volume(Vec3::new(2.0, 3.0, 4.0)), 24.0);
    }

    #[test]
    fn test_sphere_and_cylinder_formulas_are_pinned() {
        let unit = Vec3::ONE;
        assert!((MaterialShape::Sphere.volume(unit) - 4.0 / 3.0 * PI).abs() < 1e-6);
        assert!((MaterialShape::Cylinder.volume(unit) - 2.0 * PI).abs() < 1e-6);

        // Per-axis product, not radius powers.
        let size = Vec3::new(1.0, 2.0, 3.0);
        assert!((MaterialShape::Sphere.volume(size) - 8.0 * PI).abs() < 1e-5);
        assert!((MaterialShape::Cylinder.volume(size) - 12.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_add_merge_sums_volume() {
        let mut a = iron(2.0);
        let b = iron(1.5);
        assert!(a.try_merge(&b, MergeOp::Add));
        assert_eq!(volume_of(&a), 3.5);
        assert_eq!(volume_of(&b), 1.5);
    }

    #[test]
    fn test_subtract_then_add_restores() {
        let mut a = iron(3.0);
        let b = iron(1.25);
        assert!(a.try_merge(&b, MergeOp::Subtract));
        assert!(a.try_merge(&b, MergeOp::Add));
        assert_eq!(volume_of(&a), 3.0);
    }

    #[test]
    fn test_insufficient_subtract_fails_closed() {
        let mut a = iron(1.0);
        assert!(!a.try_merge(&iron(2.0), MergeOp::Subtract));
        assert_eq!(volume_of(&a), 1.0);

        let mut torches = Item::torch(2);
        assert!(!torches.try_merge(&Item::torch(3), MergeOp::Subtract));
        assert_eq!(torches.quantity(), Quantity::Stack(2));
    }

    #[test]
    fn test_force_subtract_empties() {
        let mut a = iron(1.0);
        assert!(a.try_merge(&iron(2.0), MergeOp::ForceSubtract));
        assert!(a.is_empty());

        let mut torches = Item::torch(2);
        assert!(torches.try_merge(&Item::torch(5), MergeOp::ForceSubtract));
        assert_eq!(torches.quantity(), Quantity::Stack(0));
        assert!(torches.is_empty());
    }

    #[test]
    fn test_incompatible_variants_do_not_merge() {
        let mut a = iron(1.0);
        assert!(!a.try_merge(&Item::resource(Substance::Gold, 1.0), MergeOp::Add));
        assert!(!a.try_merge(&Item::torch(1), MergeOp::Add));
        assert_eq!(volume_of(&a), 1.0);

        let cube = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::ONE);
        let big_cube = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));
        let sphere = Item::material(Substance::Stone, MaterialShape::Sphere, Vec3::ONE);
        assert!(!cube.can_merge(&big_cube, MergeOp::Add));
        assert!(!cube.can_merge(&sphere, MergeOp::Add));
        assert!(cube.can_merge(&cube, MergeOp::Add));
    }

    #[test]
    fn test_tool_durability_is_identity() {
        let fresh = Item::tool(ToolType::Pickaxe, Substance::Iron);
        let mut worn = fresh.clone();
        if let Item::Tool(t) = &mut worn {
            t.durability = 40;
        }
        assert!(!fresh.can_merge(&worn, MergeOp::Add));
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let a = iron(2.0);
        let before = a.clone();
        assert!(a.can_merge(&iron(1.0), MergeOp::Subtract));
        assert!(!a.can_merge(&iron(3.0), MergeOp::Subtract));
        assert_eq!(a, before);
    }

    #[test]
    fn test_recipes_never_stack_but_can_be_removed() {
        let recipe = Item::recipe(
            Item::tool(ToolType::Shovel, Substance::Copper),
            vec![Item::resource(Substance::Copper, 1.0)],
            false,
        );
        let mut held = recipe.clone();
        assert!(!held.try_merge(&recipe, MergeOp::Add));
        assert!(held.try_merge(&recipe, MergeOp::Subtract));
        assert!(held.is_empty());
    }

    #[test]
    fn test_weight_uses_density() {
        let item = Item::resource(Substance::Stone, 2.0);
        assert_eq!(item.weight(), 5200.0);
        let cubes = Item::material(Substance::OakWood, MaterialShape::Cube, Vec3::ONE).with_stack(3);
        assert_eq!(cubes.weight(), 2250.0);
        assert_eq!(Item::pipette().weight(), 0.0);
    }

    #[test]
    fn test_identifier_sorts_by_category() {
        let tool = Item::tool(ToolType::Axe, Substance::Iron).identifier();
        let resource = iron(1.0).identifier();
        let recipe = Item::recipe(iron(1.0), vec![iron(1.0)], false).identifier();
        assert!(tool < resource);
        assert!(resource < recipe);
        assert_eq!(resource, "01-Resource-Iron");
    }

    #[test]
    fn test_identifier_ignores_quantity() {
        assert_eq!(iron(1.0).identifier(), iron(7.0).identifier());
        assert_eq!(Item::torch(1).identifier(), Item::torch(9).identifier());
    }

    #[test]
    fn test_stack_description() {
        assert_eq!(iron(2.34).stack_description(), "2.3 m³");
        assert_eq!(Item::torch(4).stack_description(), "4x");
        assert_eq!(Item::torch(1).stack_description(), "");
        assert_eq!(Item::torch(4).to_string(), "Torch (4x)");
    }

    #[test]
    fn test_names_and_icons() {
        let pickaxe = Item::tool(ToolType::Pickaxe, Substance::Iron);
        assert_eq!(pickaxe.name(), "Iron Pickaxe");
        assert_eq!(pickaxe.icon(), "Pickaxe,Iron");
        let handle = Item::crafting(CraftingItemType::Handle, Substance::BirchWood);
        assert_eq!(handle.name(), "Birch Wood Handle");
        assert_eq!(iron(1.0).icon(), "Resource,MetalBase,Iron");
        assert_eq!(
            Item::tool(ToolType::DroneChain, Substance::Copper).category(),
            ItemCategory::Mechanics
        );
    }

    #[test]
    fn test_with_substance_and_single() {
        let head = Item::crafting(CraftingItemType::AxeHead, Substance::Copper).with_stack(4);
        let gold = head.clone().with_substance(Substance::Gold);
        assert_eq!(gold.substance(), Some(Substance::Gold));
        assert_eq!(head.single().quantity(), Quantity::Stack(1));
        assert_eq!(iron(3.0).single().quantity(), Quantity::Volume(3.0));
    }

    #[test]
    fn test_droppable() {
        assert!(Item::torch(1).is_droppable());
        assert!(!Item::pipette().is_droppable());
        assert!(!Item::recipe(iron(1.0), vec![iron(1.0)], false).is_droppable());
    }
}
