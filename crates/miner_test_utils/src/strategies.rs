//! Proptest strategies for item and digging properties.

use glam::Vec3;
use miner_core::item::{CraftingItemType, Item, MaterialShape, ToolType};
use miner_core::substance::Substance;
use proptest::prelude::*;

/// Any concrete substance.
pub fn arb_substance() -> impl Strategy<Value = Substance> {
    proptest::sample::select(Substance::ALL.to_vec())
}

/// Resource volumes that add and subtract exactly in `f32`: multiples of
/// 1/64 m³ up to 64 m³.
pub fn arb_volume() -> impl Strategy<Value = f32> {
    (1u32..4096u32).prop_map(|n| n as f32 / 64.0)
}

/// Stack sizes (1-100).
pub fn arb_stack() -> impl Strategy<Value = u32> {
    1u32..100u32
}

/// Any material shape.
pub fn arb_shape() -> impl Strategy<Value = MaterialShape> {
    proptest::sample::select(MaterialShape::ALL.to_vec())
}

/// Material sizes in quarter metres from 0.25 to 4.
pub fn arb_size() -> impl Strategy<Value = Vec3> {
    (1u32..16, 1u32..16, 1u32..16)
        .prop_map(|(x, y, z)| Vec3::new(x as f32, y as f32, z as f32) * 0.25)
}

/// Any tool type.
pub fn arb_tool_type() -> impl Strategy<Value = ToolType> {
    proptest::sample::select(vec![
        ToolType::Pickaxe,
        ToolType::Shovel,
        ToolType::Axe,
        ToolType::Hammer,
        ToolType::DroneChain,
        ToolType::GodsShovel,
    ])
}

/// Any crafting component type.
pub fn arb_crafting_type() -> impl Strategy<Value = CraftingItemType> {
    proptest::sample::select(vec![
        CraftingItemType::Handle,
        CraftingItemType::ShovelBlade,
        CraftingItemType::PickaxeHead,
        CraftingItemType::AxeHead,
    ])
}

/// A resource item.
pub fn arb_resource() -> impl Strategy<Value = Item> {
    (arb_substance(), arb_volume()).prop_map(|(s, v)| Item::resource(s, v))
}

/// A stackable discrete item.
pub fn arb_stack_item() -> impl Strategy<Value = Item> {
    prop_oneof![
        (arb_substance(), arb_shape(), arb_size(), arb_stack())
            .prop_map(|(s, shape, size, n)| Item::material(s, shape, size).with_stack(n)),
        (arb_tool_type(), arb_substance(), arb_stack())
            .prop_map(|(t, s, n)| Item::tool(t, s).with_stack(n)),
        (arb_crafting_type(), arb_substance(), arb_stack())
            .prop_map(|(c, s, n)| Item::crafting(c, s).with_stack(n)),
        arb_stack().prop_map(Item::torch),
    ]
}

/// Any non-empty item, including non-stacking ones.
pub fn arb_item() -> impl Strategy<Value = Item> {
    prop_oneof![
        4 => arb_resource(),
        4 => arb_stack_item(),
        1 => Just(Item::pipette()),
        1 => (arb_resource(), arb_resource())
            .prop_map(|(result, ingredient)| Item::recipe(result, vec![ingredient], false)),
    ]
}

/// A sequence of items.
pub fn arb_item_list(max_len: usize) -> impl Strategy<Value = Vec<Item>> {
    proptest::collection::vec(arb_item(), 0..max_len)
}

/// Horizontal positions on a 1 m grid within 32 m of the origin.
pub fn arb_ground_position() -> impl Strategy<Value = Vec3> {
    (-32i32..32, -32i32..32).prop_map(|(x, z)| Vec3::new(x as f32, 0.0, z as f32))
}
