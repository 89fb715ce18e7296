//! Crafting scenarios against real collections and the shipped table.

use glam::Vec3;
use miner_core::prelude::*;
use miner_test_utils::fixtures::{resource_volume, resources, stack_size};

fn pickaxe_registry() -> RuleRegistry {
    RuleRegistry::new(vec![CraftingRule::Explicit(ExplicitRule::new(
        Item::tool(ToolType::Pickaxe, Substance::Iron),
        vec![
            Item::resource(Substance::Iron, 1.0),
            Item::resource(Substance::BirchWood, 1.0),
        ],
    ))])
    .unwrap()
}

fn rule_producing(registry: &RuleRegistry, item: &Item) -> RuleId {
    registry
        .rule_for(item)
        .unwrap_or_else(|| panic!("no rule produces {item}"))
}

#[test]
fn test_pickaxe_end_to_end() {
    let registry = pickaxe_registry();
    let mut items = resources(&[(Substance::Iron, 5.0), (Substance::BirchWood, 5.0)]);
    let mut book = CraftingBook::new();

    assert!(book.craft(&registry, RuleId(0), None, &mut items));

    assert_eq!(resource_volume(&items, Substance::Iron), 4.0);
    assert_eq!(resource_volume(&items, Substance::BirchWood), 4.0);
    assert_eq!(
        stack_size(&items, &Item::tool(ToolType::Pickaxe, Substance::Iron)),
        1
    );
    assert!(book.is_discovered(RuleId(0)));
}

#[test]
fn test_refused_craft_changes_nothing() {
    let registry = pickaxe_registry();
    let mut items = resources(&[(Substance::Iron, 5.0), (Substance::BirchWood, 0.5)]);
    let mut book = CraftingBook::new();

    assert!(!book.craft(&registry, RuleId(0), None, &mut items));
    assert_eq!(resource_volume(&items, Substance::Iron), 5.0);
    assert_eq!(resource_volume(&items, Substance::BirchWood), 0.5);
    assert!(items.drain_events().is_empty());
    assert!(!book.is_discovered(RuleId(0)));
}

#[test]
fn test_material_promotion_is_scoped() {
    let rule = CraftingRule::Material(MaterialRule::new(
        Substance::Stone,
        MaterialShape::Cube,
        Vec3::ONE,
    ));
    let big = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));
    let mut items = resources(&[(Substance::Stone, 10.0)]);

    assert!(rule.is_craftable(Some(&big), &items));
    rule.craft(Some(&big), &mut items);

    assert_eq!(resource_volume(&items, Substance::Stone), 2.0);
    assert_eq!(stack_size(&items, &big), 1);

    // The configured rule still costs one cubic metre.
    assert_eq!(rule.ingredients(), vec![Item::resource(Substance::Stone, 1.0)]);
    rule.craft(None, &mut items);
    assert_eq!(resource_volume(&items, Substance::Stone), 1.0);
    assert_eq!(
        stack_size(
            &items,
            &Item::material(Substance::Stone, MaterialShape::Cube, Vec3::ONE)
        ),
        1
    );
}

#[test]
fn test_registry_rejects_duplicate_results() {
    let torch = || {
        CraftingRule::Explicit(ExplicitRule::new(
            Item::torch(4),
            vec![Item::resource(Substance::BirchWood, 0.2)],
        ))
    };
    assert!(matches!(
        RuleRegistry::new(vec![torch(), torch()]),
        Err(MinerError::DuplicateRule(_))
    ));
}

#[test]
fn test_builtin_tool_chain() {
    let registry = RuleRegistry::builtin().unwrap();
    let mut inventory = Inventory::new();
    inventory.add_resource(Substance::Iron, 1.0);
    inventory.add_resource(Substance::BirchWood, 1.0);

    let head = Item::crafting(CraftingItemType::PickaxeHead, Substance::Iron);
    let handle = Item::crafting(CraftingItemType::Handle, Substance::BirchWood);
    let pickaxe = Item::tool(ToolType::Pickaxe, Substance::Iron);

    assert!(inventory.craft(&registry, rule_producing(&registry, &head), None));
    assert!(inventory.craft(&registry, rule_producing(&registry, &handle), None));
    assert!(inventory.craft(&registry, rule_producing(&registry, &pickaxe), None));

    assert_eq!(stack_size(inventory.items(), &pickaxe), 1);
    assert_eq!(stack_size(inventory.items(), &head), 0);
    assert_eq!(resource_volume(inventory.items(), Substance::Iron), 0.5);

    assert!(inventory.dismantle(&registry, &pickaxe));
    assert_eq!(stack_size(inventory.items(), &head), 1);
    assert_eq!(stack_size(inventory.items(), &handle), 1);
}

#[test]
fn test_builtin_components_are_used() {
    let registry = RuleRegistry::builtin().unwrap();
    let components: Vec<Item> = registry
        .iter()
        .map(|(_, rule)| rule.result())
        .filter(|item| matches!(item, Item::Crafting(_)))
        .collect();
    assert!(!components.is_empty());

    for component in &components {
        let used = registry.iter().any(|(_, rule)| {
            rule.ingredients()
                .iter()
                .any(|ingredient| ingredient.same_identity(component))
        });
        assert!(used, "no rule consumes {component}");
    }
}

#[test]
fn test_builtin_material_rules_follow_reference_size() {
    let registry = RuleRegistry::builtin().unwrap();
    let sphere = Item::material(Substance::Dirt, MaterialShape::Sphere, Vec3::splat(0.25));
    let id = rule_producing(&registry, &sphere);
    let rule = registry.get(id).unwrap();

    let cost = MaterialShape::Sphere.volume(Vec3::splat(0.25));
    assert_eq!(
        rule.resolve(Some(&sphere)).ingredients,
        vec![Item::resource(Substance::Dirt, cost)]
    );
    assert!(rule.could_be_dismantled(&sphere));
}

#[test]
fn test_craftable_listing() {
    let registry = RuleRegistry::builtin().unwrap();
    let items = resources(&[(Substance::BirchWood, 0.2)]);
    let results: Vec<Item> = registry
        .craftable(&items)
        .into_iter()
        .filter_map(|id| registry.get(id).map(CraftingRule::result))
        .collect();

    // 0.2 m³ buys four torches or one 0.5 m cube, nothing bigger.
    assert_eq!(results.len(), 2);
    assert!(results.contains(&Item::torch(4)));
    assert!(results.contains(&Item::material(
        Substance::BirchWood,
        MaterialShape::Cube,
        Vec3::splat(0.5)
    )));
}
