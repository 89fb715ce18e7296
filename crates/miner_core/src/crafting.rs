//! Crafting and dismantling rules.
//!
//! A [`CraftingRule`] turns a list of ingredient templates into a result
//! item, and optionally back again. Rules are evaluated against an
//! [`ItemCollection`]; craftability is decided by simulating every
//! ingredient removal on a throwaway clone, so checking never changes the
//! real collection.
//!
//! [`MaterialRule`]s are parametric: their ingredients and result depend on
//! a size. When asked about a reference material item of the same
//! substance and shape, the rule is evaluated at the reference's size via
//! [`CraftingRule::resolve`]. The configured rule is never modified.
//!
//! Rules live in an immutable [`RuleRegistry`]. Which rules a player has
//! discovered is tracked separately in a [`CraftingBook`].

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collection::ItemCollection;
use crate::data::RecipeTable;
use crate::error::{MinerError, Result};
use crate::item::{Item, MaterialShape, RecipeItem};
use crate::substance::Substance;

/// Index of a rule inside a [`RuleRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub usize);

/// Rule with fixed ingredients and result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitRule {
    /// Item produced.
    pub result: Item,
    /// Ingredients consumed, in order.
    pub ingredients: Vec<Item>,
    /// Items returned when the result is dismantled.
    pub dismantle_result: Option<Vec<Item>>,
    /// Whether the result takes the substance of the first ingredient.
    pub carry_over_substance: bool,
}

impl ExplicitRule {
    /// Create a rule without a dismantle result.
    #[must_use]
    pub fn new(result: Item, ingredients: Vec<Item>) -> Self {
        Self {
            result,
            ingredients,
            dismantle_result: None,
            carry_over_substance: false,
        }
    }

    /// Add a dismantle result.
    #[must_use]
    pub fn with_dismantle(mut self, dismantle_result: Vec<Item>) -> Self {
        self.dismantle_result = Some(dismantle_result);
        self
    }

    /// Make the result inherit the first ingredient's substance.
    #[must_use]
    pub fn with_carry_over(mut self) -> Self {
        self.carry_over_substance = true;
        self
    }

    /// Rule described by a recipe item.
    #[must_use]
    pub fn from_recipe(recipe: &RecipeItem) -> Self {
        Self {
            result: (*recipe.result).clone(),
            ingredients: recipe.ingredients.clone(),
            dismantle_result: None,
            carry_over_substance: recipe.carry_over_substance,
        }
    }

    /// Result after applying substance carry-over.
    fn effective_result(&self) -> Item {
        let substance = self
            .carry_over_substance
            .then(|| self.ingredients.first().and_then(Item::substance))
            .flatten();
        match substance {
            Some(substance) => self.result.clone().with_substance(substance),
            None => self.result.clone(),
        }
    }
}

/// Rule producing shaped material from resource volume.
///
/// One unit of material costs exactly its shape volume in resource of the
/// same substance; dismantling returns the same volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRule {
    /// Substance of both the resource and the material.
    pub substance: Substance,
    /// Shape produced.
    pub shape: MaterialShape,
    /// Configured size.
    pub size: Vec3,
}

impl MaterialRule {
    /// Create a material rule.
    #[must_use]
    pub const fn new(substance: Substance, shape: MaterialShape, size: Vec3) -> Self {
        Self {
            substance,
            shape,
            size,
        }
    }

    /// Size to evaluate at: the reference's size if it is a material item
    /// of this rule's substance and shape, the configured size otherwise.
    #[must_use]
    pub fn size_for(&self, reference: Option<&Item>) -> Vec3 {
        match reference {
            Some(Item::Material(m)) if m.substance == self.substance && m.shape == self.shape => {
                m.size
            }
            _ => self.size,
        }
    }

    fn cost_at(&self, size: Vec3) -> Vec<Item> {
        vec![Item::resource(self.substance, self.shape.volume(size))]
    }
}

/// Ingredients, result and dismantle result of a rule at one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
    /// Item produced.
    pub result: Item,
    /// Ingredients consumed, in order.
    pub ingredients: Vec<Item>,
    /// Items returned on dismantle.
    pub dismantle_result: Option<Vec<Item>>,
}

/// A crafting rule.
#[derive(Debug, Clone, PartialEq)]
pub enum CraftingRule {
    /// Fixed ingredients and result.
    Explicit(ExplicitRule),
    /// Parametric shaped material.
    Material(MaterialRule),
}

impl CraftingRule {
    /// Concrete ingredients and result, evaluated for `reference`.
    #[must_use]
    pub fn resolve(&self, reference: Option<&Item>) -> ResolvedRule {
        match self {
            Self::Explicit(rule) => ResolvedRule {
                result: rule.effective_result(),
                ingredients: rule.ingredients.clone(),
                dismantle_result: rule.dismantle_result.clone(),
            },
            Self::Material(rule) => {
                let size = rule.size_for(reference);
                ResolvedRule {
                    result: Item::material(rule.substance, rule.shape, size),
                    ingredients: rule.cost_at(size),
                    dismantle_result: Some(rule.cost_at(size)),
                }
            }
        }
    }

    /// Result at the configured parameters.
    #[must_use]
    pub fn result(&self) -> Item {
        self.resolve(None).result
    }

    /// Ingredients at the configured parameters.
    #[must_use]
    pub fn ingredients(&self) -> Vec<Item> {
        self.resolve(None).ingredients
    }

    /// Stable key identifying what the rule produces, ignoring material size.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Explicit(rule) => rule.effective_result().identifier(),
            Self::Material(rule) => material_key(rule.substance, rule.shape),
        }
    }

    /// Whether every ingredient could be removed from `collection`.
    #[must_use]
    pub fn is_craftable(&self, reference: Option<&Item>, collection: &ItemCollection) -> bool {
        let resolved = self.resolve(reference);
        let mut trial = collection.clone();
        resolved
            .ingredients
            .iter()
            .all(|ingredient| trial.remove_item(ingredient, false))
    }

    /// Consume the ingredients and add the result to `collection`.
    ///
    /// # Panics
    ///
    /// Panics if the rule is not craftable for the same inputs. Check
    /// [`CraftingRule::is_craftable`] first.
    pub fn craft(&self, reference: Option<&Item>, collection: &mut ItemCollection) {
        assert!(
            self.is_craftable(reference, collection),
            "crafted {} without the required ingredients",
            self.key()
        );
        let resolved = self.resolve(reference);
        for ingredient in &resolved.ingredients {
            let removed = collection.remove_item(ingredient, false);
            assert!(removed, "verified ingredient {ingredient} could not be removed");
        }
        tracing::debug!(result = %resolved.result, "Crafted item");
        collection.add_item(resolved.result);
    }

    /// Whether this rule produces items compatible with `item`, ignoring
    /// resource availability.
    #[must_use]
    pub fn could_be_crafted(&self, item: &Item) -> bool {
        self.resolve(Some(item)).result.same_identity(item)
    }

    /// Whether `item` can be dismantled by this rule, ignoring availability.
    #[must_use]
    pub fn could_be_dismantled(&self, item: &Item) -> bool {
        let resolved = self.resolve(Some(item));
        resolved.dismantle_result.is_some() && resolved.result.same_identity(item)
    }

    /// Whether one unit of `item` is held and can be dismantled.
    #[must_use]
    pub fn is_dismantlable(&self, item: &Item, collection: &ItemCollection) -> bool {
        self.could_be_dismantled(item) && collection.contains_item(&item.single())
    }

    /// Remove one unit of `item` and add the dismantle result.
    ///
    /// # Panics
    ///
    /// Panics if [`CraftingRule::is_dismantlable`] is false.
    pub fn dismantle(&self, item: &Item, collection: &mut ItemCollection) {
        assert!(
            self.is_dismantlable(item, collection),
            "dismantled {item} without holding it"
        );
        let removed = collection.remove_item(&item.single(), false);
        assert!(removed, "verified item {item} could not be removed");
        let parts = self.resolve(Some(item)).dismantle_result.unwrap_or_default();
        for part in parts {
            collection.add_item(part);
        }
        tracing::debug!(item = %item, "Dismantled item");
    }
}

fn material_key(substance: Substance, shape: MaterialShape) -> String {
    format!("Material-{}-{}", substance.name(), shape.name())
}

/// Immutable set of crafting rules with lookup by result.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<CraftingRule>,
    by_key: HashMap<String, RuleId>,
}

impl RuleRegistry {
    /// Build a registry, rejecting rules without ingredients and rules
    /// whose result another rule already produces.
    pub fn new(rules: Vec<CraftingRule>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(rules.len());
        for (index, rule) in rules.iter().enumerate() {
            let key = rule.key();
            if rule.ingredients().is_empty() {
                return Err(MinerError::EmptyIngredients(key));
            }
            if by_key.insert(key.clone(), RuleId(index)).is_some() {
                return Err(MinerError::DuplicateRule(key));
            }
        }
        tracing::debug!(rules = rules.len(), "Built crafting rule registry");
        Ok(Self { rules, by_key })
    }

    /// Build a registry from a data table.
    pub fn from_table(table: &RecipeTable) -> Result<Self> {
        Self::new(table.to_rules()?)
    }

    /// Registry of the rules shipped with the game.
    pub fn builtin() -> Result<Self> {
        Self::from_table(&RecipeTable::builtin()?)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule by id.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&CraftingRule> {
        self.rules.get(id.0)
    }

    /// All rules with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &CraftingRule)> {
        self.rules.iter().enumerate().map(|(i, r)| (RuleId(i), r))
    }

    /// Rule by its [`CraftingRule::key`].
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<RuleId> {
        self.by_key.get(key).copied()
    }

    /// Rule that produces `item`, if any.
    #[must_use]
    pub fn rule_for(&self, item: &Item) -> Option<RuleId> {
        let key = match item {
            Item::Material(m) => material_key(m.substance, m.shape),
            other => other.identifier(),
        };
        self.by_key(&key)
            .filter(|id| self.rules[id.0].could_be_crafted(item))
    }

    /// Rules currently craftable from `collection` at their configured
    /// parameters.
    #[must_use]
    pub fn craftable(&self, collection: &ItemCollection) -> Vec<RuleId> {
        self.iter()
            .filter(|(_, rule)| rule.is_craftable(None, collection))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Which rules a player has discovered.
///
/// Discovery is a one-way latch set by the first successful craft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftingBook {
    discovered: HashSet<RuleId>,
}

impl CraftingBook {
    /// Create a book with nothing discovered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `rule` has been discovered.
    #[must_use]
    pub fn is_discovered(&self, rule: RuleId) -> bool {
        self.discovered.contains(&rule)
    }

    /// Mark `rule` as discovered. Returns `true` on first discovery.
    pub fn discover(&mut self, rule: RuleId) -> bool {
        self.discovered.insert(rule)
    }

    /// Discovered rules in id order.
    #[must_use]
    pub fn discovered(&self) -> Vec<RuleId> {
        let mut ids: Vec<RuleId> = self.discovered.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Craft `rule` if it is craftable. Returns `false` and leaves
    /// `collection` untouched if it is unknown or unaffordable.
    pub fn craft(
        &mut self,
        registry: &RuleRegistry,
        rule: RuleId,
        reference: Option<&Item>,
        collection: &mut ItemCollection,
    ) -> bool {
        let Some(crafting_rule) = registry.get(rule) else {
            tracing::warn!(rule = rule.0, "Craft requested for unknown rule");
            return false;
        };
        if !crafting_rule.is_craftable(reference, collection) {
            tracing::debug!(rule = %crafting_rule.key(), "Not enough ingredients to craft");
            return false;
        }
        crafting_rule.craft(reference, collection);
        if self.discover(rule) {
            tracing::info!(rule = %crafting_rule.key(), "Discovered crafting rule");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{CraftingItemType, Quantity, ToolType};

    fn pickaxe_rule() -> CraftingRule {
        CraftingRule::Explicit(ExplicitRule::new(
            Item::tool(ToolType::Pickaxe, Substance::Iron),
            vec![
                Item::resource(Substance::Iron, 1.0),
                Item::resource(Substance::BirchWood, 1.0),
            ],
        ))
    }

    fn stone_cube_rule() -> CraftingRule {
        CraftingRule::Material(MaterialRule::new(
            Substance::Stone,
            MaterialShape::Cube,
            Vec3::ONE,
        ))
    }

    fn volume_of(collection: &ItemCollection, substance: Substance) -> f32 {
        collection
            .iter()
            .find_map(|e| match &e.item {
                Item::Resource(r) if r.substance == substance => Some(r.volume),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    #[test]
    fn test_is_craftable_does_not_mutate() {
        let rule = pickaxe_rule();
        let mut items = ItemCollection::new();
        items.add_item(Item::resource(Substance::Iron, 5.0));
        items.add_item(Item::resource(Substance::BirchWood, 5.0));
        items.drain_events();

        assert!(rule.is_craftable(None, &items));
        assert_eq!(volume_of(&items, Substance::Iron), 5.0);
        assert!(items.drain_events().is_empty());
    }

    #[test]
    fn test_is_craftable_requires_every_ingredient() {
        let rule = pickaxe_rule();
        let mut items = ItemCollection::new();
        items.add_item(Item::resource(Substance::Iron, 5.0));
        assert!(!rule.is_craftable(None, &items));
    }

    #[test]
    fn test_craft_consumes_and_produces() {
        let rule = pickaxe_rule();
        let mut items = ItemCollection::new();
        items.add_item(Item::resource(Substance::Iron, 5.0));
        items.add_item(Item::resource(Substance::BirchWood, 5.0));

        rule.craft(None, &mut items);

        assert_eq!(volume_of(&items, Substance::Iron), 4.0);
        assert_eq!(volume_of(&items, Substance::BirchWood), 4.0);
        assert!(items.contains_item(&Item::tool(ToolType::Pickaxe, Substance::Iron)));
    }

    #[test]
    #[should_panic(expected = "without the required ingredients")]
    fn test_craft_without_ingredients_panics() {
        let mut items = ItemCollection::new();
        pickaxe_rule().craft(None, &mut items);
    }

    #[test]
    fn test_material_rule_evaluates_at_reference_size() {
        let rule = stone_cube_rule();
        let big = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));

        let mut items = ItemCollection::new();
        items.add_item(Item::resource(Substance::Stone, 8.0));
        assert!(rule.is_craftable(Some(&big), &items));

        let mut poor = ItemCollection::new();
        poor.add_item(Item::resource(Substance::Stone, 1.0));
        assert!(rule.is_craftable(None, &poor));
        assert!(!rule.is_craftable(Some(&big), &poor));

        let CraftingRule::Material(configured) = &rule else {
            unreachable!()
        };
        assert_eq!(configured.size, Vec3::ONE);
    }

    #[test]
    fn test_material_rule_ignores_other_references() {
        let rule = stone_cube_rule();
        let sphere = Item::material(Substance::Stone, MaterialShape::Sphere, Vec3::splat(2.0));
        let resolved = rule.resolve(Some(&sphere));
        assert_eq!(
            resolved.ingredients,
            vec![Item::resource(Substance::Stone, 1.0)]
        );
    }

    #[test]
    fn test_could_be_crafted() {
        let rule = stone_cube_rule();
        let big = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));
        assert!(rule.could_be_crafted(&big));
        assert!(!rule.could_be_crafted(&Item::resource(Substance::Stone, 1.0)));
        assert!(pickaxe_rule().could_be_crafted(&Item::tool(ToolType::Pickaxe, Substance::Iron)));
        assert!(!pickaxe_rule().could_be_crafted(&Item::tool(ToolType::Pickaxe, Substance::Gold)));
    }

    #[test]
    fn test_dismantle_returns_volume() {
        let rule = stone_cube_rule();
        let big = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(2.0));
        let mut items = ItemCollection::new();
        items.add_item(big.clone().with_stack(2));

        assert!(rule.is_dismantlable(&big, &items));
        rule.dismantle(&big, &mut items);

        assert_eq!(volume_of(&items, Substance::Stone), 8.0);
        let remaining = items
            .iter()
            .find(|e| matches!(e.item, Item::Material(_)))
            .unwrap();
        assert_eq!(remaining.item.quantity(), Quantity::Stack(1));
    }

    #[test]
    fn test_explicit_rule_without_dismantle_result() {
        let rule = pickaxe_rule();
        let pickaxe = Item::tool(ToolType::Pickaxe, Substance::Iron);
        let mut items = ItemCollection::new();
        items.add_item(pickaxe.clone());
        assert!(!rule.could_be_dismantled(&pickaxe));
        assert!(!rule.is_dismantlable(&pickaxe, &items));
    }

    #[test]
    fn test_carry_over_substance() {
        let rule = ExplicitRule::new(
            Item::tool(ToolType::Axe, Substance::Iron),
            vec![
                Item::crafting(CraftingItemType::AxeHead, Substance::Copper),
                Item::crafting(CraftingItemType::Handle, Substance::BirchWood),
            ],
        )
        .with_carry_over();
        let rule = CraftingRule::Explicit(rule);
        assert_eq!(rule.result().substance(), Some(Substance::Copper));
    }

    #[test]
    fn test_from_recipe() {
        let recipe = Item::recipe(
            Item::torch(4),
            vec![Item::resource(Substance::OakWood, 0.2)],
            false,
        );
        let Item::Recipe(recipe) = recipe else {
            unreachable!()
        };
        let rule = CraftingRule::Explicit(ExplicitRule::from_recipe(&recipe));
        assert_eq!(rule.result(), Item::torch(4));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let result = RuleRegistry::new(vec![pickaxe_rule(), pickaxe_rule()]);
        assert!(matches!(result, Err(MinerError::DuplicateRule(_))));

        let result = RuleRegistry::new(vec![stone_cube_rule(), stone_cube_rule()]);
        assert!(matches!(result, Err(MinerError::DuplicateRule(_))));
    }

    #[test]
    fn test_registry_rejects_empty_ingredients() {
        let rule = CraftingRule::Explicit(ExplicitRule::new(Item::torch(1), vec![]));
        assert!(matches!(
            RuleRegistry::new(vec![rule]),
            Err(MinerError::EmptyIngredients(_))
        ));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = RuleRegistry::new(vec![pickaxe_rule(), stone_cube_rule()]).unwrap();
        let big = Item::material(Substance::Stone, MaterialShape::Cube, Vec3::splat(3.0));
        assert_eq!(registry.rule_for(&big), Some(RuleId(1)));
        assert_eq!(
            registry.rule_for(&Item::tool(ToolType::Pickaxe, Substance::Iron)),
            Some(RuleId(0))
        );
        assert_eq!(registry.rule_for(&Item::torch(1)), None);
    }

    #[test]
    fn test_book_discovery_latch() {
        let registry = RuleRegistry::new(vec![pickaxe_rule()]).unwrap();
        let mut book = CraftingBook::new();
        let mut items = ItemCollection::new();

        assert!(!book.craft(&registry, RuleId(0), None, &mut items));
        assert!(!book.is_discovered(RuleId(0)));

        items.add_item(Item::resource(Substance::Iron, 2.0));
        items.add_item(Item::resource(Substance::BirchWood, 2.0));
        assert!(book.craft(&registry, RuleId(0), None, &mut items));
        assert!(book.is_discovered(RuleId(0)));

        assert!(book.craft(&registry, RuleId(0), None, &mut items));
        assert!(book.is_discovered(RuleId(0)));
        assert!(!book.craft(&registry, RuleId(0), None, &mut items));
        assert!(book.is_discovered(RuleId(0)));
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = RuleRegistry::builtin().unwrap();
        assert!(!registry.is_empty());
    }
}
