//! Player-level gameplay state.
//!
//! A [`Miner`] owns everything one player interacts with: the inventory,
//! the crafting rules and the digging controller. The UI and input layers
//! only talk to the miner; it forwards to the subsystems and reports what
//! happened as [`MinerEvent`]s.

use glam::Vec3;

use crate::actions::{plan_use, ItemUse, RayHit};
use crate::collection::ItemId;
use crate::config::GameplayConfig;
use crate::crafting::{RuleId, RuleRegistry};
use crate::digging::{DigEvent, DigMode, DiggingController, DroneId, TerrainEngine};
use crate::error::Result;
use crate::inventory::{Inventory, ItemView, RuleView};
use crate::item::Item;
use crate::persistence::InventorySave;
use crate::substance::Substance;

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum MinerEvent {
    /// Reaction to a terrain report.
    Dig(DigEvent),
    /// A terrain modification was submitted.
    TerrainModified,
    /// A drone was placed.
    DronePlaced(DroneId),
    /// A torch was placed.
    TorchPlaced {
        /// Position.
        position: Vec3,
        /// Surface normal.
        normal: Vec3,
    },
    /// The pipette picked up a substance.
    Sampled(Substance),
    /// An item left the inventory into the world.
    ItemDropped(Item),
}

/// One player's gameplay state.
#[derive(Debug)]
pub struct Miner {
    config: GameplayConfig,
    registry: RuleRegistry,
    inventory: Inventory,
    digging: DiggingController,
    sampled: Option<Substance>,
}

impl Miner {
    /// Create a miner with the configured starting inventory.
    pub fn new(
        engine: &mut impl TerrainEngine,
        config: GameplayConfig,
        registry: RuleRegistry,
    ) -> Result<Self> {
        let inventory = Inventory::default_inventory(&config)?;
        Ok(Self::with_inventory(engine, config, registry, inventory))
    }

    /// Create a miner with a given inventory.
    pub fn with_inventory(
        engine: &mut impl TerrainEngine,
        config: GameplayConfig,
        registry: RuleRegistry,
        inventory: Inventory,
    ) -> Self {
        Self {
            digging: DiggingController::new(engine),
            config,
            registry,
            inventory,
            sampled: None,
        }
    }

    /// Gameplay configuration.
    #[must_use]
    pub fn config(&self) -> &GameplayConfig {
        &self.config
    }

    /// Crafting rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Digging state.
    #[must_use]
    pub fn digging(&self) -> &DiggingController {
        &self.digging
    }

    /// Digging state, for wiring the terrain engine's report sender.
    pub fn digging_mut(&mut self) -> &mut DiggingController {
        &mut self.digging
    }

    /// Substance last picked up with the pipette.
    #[must_use]
    pub fn sampled_substance(&self) -> Option<Substance> {
        self.sampled
    }

    /// Advance drones and apply pending terrain reports.
    pub fn update(&mut self, dt: f32) -> Vec<MinerEvent> {
        self.digging.drones_mut().update(dt, &self.config.drone);
        self.digging
            .process_events(&mut self.inventory)
            .into_iter()
            .map(MinerEvent::Dig)
            .collect()
    }

    /// Use the selected item at `hit`.
    pub fn use_selected(
        &mut self,
        engine: &mut impl TerrainEngine,
        hit: &RayHit,
    ) -> Result<Option<MinerEvent>> {
        let Some(selected) = self.inventory.selected_item() else {
            return Ok(None);
        };
        let item = selected.item.clone();
        let Some(action) = plan_use(&item, hit, &self.config.digging) else {
            return Ok(None);
        };

        let event = match action {
            ItemUse::Dig { shape, filter } => self
                .digging
                .dig_shape(engine, shape, DigMode::Subtract { filter })
                .then_some(MinerEvent::TerrainModified),
            ItemUse::Place {
                shape,
                substance,
                consume_unit,
            } => {
                if !consume_unit {
                    let cost = Item::resource(substance, shape.volume());
                    if !self.inventory.items().contains_item(&cost) {
                        tracing::debug!(item = %cost, "Not enough resource to place");
                        return Ok(None);
                    }
                }
                let mode = DigMode::Add {
                    substance,
                    charge_resources: !consume_unit,
                };
                let placed = self.digging.dig_shape(engine, shape, mode);
                if placed && consume_unit {
                    self.consume_one(&item);
                }
                placed.then_some(MinerEvent::TerrainModified)
            }
            ItemUse::PlaceDrone {
                drone_type,
                position,
            } => {
                let id = self.digging.drones_mut().place(drone_type, position)?;
                self.consume_one(&item);
                Some(MinerEvent::DronePlaced(id))
            }
            ItemUse::PlaceTorch { position, normal } => {
                self.consume_one(&item);
                Some(MinerEvent::TorchPlaced { position, normal })
            }
            ItemUse::Sample { substance } => {
                self.sampled = Some(substance);
                Some(MinerEvent::Sampled(substance))
            }
        };
        Ok(event)
    }

    /// Remove one unit of an item that was just read from the inventory.
    fn consume_one(&mut self, item: &Item) {
        let removed = self.inventory.remove_item(&item.single(), false);
        assert!(removed, "selected item {item} could not be consumed");
    }

    /// Remove a drone.
    pub fn remove_drone(&mut self, id: DroneId) -> Result<()> {
        self.digging.drones_mut().remove(id).map(|_| ())
    }

    /// Select a quick-access slot.
    pub fn select_slot(&mut self, slot: usize) -> Result<()> {
        self.inventory.select_slot(slot)
    }

    /// Craft a rule. Returns `false` if it is not affordable.
    pub fn craft(&mut self, rule: RuleId, reference: Option<&Item>) -> bool {
        self.inventory.craft(&self.registry, rule, reference)
    }

    /// Dismantle one unit of `item`.
    pub fn dismantle(&mut self, item: &Item) -> bool {
        self.inventory.dismantle(&self.registry, item)
    }

    /// Drop an item into the world.
    pub fn drop_item(&mut self, id: ItemId, whole_stack: bool) -> Option<MinerEvent> {
        self.inventory
            .drop_item(id, whole_stack)
            .map(MinerEvent::ItemDropped)
    }

    /// Item projections for the inventory screen.
    #[must_use]
    pub fn item_views(&self) -> Vec<ItemView> {
        self.inventory.item_views(&self.registry)
    }

    /// Rule projections for the crafting screen.
    #[must_use]
    pub fn rule_views(&self) -> Vec<RuleView> {
        self.inventory.rule_views(&self.registry)
    }

    /// Capture the inventory for saving.
    #[must_use]
    pub fn save(&self) -> InventorySave {
        InventorySave::capture(&self.inventory, &self.registry)
    }
}
