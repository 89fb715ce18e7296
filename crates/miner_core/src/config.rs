//! Gameplay tuning loaded from RON.
//!
//! Every field has a serde default, so a config file only needs to name the
//! values it changes. [`GameplayConfig::default`] matches the shipped
//! `assets/data/gameplay.ron`.

use serde::{Deserialize, Serialize};

use crate::data::{parse_ron, ItemData};
use crate::error::{MinerError, Result};
use crate::item::{Item, ToolType};
use crate::substance::Substance;

/// Drone movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Speed towards the target position in m/s.
    pub speed: f32,
    /// Amplitude of the idle hover oscillation in m.
    pub hover_amplitude: f32,
    /// Frequency of the idle hover oscillation in Hz.
    pub hover_frequency: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            hover_amplitude: 0.25,
            hover_frequency: 0.5,
        }
    }
}

/// Digging and placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiggingConfig {
    /// Dig sphere radius of the shovel.
    pub shovel_radius: f32,
    /// Dig sphere radius of the pickaxe.
    pub pickaxe_radius: f32,
    /// Dig sphere radius of the god's shovel.
    pub gods_shovel_radius: f32,
    /// Radius of the sphere placed by the pipette and resources.
    pub place_radius: f32,
    /// Height above the hit point at which drones are placed.
    pub drone_hover_height: f32,
}

impl Default for DiggingConfig {
    fn default() -> Self {
        Self {
            shovel_radius: 1.0,
            pickaxe_radius: 0.6,
            gods_shovel_radius: 4.0,
            place_radius: 0.5,
            drone_hover_height: 1.5,
        }
    }
}

impl DiggingConfig {
    /// Dig radius of a digging tool, `None` for tools that do not dig.
    #[must_use]
    pub fn dig_radius(&self, tool: ToolType) -> Option<f32> {
        match tool {
            ToolType::Shovel => Some(self.shovel_radius),
            ToolType::Pickaxe => Some(self.pickaxe_radius),
            ToolType::GodsShovel => Some(self.gods_shovel_radius),
            ToolType::Axe | ToolType::Hammer | ToolType::DroneChain => None,
        }
    }
}

/// Complete gameplay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Drone tuning.
    pub drone: DroneConfig,
    /// Digging tuning.
    pub digging: DiggingConfig,
    /// Items of a fresh inventory.
    pub starting_items: Vec<ItemData>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        use crate::item::ToolType::{DroneChain, Pickaxe, Shovel};
        Self {
            drone: DroneConfig::default(),
            digging: DiggingConfig::default(),
            starting_items: vec![
                ItemData::Tool {
                    tool: Shovel,
                    substance: Substance::Copper,
                    stack: 1,
                },
                ItemData::Tool {
                    tool: Pickaxe,
                    substance: Substance::Copper,
                    stack: 1,
                },
                ItemData::Tool {
                    tool: DroneChain,
                    substance: Substance::Copper,
                    stack: 4,
                },
                ItemData::Torch { stack: 10 },
                ItemData::Resource {
                    substance: Substance::BirchWood,
                    volume: 1.0,
                },
                ItemData::Pipette,
            ],
        }
    }
}

impl GameplayConfig {
    /// Parse and validate a config from RON text.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        let config: Self = parse_ron(source_name, text)?;
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(MinerError::InvalidConfig(errors.join("; ")));
        }
        Ok(config)
    }

    /// Validate tuning values.
    ///
    /// Returns a list of validation errors, empty if valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let positive = [
            ("drone.speed", self.drone.speed),
            ("drone.hover_frequency", self.drone.hover_frequency),
            ("digging.shovel_radius", self.digging.shovel_radius),
            ("digging.pickaxe_radius", self.digging.pickaxe_radius),
            ("digging.gods_shovel_radius", self.digging.gods_shovel_radius),
            ("digging.place_radius", self.digging.place_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.drone.hover_amplitude.is_finite() || self.drone.hover_amplitude < 0.0 {
            errors.push(format!(
                "drone.hover_amplitude must not be negative, got {}",
                self.drone.hover_amplitude
            ));
        }
        if !self.digging.drone_hover_height.is_finite() {
            errors.push("digging.drone_hover_height must be finite".to_string());
        }

        for (index, data) in self.starting_items.iter().enumerate() {
            if let Err(e) = data.to_item() {
                errors.push(format!("starting_items[{index}]: {e}"));
            }
        }

        errors
    }

    /// Items of a fresh inventory.
    pub fn starting_items(&self) -> Result<Vec<Item>> {
        self.starting_items.iter().map(ItemData::to_item).collect()
    }
}
