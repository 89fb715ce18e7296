//! Substance catalog.
//!
//! A [`Substance`] names a material kind independent of its shape or
//! quantity. Substances are grouped into a shallow taxonomy of
//! [`SubstanceCategory`] values that only provide shared defaults; the
//! categories themselves are abstract and carry no density.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Density reported by abstract categories.
pub const ABSTRACT_DENSITY: f32 = -1.0;

/// Category a concrete substance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubstanceCategory {
    /// Soil and other loose granular material.
    Loose,
    /// Solid rock.
    Rock,
    /// Metals and ores.
    Metal,
    /// Wood and other plant matter.
    Plant,
}

impl SubstanceCategory {
    /// All categories in catalog order.
    pub const ALL: [Self; 4] = [Self::Loose, Self::Rock, Self::Metal, Self::Plant];

    /// Display name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Loose => "Loose",
            Self::Rock => "Rock",
            Self::Metal => "Metal",
            Self::Plant => "Plant",
        }
    }

    /// Categories are abstract and have no density.
    #[must_use]
    pub const fn mass_density(self) -> f32 {
        ABSTRACT_DENSITY
    }

    /// Icon layer shared by every substance of this category.
    #[must_use]
    pub const fn icon_layer(self) -> &'static str {
        match self {
            Self::Loose => "LooseBase",
            Self::Rock => "RockBase",
            Self::Metal => "MetalBase",
            Self::Plant => "WoodBase",
        }
    }
}

/// A concrete material kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Substance {
    /// Topsoil.
    Dirt,
    /// Desert sand.
    Sand,
    /// Common stone.
    Stone,
    /// Dark volcanic rock.
    Basalt,
    /// Copper ore.
    Copper,
    /// Iron ore.
    Iron,
    /// Gold ore.
    Gold,
    /// Birch wood.
    BirchWood,
    /// Oak wood.
    OakWood,
}

impl Substance {
    /// Every concrete substance in catalog order.
    pub const ALL: [Self; 9] = [
        Self::Dirt,
        Self::Sand,
        Self::Stone,
        Self::Basalt,
        Self::Copper,
        Self::Iron,
        Self::Gold,
        Self::BirchWood,
        Self::OakWood,
    ];

    /// Stable name, used in identifiers and icons.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dirt => "Dirt",
            Self::Sand => "Sand",
            Self::Stone => "Stone",
            Self::Basalt => "Basalt",
            Self::Copper => "Copper",
            Self::Iron => "Iron",
            Self::Gold => "Gold",
            Self::BirchWood => "BirchWood",
            Self::OakWood => "OakWood",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BirchWood => "Birch Wood",
            Self::OakWood => "Oak Wood",
            other => other.name(),
        }
    }

    /// Taxonomy parent.
    #[must_use]
    pub const fn category(self) -> SubstanceCategory {
        match self {
            Self::Dirt | Self::Sand => SubstanceCategory::Loose,
            Self::Stone | Self::Basalt => SubstanceCategory::Rock,
            Self::Copper | Self::Iron | Self::Gold => SubstanceCategory::Metal,
            Self::BirchWood | Self::OakWood => SubstanceCategory::Plant,
        }
    }

    /// Mass density in kg/m³.
    #[must_use]
    pub const fn mass_density(self) -> f32 {
        match self {
            Self::Dirt => 1500.0,
            Self::Sand => 1600.0,
            Self::Stone => 2600.0,
            Self::Basalt => 3000.0,
            Self::Copper => 8960.0,
            Self::Iron => 7874.0,
            Self::Gold => 19_300.0,
            Self::BirchWood => 670.0,
            Self::OakWood => 750.0,
        }
    }

    /// Name of the terrain material registered with the terrain engine.
    #[must_use]
    pub fn terrain_material_name(self) -> String {
        format!("{}/{}", self.category().name(), self.name())
    }

    /// Look up a substance by its stable name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
