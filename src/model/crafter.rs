//! Crafter stats and available actions.

use crate::actions::ActionId;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Crafting class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrafterClass {
    #[default]
    Carpenter,
    Blacksmith,
    Armorer,
    Goldsmith,
    Leatherworker,
    Weaver,
    Alchemist,
    Culinarian,
}

impl CrafterClass {
    /// Three-letter abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            CrafterClass::Carpenter => "CRP",
            CrafterClass::Blacksmith => "BSM",
            CrafterClass::Armorer => "ARM",
            CrafterClass::Goldsmith => "GSM",
            CrafterClass::Leatherworker => "LTW",
            CrafterClass::Weaver => "WVR",
            CrafterClass::Alchemist => "ALC",
            CrafterClass::Culinarian => "CUL",
        }
    }
}

impl fmt::Display for CrafterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Crafter stats and the actions the search may draw from.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Crafter {
    pub class: CrafterClass,
    pub level: u32,
    pub craftsmanship: u32,
    pub control: u32,
    pub crafting_points: u32,
    pub specialist: bool,
    pub actions: Vec<ActionId>,
}

impl Crafter {
    /// Returns `true` if `action` is in the crafter's action set.
    pub fn has_action(&self, action: ActionId) -> bool {
        self.actions.contains(&action)
    }
}
