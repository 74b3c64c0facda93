//! Closed action identifier enumeration.

use crate::error::SolverError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of catalog entries (real actions plus combos).
pub const ACTION_COUNT: usize = 39;

/// Identifier of a catalog entry.
///
/// The discriminant doubles as the index into the catalog and into the
/// per-state effect tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum ActionId {
    Observe = 0,
    BasicSynthesis,
    BasicSynthesis2,
    CarefulSynthesis,
    RapidSynthesis,
    BasicTouch,
    StandardTouch,
    HastyTouch,
    ByregotsBlessing,
    MastersMend,
    TricksOfTheTrade,
    InnerQuiet,
    Manipulation,
    WasteNot,
    WasteNot2,
    Veneration,
    Innovation,
    GreatStrides,
    PreciseTouch,
    MuscleMemory,
    RapidSynthesis2,
    PrudentTouch,
    FocusedSynthesis,
    FocusedTouch,
    Reflect,
    PreparatoryTouch,
    Groundwork,
    DelicateSynthesis,
    IntensiveSynthesis,
    TrainedEye,
    CarefulSynthesis2,
    Groundwork2,
    AdvancedTouch,
    PrudentSynthesis,
    TrainedFinesse,
    FocusedTouchCombo,
    FocusedSynthesisCombo,
    StandardTouchCombo,
    AdvancedTouchCombo,
}

impl ActionId {
    /// Every identifier in catalog order.
    pub const ALL: [ActionId; ACTION_COUNT] = [
        ActionId::Observe,
        ActionId::BasicSynthesis,
        ActionId::BasicSynthesis2,
        ActionId::CarefulSynthesis,
        ActionId::RapidSynthesis,
        ActionId::BasicTouch,
        ActionId::StandardTouch,
        ActionId::HastyTouch,
        ActionId::ByregotsBlessing,
        ActionId::MastersMend,
        ActionId::TricksOfTheTrade,
        ActionId::InnerQuiet,
        ActionId::Manipulation,
        ActionId::WasteNot,
        ActionId::WasteNot2,
        ActionId::Veneration,
        ActionId::Innovation,
        ActionId::GreatStrides,
        ActionId::PreciseTouch,
        ActionId::MuscleMemory,
        ActionId::RapidSynthesis2,
        ActionId::PrudentTouch,
        ActionId::FocusedSynthesis,
        ActionId::FocusedTouch,
        ActionId::Reflect,
        ActionId::PreparatoryTouch,
        ActionId::Groundwork,
        ActionId::DelicateSynthesis,
        ActionId::IntensiveSynthesis,
        ActionId::TrainedEye,
        ActionId::CarefulSynthesis2,
        ActionId::Groundwork2,
        ActionId::AdvancedTouch,
        ActionId::PrudentSynthesis,
        ActionId::TrainedFinesse,
        ActionId::FocusedTouchCombo,
        ActionId::FocusedSynthesisCombo,
        ActionId::StandardTouchCombo,
        ActionId::AdvancedTouchCombo,
    ];

    /// Position of this identifier in the catalog.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

impl FromStr for ActionId {
    type Err = SolverError;

    /// Parses the camelCase short name (`"muscleMemory"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .iter()
            .copied()
            .find(|id| id.definition().short_name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SolverError::UnknownAction(s.to_string()))
    }
}
