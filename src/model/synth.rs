//! The immutable craft configuration shared by every simulation attempt.
//!
//! [`Synth`] bundles the crafter, the recipe and the global options, and
//! owns the base gain formulas plus the level and condition tables.

use super::crafter::Crafter;
use super::recipe::Recipe;
use crate::error::{Result, SolverError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Objective {
    /// Maximize final quality up to the recipe target.
    #[default]
    MaximizeQuality,
    /// Finish the craft while keeping as much CP and durability as possible.
    LeftoverResources,
}

/// Effective crafter level for class levels 51..=90.
const LEVEL_TABLE: [u32; 40] = [
    120, 125, 130, 133, 136, 139, 142, 145, 148, 150, // 51-60
    260, 265, 270, 273, 276, 279, 282, 285, 288, 290, // 61-70
    390, 395, 400, 403, 406, 409, 412, 415, 418, 420, // 71-80
    517, 520, 525, 530, 535, 540, 545, 550, 555, 560, // 81-90
];

/// Maps a class level to the effective level used by the gain formulas.
///
/// Levels outside the table map to themselves.
pub fn effective_level(level: u32) -> u32 {
    match level {
        51..=90 => LEVEL_TABLE[(level - 51) as usize],
        _ => level,
    }
}

/// Craft configuration: crafter, recipe and global options.
#[derive(Debug, Clone, PartialEq)]
pub struct Synth {
    pub crafter: Crafter,
    pub recipe: Recipe,
    /// Budget of condition-gated action uses.
    pub max_trick_uses: u32,
    /// Required reliability as a fraction in `[0, 1]`.
    pub reliability_target: f64,
    /// Whether material-condition randomness is modeled.
    pub use_conditions: bool,
    /// Maximum number of applied actions; `None` for unlimited.
    pub max_length: Option<usize>,
    pub objective: Objective,
}

impl Synth {
    /// Creates a configuration with no trick uses, full reliability, no
    /// condition modeling, no length limit and the quality objective.
    pub fn new(crafter: Crafter, recipe: Recipe) -> Self {
        Self {
            crafter,
            recipe,
            max_trick_uses: 0,
            reliability_target: 1.0,
            use_conditions: false,
            max_length: None,
            objective: Objective::MaximizeQuality,
        }
    }

    /// Sets the trick use budget.
    pub fn with_max_trick_uses(mut self, n: u32) -> Self {
        self.max_trick_uses = n;
        self
    }

    /// Sets the reliability target from a percentage.
    pub fn with_reliability_percent(mut self, percent: u32) -> Self {
        self.reliability_target = percent as f64 / 100.0;
        self
    }

    /// Enables or disables condition modeling.
    pub fn with_conditions(mut self, use_conditions: bool) -> Self {
        self.use_conditions = use_conditions;
        self
    }

    /// Sets the maximum sequence length (`0` disables the limit).
    pub fn with_max_length(mut self, n: usize) -> Self {
        self.max_length = (n > 0).then_some(n);
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Returns `true` in leftover-resources mode.
    pub fn solve_for_leftovers(&self) -> bool {
        self.objective == Objective::LeftoverResources
    }

    /// Validates the recipe, the crafter and the options.
    pub fn validate(&self) -> Result<()> {
        self.recipe.validate().map_err(SolverError::InvalidConfig)?;
        if self.crafter.actions.is_empty() {
            return Err(SolverError::InvalidConfig(
                "crafter must have at least one action".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.reliability_target) {
            return Err(SolverError::InvalidConfig(
                "reliability target must be within 0..=100 percent".into(),
            ));
        }
        if matches!(self.max_length, Some(n) if n < 3) {
            return Err(SolverError::InvalidConfig(
                "max_length must be at least 3 when set".into(),
            ));
        }
        Ok(())
    }

    /// Effective crafter level.
    pub fn effective_crafter_level(&self) -> u32 {
        effective_level(self.crafter.level)
    }

    /// Floor-rounded base progress gain for the given craftsmanship.
    pub fn base_progress(&self, eff_crafter_level: u32, craftsmanship: u32) -> f64 {
        let recipe = &self.recipe;
        let base = (craftsmanship as f64 * 10.0) / recipe.progress_divider as f64 + 2.0;
        if eff_crafter_level <= recipe.level {
            ((base * recipe.progress_modifier as f64) / 100.0).floor()
        } else {
            base.floor()
        }
    }

    /// Floor-rounded base quality gain for the given control.
    pub fn base_quality(&self, eff_crafter_level: u32, control: u32) -> f64 {
        let recipe = &self.recipe;
        let base = (control as f64 * 10.0) / recipe.quality_divider as f64 + 35.0;
        if eff_crafter_level <= recipe.level {
            ((base * recipe.quality_modifier as f64) / 100.0).floor()
        } else {
            base.floor()
        }
    }

    /// Per-turn probability of a "good" condition.
    pub fn probability_of_good(&self) -> f64 {
        let quality_assurance = self.crafter.level >= 63;
        let level = self.recipe.level;
        let (without, with) = if level >= 300 {
            (0.10, 0.11)
        } else if level >= 276 {
            (0.15, 0.17)
        } else if level >= 255 {
            (0.20, 0.22)
        } else if level >= 150 {
            (0.10, 0.11)
        } else if level >= 136 {
            (0.15, 0.17)
        } else {
            (0.25, 0.27)
        };
        if quality_assurance {
            with
        } else {
            without
        }
    }

    /// Per-turn probability of an "excellent" condition.
    pub fn probability_of_excellent(&self) -> f64 {
        let level = self.recipe.level;
        if level >= 300 || (150..255).contains(&level) {
            0.01
        } else {
            0.02
        }
    }
}
