//! The full input record of a solve session.
//!
//! [`Settings`] gathers the recipe, the crafter, the solver parameters and
//! the global options. With the `cli` feature it loads from TOML:
//!
//! ```toml
//! max_trick_uses = 1
//! reliability_percent = 100
//! sequence = ["reflect", "basicTouch", "carefulSynthesis2"]
//!
//! [recipe]
//! level = 640
//! difficulty = 6600
//!
//! [crafter]
//! class = "culinarian"
//! level = 90
//! actions = ["reflect", "basicTouch", "carefulSynthesis2"]
//!
//! [solver]
//! population_size = 8000
//! generations = 2000
//! ```
//!
//! Every field is optional; missing ones take their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::error::{Result, SolverError};
use crate::model::{Crafter, Objective, Recipe, Synth};
use crate::sim::ConditionalHandling;
use crate::solver::SolverConfig;

/// Monte Carlo replays of the winning sequence.
pub const DEFAULT_MONTE_CARLO_RUNS: usize = 600;

/// Input record of one solve session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub recipe: Recipe,
    pub crafter: Crafter,
    pub solver: SolverConfig,

    /// Quality or leftover resources.
    pub objective: Objective,

    /// Budget of condition-gated action uses.
    pub max_trick_uses: u32,

    /// Required probability that every progress step succeeds, in percent.
    pub reliability_percent: u32,

    /// Longest allowed sequence; `0` disables the limit.
    pub max_length: usize,

    /// Model material conditions.
    pub use_conditions: bool,

    /// Starting sequence. Empty means the greedy heuristic seed.
    pub sequence: Vec<ActionId>,

    /// Monte Carlo replays of the winner.
    pub monte_carlo_runs: usize,

    /// Condition-gated action policy for the Monte Carlo replays.
    pub conditional_handling: ConditionalHandling,

    /// Raise the default log level to `debug`.
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recipe: Recipe::default(),
            crafter: Crafter::default(),
            solver: SolverConfig::default(),
            objective: Objective::default(),
            max_trick_uses: 0,
            reliability_percent: 100,
            max_length: 0,
            use_conditions: false,
            sequence: Vec::new(),
            monte_carlo_runs: DEFAULT_MONTE_CARLO_RUNS,
            conditional_handling: ConditionalHandling::default(),
            debug: false,
        }
    }
}

impl Settings {
    /// Parses settings from a TOML document.
    ///
    /// # Errors
    /// Returns [`SolverError::Parse`] on malformed TOML, unknown action
    /// names or mistyped fields.
    #[cfg(feature = "cli")]
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SolverError::Parse(e.to_string()))
    }

    /// The craft configuration these settings describe.
    pub fn synth(&self) -> Synth {
        Synth::new(self.crafter.clone(), self.recipe.clone())
            .with_max_trick_uses(self.max_trick_uses)
            .with_reliability_percent(self.reliability_percent)
            .with_conditions(self.use_conditions)
            .with_max_length(self.max_length)
            .with_objective(self.objective)
    }

    /// Validates the craft, the solver and the session options.
    pub fn validate(&self) -> Result<()> {
        self.synth().validate()?;
        self.solver.validate().map_err(SolverError::InvalidConfig)?;
        if self.monte_carlo_runs == 0 {
            return Err(SolverError::InvalidConfig(
                "monte_carlo_runs must be at least 1".into(),
            ));
        }
        if let Some(id) = self
            .sequence
            .iter()
            .find(|id| !self.crafter.has_action(**id))
        {
            return Err(SolverError::InvalidConfig(format!(
                "starting sequence uses {id}, which the crafter lacks"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId::*;

    fn valid() -> Settings {
        Settings {
            crafter: Crafter {
                level: 90,
                craftsmanship: 4041,
                control: 4043,
                crafting_points: 611,
                actions: vec![Reflect, BasicTouch, CarefulSynthesis2],
                ..Crafter::default()
            },
            ..Settings::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.monte_carlo_runs, 600);
        assert_eq!(settings.reliability_percent, 100);
        assert_eq!(settings.synth().max_length, None);
        assert_eq!(settings.synth().reliability_target, 1.0);
    }

    #[test]
    fn test_synth_carries_options() {
        let settings = Settings {
            max_trick_uses: 2,
            reliability_percent: 80,
            max_length: 20,
            use_conditions: true,
            objective: Objective::LeftoverResources,
            ..valid()
        };
        let synth = settings.synth();
        assert_eq!(synth.max_trick_uses, 2);
        assert!((synth.reliability_target - 0.8).abs() < 1e-12);
        assert_eq!(synth.max_length, Some(20));
        assert!(synth.use_conditions);
        assert!(synth.solve_for_leftovers());
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());
        // No actions at all.
        assert!(Settings::default().validate().is_err());

        let settings = Settings {
            monte_carlo_runs: 0,
            ..valid()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            sequence: vec![Reflect, MuscleMemory],
            ..valid()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Muscle Memory"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_from_toml() {
        let text = r#"
            max_trick_uses = 1
            use_conditions = true
            sequence = ["reflect", "basicTouch"]
            conditional_handling = "reposition"

            [recipe]
            level = 640
            difficulty = 6600

            [crafter]
            class = "culinarian"
            level = 90
            actions = ["reflect", "basicTouch", "carefulSynthesis2", "focusedTouchCombo"]

            [solver]
            population_size = 300
            islands = 3
            seed = 5
        "#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.recipe.difficulty, 6600);
        assert_eq!(settings.recipe.durability, 80);
        assert_eq!(settings.crafter.actions.len(), 4);
        assert_eq!(settings.crafter.actions[3], FocusedTouchCombo);
        assert_eq!(settings.sequence, vec![Reflect, BasicTouch]);
        assert_eq!(settings.solver.population_size, 300);
        assert_eq!(settings.solver.generations, 2000);
        assert_eq!(settings.solver.seed, Some(5));
        assert_eq!(settings.conditional_handling, ConditionalHandling::Reposition);
        assert_eq!(settings.monte_carlo_runs, 600);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_unknown_action_is_parse_error() {
        let text = r#"
            [crafter]
            actions = ["notAnAction"]
        "#;
        let err = Settings::from_toml_str(text).unwrap_err();
        assert!(matches!(err, SolverError::Parse(_)));
    }
}
