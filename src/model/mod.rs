//! Craft model: configuration records, material conditions and the rules
//! engine.
//!
//! # Components
//!
//! - [`Recipe`], [`Crafter`], [`Synth`]: immutable configuration
//! - [`Condition`] and the [`ConditionModel`] realizations
//! - [`EffectTracker`]: count-up and count-down buff bookkeeping
//! - [`CraftState`]: the mutable per-attempt state and its rules engine

mod condition;
mod crafter;
mod effects;
mod recipe;
mod state;
mod synth;

pub use condition::{
    Condition, ConditionDistribution, ConditionModel, ExpectedCondition, SampledCondition,
};
pub use crafter::{Crafter, CrafterClass};
pub use effects::{EffectTracker, MAX_INNER_QUIET};
pub use recipe::Recipe;
pub use state::{
    CraftState, Feasibility, ModifierResult, Resolution, StepDiagnostics, StepOutcome,
};
pub use synth::{effective_level, Objective, Synth};
