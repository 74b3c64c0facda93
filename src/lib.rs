//! Crafting rotation optimizer.
//!
//! Searches for the action sequence that best finishes a crafting attempt:
//! reach the progress target within durability and CP, while maximizing
//! quality (or leftover resources).
//!
//! - **Rules engine** ([`model`]): one action applied to a [`CraftState`],
//!   with buffs, Inner Quiet, combos, conditions and feasibility checks.
//! - **Simulators** ([`sim`]): a deterministic expected-value replay for
//!   scoring and a Monte Carlo replay with batch statistics.
//! - **Solver** ([`solver`]): an island-model genetic algorithm over
//!   variable-length sequences with a lexicographic fitness tuple.
//! - **Session** ([`solve()`]): heuristic seed, search, replay and
//!   [`Report`], driven by a [`Settings`] record.
//!
//! # Architecture
//!
//! The action catalog ([`actions`]) is a fixed table indexed by
//! [`ActionId`]. All randomness flows through explicitly seeded generators
//! ([`random`]); parallel work (islands, Monte Carlo runs) receives child
//! seeds, so seeded results are identical with or without the `parallel`
//! feature.
//!
//! [`CraftState`]: model::CraftState
//! [`ActionId`]: actions::ActionId

pub mod actions;
pub mod error;
pub mod heuristic;
pub mod model;
pub mod random;
pub mod report;
pub mod settings;
pub mod sim;
mod solve;
pub mod solver;

pub use error::{Result, SolverError};
pub use report::Report;
pub use settings::Settings;
pub use solve::solve;
