//! Simulation engines.
//!
//! Both engines replay an action sequence from a fresh [`CraftState`],
//! expanding combo entries into their constituents:
//!
//! - [`ExpectedSim`]: deterministic, success and condition as expectations.
//!   Used for fitness scoring.
//! - [`MonteCarloSim`]: samples success and conditions each step, with a
//!   batch mode producing [`MonteCarloStats`].
//!
//! [`CraftState`]: crate::model::CraftState

mod expected;
mod monte_carlo;
pub mod stats;

pub use expected::ExpectedSim;
pub use monte_carlo::{ConditionalHandling, MonteCarloSim};
pub use stats::{MonteCarloStats, StatLine};
