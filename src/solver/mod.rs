//! Island-model genetic solver for action sequences.
//!
//! The population is split into contiguous islands that evolve on their
//! own and are ranked on a shared leaderboard. Losing islands that stop
//! improving are wiped sooner than leading ones.
//!
//! # Components
//!
//! - [`SolverConfig`]: population, operator and fitness parameters
//! - [`FitnessEvaluator`]: deterministic replay plus penalties
//! - [`SequenceOps`]: variable-length crossover, mutation, random sequences
//! - [`IslandRunner`]: the generation loop
//!
//! # Key Types
//!
//! - [`Fitness`]: lexicographic `(fitness, progress, cp, -length)` score
//! - [`Individual`]: a scored sequence
//! - [`Evaluate`]: the scoring seam
//! - [`SolveResult`]: best individual and per-generation statistics
//!
//! # Example
//!
//! ```ignore
//! use u_craftsolve::solver::{FitnessEvaluator, IslandRunner, SequenceOps, SolverConfig};
//!
//! let config = SolverConfig::fast().with_seed(42);
//! let evaluator = FitnessEvaluator::new(&synth, &config);
//! let ops = SequenceOps::new(&synth.crafter.actions, synth.max_length, &config)?;
//! let result = IslandRunner::run(&evaluator, &ops, &seed, &config)?;
//! ```

mod config;
mod fitness;
mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::SolverConfig;
pub use fitness::FitnessEvaluator;
pub use operators::{Mutation, SequenceOps};
pub use runner::{GenerationStats, IslandRunner, SolveResult};
pub use types::{diversity, Evaluate, Fitness, Individual};
