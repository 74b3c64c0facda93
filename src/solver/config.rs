//! Solver configuration.
//!
//! [`SolverConfig`] holds every parameter of the island GA and of the
//! fitness function.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the island-model genetic solver.
///
/// # Defaults
///
/// ```
/// use u_craftsolve::solver::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.population_size, 8000);
/// assert_eq!(config.islands, 30);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_craftsolve::solver::SolverConfig;
///
/// let config = SolverConfig::fast()
///     .with_generations(50)
///     .with_mutation_rate(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Total number of individuals across all islands.
    pub population_size: usize,

    /// Number of generations to run.
    pub generations: usize,

    /// Number of contiguous sub-populations.
    ///
    /// Each island must hold at least two individuals.
    pub islands: usize,

    /// Generations without improvement before a losing island is wiped.
    ///
    /// Islands in the top two thirds of the leaderboard get three times as
    /// long.
    pub stagnation_patience: usize,

    /// Weight of the constraint penalty against the reward.
    pub penalty_weight: f64,

    /// Reward per leftover CP point in leftover-resources mode.
    pub cp_weight: f64,

    /// Reward per leftover durability point in leftover-resources mode.
    pub durability_weight: f64,

    /// Probability of crossing over an adjacent parent pair.
    pub crossover_rate: f64,

    /// Probability of mutating an offspring.
    pub mutation_rate: f64,

    /// Longest window touched by crossover and window mutations.
    pub max_subsequence_length: usize,

    /// Tournament size for parent selection.
    pub tournament_size: usize,

    /// Relative weights of the five mutation operators, in the order
    /// random window, adjacent swap, reverse, point, kill window.
    pub mutation_weights: [f64; 5],

    /// Relative weights of the short (2-8), medium (9-16) and long (17-30)
    /// random sequence lengths.
    pub length_weights: [f64; 3],

    /// Whether to evolve islands on the rayon pool.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            population_size: 8000,
            generations: 2000,
            islands: 30,
            stagnation_patience: 20,
            penalty_weight: 10_000.0,
            cp_weight: 10.0,
            durability_weight: 100.0,
            crossover_rate: 0.5,
            mutation_rate: 0.2,
            max_subsequence_length: 4,
            tournament_size: 7,
            mutation_weights: [60.0, 10.0, 10.0, 60.0, 10.0],
            length_weights: [90.0, 120.0, 10.0],
            parallel: true,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the total population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the number of islands.
    pub fn with_islands(mut self, n: usize) -> Self {
        self.islands = n;
        self
    }

    /// Sets the stagnation patience.
    pub fn with_stagnation_patience(mut self, n: usize) -> Self {
        self.stagnation_patience = n;
        self
    }

    /// Sets the penalty weight.
    pub fn with_penalty_weight(mut self, weight: f64) -> Self {
        self.penalty_weight = weight;
        self
    }

    /// Sets the leftover CP and durability reward weights.
    pub fn with_leftover_weights(mut self, cp_weight: f64, durability_weight: f64) -> Self {
        self.cp_weight = cp_weight;
        self.durability_weight = durability_weight;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the maximum crossover/mutation window length.
    pub fn with_max_subsequence_length(mut self, n: usize) -> Self {
        self.max_subsequence_length = n;
        self
    }

    /// Sets the mutation operator weights.
    pub fn with_mutation_weights(mut self, weights: [f64; 5]) -> Self {
        self.mutation_weights = weights;
        self
    }

    /// Enables or disables parallel island evolution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick runs: small population, few generations.
    ///
    /// - Population: 600 over 6 islands, Generations: 200
    /// - Stagnation patience: 10
    pub fn fast() -> Self {
        Self {
            population_size: 600,
            generations: 200,
            islands: 6,
            stagnation_patience: 10,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.islands == 0 {
            return Err("islands must be at least 1".into());
        }
        if self.population_size < 2 * self.islands {
            return Err(format!(
                "population_size ({}) must be at least twice the island count ({})",
                self.population_size, self.islands
            ));
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if self.stagnation_patience == 0 {
            return Err("stagnation_patience must be at least 1".into());
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if self.max_subsequence_length == 0 {
            return Err("max_subsequence_length must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be in [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be in [0, 1]".into());
        }
        if !self.penalty_weight.is_finite() || self.penalty_weight < 0.0 {
            return Err("penalty_weight must be finite and non-negative".into());
        }
        if !self.cp_weight.is_finite() || !self.durability_weight.is_finite() {
            return Err("leftover weights must be finite".into());
        }
        check_weights("mutation_weights", &self.mutation_weights)?;
        check_weights("length_weights", &self.length_weights)?;
        Ok(())
    }
}

fn check_weights(name: &str, weights: &[f64]) -> Result<(), String> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(format!("{name} must be finite and non-negative"));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(format!("{name} must contain a positive weight"));
    }
    Ok(())
}
