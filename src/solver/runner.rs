//! Island-model evolutionary loop.
//!
//! [`IslandRunner`] orchestrates the search: seed + random population →
//! contiguous islands → per-island selection, crossover, mutation and
//! replacement → global best and leaderboard update → repeat.
//!
//! Islands evolve independently within a generation, each on its own child
//! random stream, so the result for a given seed does not depend on whether
//! islands run in parallel.

use rand::rngs::StdRng;
use tracing::debug;

use super::config::SolverConfig;
use super::operators::SequenceOps;
use super::selection::{select_best, tournament};
use super::types::{diversity, sort_descending, Evaluate, Fitness, Individual};
use crate::actions::ActionId;
use crate::error::{Result, SolverError};
use crate::random::{child_seeds, create_rng, rng_from, unit};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Two islands' best fitness within this distance count as unchanged.
const STAGNATION_EPSILON: f64 = 1e-3;

/// Share of the leaderboard that gets the long stagnation allowance.
const LEADING_SHARE: f64 = 0.66667;

/// Islands outside the leading share wait `patience`, the rest this many
/// times longer.
const LEADER_PATIENCE_FACTOR: usize = 3;

/// Extra mutation rounds after the first, each taken with probability
/// [`REMUTATION_PROB`].
const EXTRA_MUTATIONS: usize = 5;
const REMUTATION_PROB: f64 = 0.5;

/// Statistics recorded at the end of each generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,

    /// Best fitness seen so far, across all islands and generations.
    pub best: Fitness,

    /// Island with the highest current best fitness.
    pub winning_island: usize,

    /// Islands reset this generation because they stagnated.
    pub wiped_islands: usize,

    /// Standard deviation of each fitness component over the population.
    pub diversity: [f64; 4],
}

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// The best individual found during the entire run.
    pub best: Individual,

    /// Total number of generations executed.
    pub generations: usize,

    /// Per-generation statistics.
    pub history: Vec<GenerationStats>,
}

impl SolveResult {
    /// Best fitness value at the end of each generation.
    pub fn fitness_history(&self) -> Vec<f64> {
        self.history.iter().map(|g| g.best.fitness).collect()
    }

    /// Diversity of the final population.
    pub fn final_diversity(&self) -> [f64; 4] {
        self.history.last().map_or([0.0; 4], |g| g.diversity)
    }
}

#[derive(Debug, Clone)]
struct Island {
    members: Vec<Individual>,
    stagnation: usize,
    last_best: f64,
}

/// Executes the island GA.
///
/// # Usage
///
/// ```ignore
/// let evaluator = FitnessEvaluator::new(&synth, &config);
/// let ops = SequenceOps::new(&synth.crafter.actions, synth.max_length, &config)?;
/// let result = IslandRunner::run(&evaluator, &ops, &seed, &config)?;
/// println!("Best: {:?}", result.best.sequence);
/// ```
pub struct IslandRunner;

impl IslandRunner {
    /// Runs the solver from `seed_sequence` plus random individuals.
    ///
    /// An empty `seed_sequence` is replaced by a random one.
    ///
    /// # Errors
    /// Returns [`SolverError::InvalidConfig`] when `config` fails validation.
    pub fn run<E: Evaluate>(
        evaluator: &E,
        ops: &SequenceOps<'_>,
        seed_sequence: &[ActionId],
        config: &SolverConfig,
    ) -> Result<SolveResult> {
        config.validate().map_err(SolverError::InvalidConfig)?;

        let mut rng = rng_from(config.seed);

        // 1. Seed plus random sequences, scored together
        let mut sequences = Vec::with_capacity(config.population_size);
        if seed_sequence.is_empty() {
            sequences.push(ops.random_sequence(&mut rng)?);
        } else {
            sequences.push(seed_sequence.to_vec());
        }
        while sequences.len() < config.population_size {
            sequences.push(ops.random_sequence(&mut rng)?);
        }
        let population = score_all(evaluator, sequences, config.parallel);
        let mut best = select_best(&population)?.clone();

        // 2. Contiguous islands
        let mut islands = partition(population, config.islands);
        let n = islands.len();
        let leading_cut = (LEADING_SHARE * n as f64).floor() as usize;
        let mut positions: Vec<usize> = (0..n).collect();
        let mut history = Vec::with_capacity(config.generations);

        // 3. Generations
        for generation in 1..=config.generations {
            let seeds = child_seeds(&mut rng, n);
            let losing: Vec<bool> = positions.iter().map(|&p| p > leading_cut).collect();
            let step = |(i, island): (usize, &mut Island)| {
                let mut island_rng = create_rng(seeds[i]);
                evolve(island, evaluator, ops, config, losing[i], &mut island_rng)
            };

            #[cfg(feature = "parallel")]
            let wiped: Vec<bool> = if config.parallel {
                islands
                    .par_iter_mut()
                    .enumerate()
                    .map(step)
                    .collect::<Result<_>>()?
            } else {
                islands
                    .iter_mut()
                    .enumerate()
                    .map(step)
                    .collect::<Result<_>>()?
            };
            #[cfg(not(feature = "parallel"))]
            let wiped: Vec<bool> = islands
                .iter_mut()
                .enumerate()
                .map(step)
                .collect::<Result<_>>()?;

            // Coordinator: global best and leaderboard
            let mut winning_island = 0;
            for (i, island) in islands.iter().enumerate() {
                if island.last_best > islands[winning_island].last_best {
                    winning_island = i;
                }
                let candidate = select_best(&island.members)?;
                if candidate.fitness > best.fitness {
                    best = candidate.clone();
                }
            }
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| islands[b].last_best.total_cmp(&islands[a].last_best));
            for (position, &island) in order.iter().enumerate() {
                positions[island] = position;
            }

            let scores: Vec<Fitness> = islands
                .iter()
                .flat_map(|island| island.members.iter().map(|m| m.fitness))
                .collect();
            let stats = GenerationStats {
                generation,
                best: best.fitness,
                winning_island,
                wiped_islands: wiped.iter().filter(|&&w| w).count(),
                diversity: diversity(&scores),
            };
            debug!(
                generation,
                fitness = stats.best.fitness,
                progress = stats.best.progress,
                cp = stats.best.cp,
                length = stats.best.length,
                winning_island,
                wiped = stats.wiped_islands,
                diversity = ?stats.diversity,
                "generation complete"
            );
            history.push(stats);
        }

        Ok(SolveResult {
            best,
            generations: config.generations,
            history,
        })
    }
}

/// Scores every sequence, on the rayon pool when enabled.
fn score_all<E: Evaluate>(
    evaluator: &E,
    sequences: Vec<Vec<ActionId>>,
    parallel: bool,
) -> Vec<Individual> {
    let score = |s: Vec<ActionId>| Individual::scored(s, evaluator);

    #[cfg(feature = "parallel")]
    let individuals = if parallel {
        sequences.into_par_iter().map(score).collect()
    } else {
        sequences.into_iter().map(score).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let individuals = {
        let _ = parallel;
        sequences.into_iter().map(score).collect()
    };

    individuals
}

/// Splits the population into `count` contiguous islands; island `i`
/// covers `[i * N / count, (i + 1) * N / count)`.
fn partition(population: Vec<Individual>, count: usize) -> Vec<Island> {
    let total = population.len();
    let mut rest = population.into_iter();
    (0..count)
        .map(|i| {
            let size = (i + 1) * total / count - i * total / count;
            Island {
                members: rest.by_ref().take(size).collect(),
                stagnation: 0,
                last_best: f64::NEG_INFINITY,
            }
        })
        .collect()
}

/// Runs one generation on one island. Returns whether it was wiped.
fn evolve<E: Evaluate>(
    island: &mut Island,
    evaluator: &E,
    ops: &SequenceOps<'_>,
    config: &SolverConfig,
    losing: bool,
    rng: &mut StdRng,
) -> Result<bool> {
    let patience = if losing {
        config.stagnation_patience
    } else {
        LEADER_PATIENCE_FACTOR * config.stagnation_patience
    };

    let wiped = island.stagnation >= patience;
    if wiped {
        island.stagnation = 0;
        let fresh = Individual::scored(ops.random_sequence(rng)?, evaluator);
        debug!(
            fitness = fresh.fitness.fitness,
            losing, "island stagnated, wiping"
        );
        for member in &mut island.members {
            *member = fresh.clone();
        }
    }

    let len = island.members.len();
    let parents = tournament(&island.members, config.tournament_size, len / 2, rng)?;
    let mut offspring: Vec<Vec<ActionId>> = parents.into_iter().map(|p| p.sequence).collect();

    for i in (1..offspring.len()).step_by(2) {
        if unit(rng) < config.crossover_rate {
            let (a, b) = ops.crossover(&offspring[i - 1], &offspring[i], rng)?;
            offspring[i - 1] = a;
            offspring[i] = b;
        }
    }

    for child in &mut offspring {
        if unit(rng) < config.mutation_rate {
            *child = ops.mutate(child, rng)?;
            for _ in 0..EXTRA_MUTATIONS {
                if unit(rng) < REMUTATION_PROB {
                    *child = ops.mutate(child, rng)?;
                }
            }
        }
    }

    let mut scored: Vec<Individual> = offspring
        .into_iter()
        .map(|s| Individual::scored(s, evaluator))
        .collect();
    sort_descending(&mut scored);
    let keep = scored.len() / 2;
    scored.truncate(keep);

    sort_descending(&mut island.members);
    island.members.truncate(len - keep);
    island.members.extend(scored);
    sort_descending(&mut island.members);

    let best = island.members[0].fitness.fitness;
    if (island.last_best - best).abs() < STAGNATION_EPSILON {
        island.stagnation += 1;
    } else {
        island.stagnation = 0;
    }
    island.last_best = best;

    Ok(wiped)
}
