//! Stochastic Monte Carlo simulator.

use super::stats::{hq_percent_from_quality, median, quality_percent, MonteCarloStats, StatLine};
use crate::actions::{ActionDefinition, ActionId};
use crate::error::{Result, SolverError};
use crate::model::{Condition, CraftState, Resolution, SampledCondition, Synth};
use crate::random::{child_seeds, create_rng, rng_from, unit};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How condition-gated actions are sequenced against sampled conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConditionalHandling {
    /// Pull gated actions out and splice each in when its condition shows up.
    Reposition,
    /// Keep gated actions in place; an unmatched one is a wasted no-op.
    #[default]
    SkipUnusable,
    /// Apply gated actions regardless of the condition.
    IgnoreUnusable,
}

/// Replays sequences with sampled success and conditions.
#[derive(Debug, Clone)]
pub struct MonteCarloSim<'a> {
    synth: &'a Synth,
    rng: StdRng,
    assume_success: bool,
    handling: ConditionalHandling,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel: bool,
}

impl<'a> MonteCarloSim<'a> {
    /// Creates a simulator seeded with `seed`, or from OS entropy when `None`.
    pub fn new(synth: &'a Synth, seed: Option<u64>) -> Self {
        Self {
            synth,
            rng: rng_from(seed),
            assume_success: false,
            handling: ConditionalHandling::default(),
            parallel: true,
        }
    }

    /// Treats every action as certain to succeed.
    pub fn with_assume_success(mut self, assume_success: bool) -> Self {
        self.assume_success = assume_success;
        self
    }

    pub fn with_handling(mut self, handling: ConditionalHandling) -> Self {
        self.handling = handling;
        self
    }

    /// Runs batch replays on the rayon pool (when the `parallel` feature is
    /// enabled). Results do not depend on this flag.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Applies one real action to a copy of `state`, then samples the next
    /// condition.
    pub fn step(&mut self, state: &CraftState, action: &ActionDefinition) -> CraftState {
        let mut next = state.clone();
        step_in_place(self.synth, &mut next, action, self.assume_success, &mut self.rng);
        next
    }

    /// One full replay of `sequence`: the fresh state followed by one state
    /// per applied or skipped action.
    pub fn sequence(&mut self, sequence: &[ActionId]) -> Vec<CraftState> {
        run_sequence(
            self.synth,
            sequence,
            self.handling,
            self.assume_success,
            &mut self.rng,
        )
    }

    /// Replays `sequence` `runs` times and aggregates the final states.
    ///
    /// Only runs meeting progress, durability and CP count toward the
    /// aggregates; with no such run every aggregate is zero.
    ///
    /// # Errors
    /// Returns [`SolverError::InvalidArgument`] when `runs` is zero.
    pub fn execute(&mut self, sequence: &[ActionId], runs: usize) -> Result<MonteCarloStats> {
        if runs == 0 {
            return Err(SolverError::InvalidArgument(
                "Monte Carlo batch needs at least one run".into(),
            ));
        }

        let seeds = child_seeds(&mut self.rng, runs);
        let synth = self.synth;
        let handling = self.handling;
        let assume_success = self.assume_success;
        let single = |seed: u64| {
            let mut rng = create_rng(seed);
            let states = run_sequence(synth, sequence, handling, assume_success, &mut rng);
            let hq_roll = unit(&mut rng);
            (states, hq_roll)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<(Vec<CraftState>, f64)> = if self.parallel {
            seeds.into_par_iter().map(single).collect()
        } else {
            seeds.into_iter().map(single).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<(Vec<CraftState>, f64)> = seeds.into_iter().map(single).collect();

        Ok(aggregate(synth, results))
    }
}

fn aggregate(synth: &Synth, results: Vec<(Vec<CraftState>, f64)>) -> MonteCarloStats {
    let runs = results.len();
    let max_quality = synth.recipe.max_quality;
    let hq_of = |quality: f64| {
        hq_percent_from_quality(quality_percent(quality.min(max_quality as f64), max_quality))
    };

    let mut best: Option<Vec<CraftState>> = None;
    let mut worst: Option<Vec<CraftState>> = None;
    let mut columns: [Vec<f64>; 5] = Default::default();
    let mut n_hq = 0usize;

    for (states, hq_roll) in results {
        let Some(last) = states.last() else { continue };

        if last.feasibility(synth).is_completed() {
            let hq = hq_of(last.quality());
            if hq_roll <= hq / 100.0 {
                n_hq += 1;
            }
            columns[0].push(last.durability() as f64);
            columns[1].push(last.cp());
            columns[2].push(last.quality());
            columns[3].push(last.progress());
            columns[4].push(hq);
        }

        let quality = last.quality();
        let is_best = best
            .as_ref()
            .and_then(|s| s.last())
            .map_or(true, |b| quality > b.quality());
        let is_worst = worst
            .as_ref()
            .and_then(|s| s.last())
            .map_or(true, |w| quality < w.quality());
        if is_best && is_worst {
            worst = Some(states.clone());
            best = Some(states);
        } else if is_best {
            best = Some(states);
        } else if is_worst {
            worst = Some(states);
        }
    }

    let n_success = columns[0].len();
    let (mean, min, max) = if n_success == 0 {
        (StatLine::default(), StatLine::default(), StatLine::default())
    } else {
        let mut mean = column_line(&columns, |v| v.iter().sum::<f64>() / v.len() as f64);
        mean.hq_percent = 100.0 * n_hq as f64 / n_success as f64;
        let mut min = column_line(&columns, |v| v.iter().copied().fold(f64::INFINITY, f64::min));
        min.hq_percent = hq_of(min.quality);
        let mut max =
            column_line(&columns, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        max.hq_percent = hq_of(max.quality);
        (mean, min, max)
    };

    let [mut durability, mut cp, mut quality, mut progress, mut hq_percent] = columns;
    let medians = StatLine {
        durability: median(&mut durability),
        cp: median(&mut cp),
        quality: median(&mut quality),
        progress: median(&mut progress),
        hq_percent: median(&mut hq_percent),
    };

    MonteCarloStats {
        runs,
        success_rate: 100.0 * n_success as f64 / runs as f64,
        mean,
        median: medians,
        min,
        max,
        best: best.unwrap_or_default(),
        worst: worst.unwrap_or_default(),
    }
}

fn column_line(columns: &[Vec<f64>; 5], f: fn(&[f64]) -> f64) -> StatLine {
    StatLine {
        durability: f(&columns[0]),
        cp: f(&columns[1]),
        quality: f(&columns[2]),
        progress: f(&columns[3]),
        hq_percent: 0.0,
    }
}

fn step_in_place<R: Rng>(
    synth: &Synth,
    state: &mut CraftState,
    action: &ActionDefinition,
    assume_success: bool,
    rng: &mut R,
) {
    let current = state.condition();
    let condition = SampledCondition {
        condition: current,
        use_conditions: synth.use_conditions,
    };

    state.apply_and_advance(synth, action, &condition, |m| {
        let roll = unit(rng);
        let succeeded = assume_success || roll <= m.success_probability;
        Resolution::sampled(m, succeeded, current.quality_factor())
    });

    let next = match current {
        Condition::Excellent => Condition::Poor,
        Condition::Good | Condition::Poor => Condition::Normal,
        Condition::Normal if synth.use_conditions => {
            let p_excellent = synth.probability_of_excellent();
            let p_good = synth.probability_of_good();
            let roll = unit(rng);
            if roll < p_excellent {
                Condition::Excellent
            } else if roll < p_excellent + p_good {
                Condition::Good
            } else {
                Condition::Normal
            }
        }
        Condition::Normal => Condition::Normal,
    };
    state.set_condition(next);

    trace!(
        step = state.step(),
        action = %action.id,
        durability = state.durability(),
        cp = state.cp(),
        quality = state.quality(),
        progress = state.progress(),
        inner_quiet = state.diagnostics().inner_quiet,
        condition = %state.condition(),
        success = state.diagnostics().success,
        "monte carlo step"
    );
}

/// Gated actions pulled out of a sequence for repositioning.
#[derive(Debug, Default)]
struct GatedQueues {
    excellent_only: VecDeque<ActionId>,
    good_only: VecDeque<ActionId>,
    good_or_excellent: VecDeque<ActionId>,
    poor_only: VecDeque<ActionId>,
    total: u32,
}

impl GatedQueues {
    /// Splits `sequence` into the ungated remainder and the gated queues.
    fn strip(sequence: &[ActionId]) -> (Vec<ActionId>, Self) {
        let mut queues = Self::default();
        let mut rest = Vec::with_capacity(sequence.len());
        for &id in sequence {
            let gate = id.definition().gate;
            let queue = if gate.on_excellent && !gate.on_good {
                &mut queues.excellent_only
            } else if gate.on_good && !gate.on_excellent && !gate.on_poor {
                &mut queues.good_only
            } else if gate.on_good || gate.on_excellent {
                &mut queues.good_or_excellent
            } else if gate.on_poor {
                &mut queues.poor_only
            } else {
                rest.push(id);
                continue;
            };
            queue.push_back(id);
            queues.total += 1;
        }
        (rest, queues)
    }

    /// Next queued action usable under `condition`.
    fn take(&mut self, condition: Condition) -> Option<ActionId> {
        match condition {
            Condition::Excellent => self
                .excellent_only
                .pop_front()
                .or_else(|| self.good_or_excellent.pop_front()),
            Condition::Good => self
                .good_only
                .pop_front()
                .or_else(|| self.good_or_excellent.pop_front()),
            Condition::Poor => self.poor_only.pop_front(),
            Condition::Normal => None,
        }
    }
}

fn is_usable(synth: &Synth, action: &ActionDefinition, condition: Condition) -> bool {
    let gate = action.gate;
    !gate.is_gated()
        || !synth.use_conditions
        || (gate.on_excellent && condition == Condition::Excellent)
        || (gate.on_good && condition == Condition::Good)
        || (gate.on_poor && condition == Condition::Poor)
}

fn run_sequence<R: Rng>(
    synth: &Synth,
    sequence: &[ActionId],
    handling: ConditionalHandling,
    assume_success: bool,
    rng: &mut R,
) -> Vec<CraftState> {
    let mut state = CraftState::new(synth);
    let mut states = vec![state.clone()];
    if sequence.is_empty() {
        return states;
    }

    let (sequence, mut queues) = match handling {
        ConditionalHandling::Reposition => GatedQueues::strip(sequence),
        _ => (sequence.to_vec(), GatedQueues::default()),
    };

    for id in &sequence {
        for action in id.definition().expand() {
            match handling {
                ConditionalHandling::Reposition => {
                    if state.trick_uses() < queues.total {
                        for condition in [Condition::Excellent, Condition::Good, Condition::Poor] {
                            if state.condition() != condition {
                                continue;
                            }
                            if let Some(gated) = queues.take(condition) {
                                step_in_place(
                                    synth,
                                    &mut state,
                                    gated.definition(),
                                    assume_success,
                                    rng,
                                );
                                states.push(state.clone());
                            }
                        }
                    }
                    step_in_place(synth, &mut state, action, assume_success, rng);
                }
                ConditionalHandling::SkipUnusable => {
                    if is_usable(synth, action, state.condition()) {
                        step_in_place(synth, &mut state, action, assume_success, rng);
                    } else {
                        state.record_skipped(action.id);
                    }
                }
                ConditionalHandling::IgnoreUnusable => {
                    step_in_place(synth, &mut state, action, assume_success, rng);
                }
            }
            states.push(state.clone());
        }
    }

    states
}
