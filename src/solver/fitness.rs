//! Sequence scoring.

use super::config::SolverConfig;
use super::types::{Evaluate, Fitness};
use crate::actions::ActionId;
use crate::model::{CraftState, Synth};
use crate::sim::ExpectedSim;

/// Wasted steps are charged at this fraction of a penalty point each.
const WASTED_DIVISOR: f64 = 20.0;

/// Penalty per step over the configured maximum length.
const OVERLENGTH_PENALTY: f64 = 0.1;

/// Scores sequences by deterministic replay.
///
/// The score is `reward - penalty_weight * penalty`, where the reward is
/// capped quality (or weighted leftovers in leftover mode) and the penalty
/// sums every unmet constraint. Completed sequences that reach the quality
/// target are scaled up by `1 + 4 / steps`, favouring shorter solutions.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    synth: &'a Synth,
    penalty_weight: f64,
    cp_weight: f64,
    durability_weight: f64,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(synth: &'a Synth, config: &SolverConfig) -> Self {
        Self {
            synth,
            penalty_weight: config.penalty_weight,
            cp_weight: config.cp_weight,
            durability_weight: config.durability_weight,
        }
    }

    /// Constraint penalty of a final state, before weighting.
    pub fn penalty(&self, state: &CraftState) -> f64 {
        let synth = self.synth;
        let checks = state.feasibility(synth);
        let mut penalty = state.wasted() / WASTED_DIVISOR;

        if !checks.durability_ok {
            penalty += f64::from(state.durability()).abs();
        }
        if !checks.progress_ok {
            let difficulty = f64::from(synth.recipe.difficulty);
            penalty += difficulty - state.progress().min(difficulty);
        }
        if !checks.cp_ok {
            penalty += state.cp().abs();
        }
        if state.trick_uses() > synth.max_trick_uses {
            penalty += f64::from(state.trick_uses() - synth.max_trick_uses);
        }
        if state.reliability() < synth.reliability_target {
            penalty += synth.reliability_target - state.reliability();
        }
        if let Some(max) = synth.max_length {
            let steps = state.step() as usize;
            if steps > max {
                penalty += OVERLENGTH_PENALTY * (steps - max) as f64;
            }
        }
        penalty
    }

    /// Full score of a final state reached by a sequence of `length`
    /// entries.
    pub fn score(&self, state: &CraftState, length: usize) -> Fitness {
        let synth = self.synth;
        let target = synth.recipe.quality_target();

        let reward = if synth.solve_for_leftovers() {
            state.cp() * self.cp_weight + f64::from(state.durability()) * self.durability_weight
        } else {
            state.quality().min(target)
        };

        let mut fitness = reward - self.penalty_weight * self.penalty(state);
        let checks = state.feasibility(synth);
        if checks.progress_ok && state.quality() >= target && state.step() > 0 {
            fitness *= 1.0 + 4.0 / f64::from(state.step());
        }

        Fitness {
            fitness,
            progress: state.progress(),
            cp: state.cp(),
            length,
        }
    }
}

impl Evaluate for FitnessEvaluator<'_> {
    fn evaluate(&self, sequence: &[ActionId]) -> Fitness {
        let state = ExpectedSim::new(self.synth).execute(sequence);
        self.score(&state, sequence.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId::*;
    use crate::model::{fixtures, Objective};

    fn quick_synth() -> Synth {
        fixtures::synth_with(|recipe, _| {
            recipe.difficulty = 1000;
            recipe.max_quality = 1000;
        })
    }

    #[test]
    fn test_incomplete_is_penalized() {
        let synth = fixtures::eggplant();
        let config = SolverConfig::default();
        let evaluator = FitnessEvaluator::new(&synth, &config);
        let state = ExpectedSim::new(&synth).execute(&[BasicTouch]);
        let f = evaluator.evaluate(&[BasicTouch]);
        assert!(!state.feasibility(&synth).durability_ok);
        // Progress deficit plus the durability left on an unfinished craft.
        assert_eq!(evaluator.penalty(&state), 6660.0);
        assert_eq!(f.fitness, state.quality() - 10_000.0 * 6660.0);
        assert_eq!(f.progress, 0.0);
        assert_eq!(f.length, 1);
    }

    #[test]
    fn test_leftover_reward() {
        let synth = quick_synth().with_objective(Objective::LeftoverResources);
        let config = SolverConfig::default();
        let evaluator = FitnessEvaluator::new(&synth, &config);
        let sequence = [CarefulSynthesis2; 3];
        let state = ExpectedSim::new(&synth).execute(&sequence);
        assert!(state.feasibility(&synth).progress_ok);

        let f = evaluator.evaluate(&sequence);
        let expected = state.cp() * 10.0 + f64::from(state.durability()) * 100.0
            - 10_000.0 * evaluator.penalty(&state);
        assert_eq!(f.fitness, expected);
        assert_eq!(f.cp, state.cp());
    }

    #[test]
    fn test_length_bonus_for_completed_target() {
        let synth = fixtures::synth_with(|recipe, _| {
            recipe.difficulty = 500;
            recipe.max_quality = 200;
        });
        let config = SolverConfig::default();
        let evaluator = FitnessEvaluator::new(&synth, &config);
        let sequence = [BasicTouch, CarefulSynthesis2, CarefulSynthesis2];
        let state = ExpectedSim::new(&synth).execute(&sequence);
        assert!(state.quality() >= 200.0);
        assert!(state.feasibility(&synth).all());

        let f = evaluator.evaluate(&sequence);
        assert_eq!(evaluator.penalty(&state), 0.0);
        // Reward capped at the target, then scaled by 1 + 4/3.
        assert!((f.fitness - 200.0 * (1.0 + 4.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_overlength_penalty() {
        let synth = fixtures::synth_with(|recipe, _| {
            recipe.difficulty = 500;
            recipe.max_quality = 200;
        });
        let capped = synth.clone().with_max_length(3);
        let config = SolverConfig::default();
        let sequence = [
            BasicTouch,
            Observe,
            Observe,
            CarefulSynthesis2,
            CarefulSynthesis2,
        ];
        let state = ExpectedSim::new(&capped).execute(&sequence);
        let free = FitnessEvaluator::new(&synth, &config).penalty(&state);
        let limited = FitnessEvaluator::new(&capped, &config).penalty(&state);
        assert!((limited - free - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_wasted_steps_cost_a_twentieth() {
        let synth = quick_synth();
        let config = SolverConfig::default();
        let evaluator = FitnessEvaluator::new(&synth, &config);
        // The first finisher clears the empty Inner Quiet, the second wastes.
        let state = ExpectedSim::new(&synth).execute(&[ByregotsBlessing, ByregotsBlessing]);
        assert_eq!(state.wasted(), 1.0);
        assert_eq!(state.durability(), 50);
        let penalty = evaluator.penalty(&state);
        assert!((penalty - (0.05 + 50.0 + 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_shorter_equal_sequence_ranks_higher() {
        let synth = quick_synth();
        let config = SolverConfig::default();
        let evaluator = FitnessEvaluator::new(&synth, &config);
        let a = evaluator.evaluate(&[CarefulSynthesis2; 3]);
        let b = evaluator.evaluate(&[CarefulSynthesis2, CarefulSynthesis2, CarefulSynthesis2]);
        assert_eq!(a, b);
        let mut longer = Fitness { length: 4, ..a };
        assert!(a > longer);
        longer.length = 3;
        assert_eq!(a, longer);
    }
}
