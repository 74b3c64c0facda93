//! Deterministic expected-value simulator.

use crate::actions::ActionId;
use crate::model::{
    ConditionDistribution, CraftState, ExpectedCondition, Resolution, Synth,
};

/// Replays sequences treating success and condition as expectations.
///
/// Success probabilities scale gains instead of being sampled, and the
/// material condition is carried as a [`ConditionDistribution`]. The result
/// is noise-free, which makes it the scoring engine of the solver.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedSim<'a> {
    synth: &'a Synth,
    assume_success: bool,
}

impl<'a> ExpectedSim<'a> {
    pub fn new(synth: &'a Synth) -> Self {
        Self {
            synth,
            assume_success: false,
        }
    }

    /// Treats every action as certain to succeed.
    pub fn with_assume_success(mut self, assume_success: bool) -> Self {
        self.assume_success = assume_success;
        self
    }

    /// Final state after replaying `sequence` from a fresh state.
    pub fn execute(&self, sequence: &[ActionId]) -> CraftState {
        self.replay(sequence, |_| {})
    }

    /// Every intermediate state, starting with the fresh state and followed
    /// by one entry per applied real action.
    pub fn trajectory(&self, sequence: &[ActionId]) -> Vec<CraftState> {
        let mut states = vec![CraftState::new(self.synth)];
        self.replay(sequence, |state| states.push(state.clone()));
        states
    }

    fn replay<F: FnMut(&CraftState)>(&self, sequence: &[ActionId], mut observe: F) -> CraftState {
        let synth = self.synth;
        let mut state = CraftState::new(synth);

        let p_good = synth.probability_of_good();
        let p_excellent = synth.probability_of_excellent();
        let modeled = synth.use_conditions;
        let mut distribution = ConditionDistribution::default();

        for id in sequence {
            for action in id.definition().expand() {
                let (quality_factor, weight) = if modeled {
                    (
                        distribution.quality_factor(p_good, synth.max_trick_uses),
                        distribution.good_or_excellent(),
                    )
                } else {
                    (1.0, 1.0)
                };
                let condition = ExpectedCondition {
                    p_good_or_excellent: weight,
                };

                let outcome = state.apply_and_advance(synth, action, &condition, |m| {
                    Resolution::expected(m, quality_factor, self.assume_success)
                });
                if outcome.committed && modeled {
                    distribution.advance(p_good, p_excellent);
                }
                observe(&state);
            }
        }

        state
    }
}
