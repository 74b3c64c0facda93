//! Count-up and count-down effect bookkeeping.

use crate::actions::{ActionId, ACTION_COUNT};

/// Maximum Inner Quiet stacks.
pub const MAX_INNER_QUIET: f64 = 10.0;

/// Active effects keyed by action identifier.
///
/// An absent entry means the effect is not tracked at all, which is distinct
/// from a count-up present at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectTracker {
    count_ups: [Option<f64>; ACTION_COUNT],
    count_downs: [Option<u32>; ACTION_COUNT],
}

impl Default for EffectTracker {
    /// Inner Quiet is tracked from the start, at zero stacks.
    fn default() -> Self {
        let mut count_ups = [None; ACTION_COUNT];
        count_ups[ActionId::InnerQuiet.index()] = Some(0.0);
        Self {
            count_ups,
            count_downs: [None; ACTION_COUNT],
        }
    }
}

impl EffectTracker {
    /// Current Inner Quiet stacks, or `None` once consumed.
    pub fn inner_quiet(&self) -> Option<f64> {
        self.count_ups[ActionId::InnerQuiet.index()]
    }

    /// Sets the Inner Quiet stack count, capped at [`MAX_INNER_QUIET`].
    pub fn set_inner_quiet(&mut self, stacks: f64) {
        self.count_ups[ActionId::InnerQuiet.index()] = Some(stacks.min(MAX_INNER_QUIET));
    }

    /// Adds stacks to a tracked Inner Quiet; no-op when absent.
    pub fn add_inner_quiet(&mut self, stacks: f64) {
        if let Some(current) = self.inner_quiet() {
            self.set_inner_quiet(current + stacks);
        }
    }

    /// Stops tracking Inner Quiet.
    pub fn clear_inner_quiet(&mut self) {
        self.count_ups[ActionId::InnerQuiet.index()] = None;
    }

    /// Returns `true` if the count-down buff for `id` is active.
    pub fn is_active(&self, id: ActionId) -> bool {
        self.count_downs[id.index()].is_some()
    }

    /// Remaining turns of the buff for `id`.
    pub fn remaining(&self, id: ActionId) -> Option<u32> {
        self.count_downs[id.index()]
    }

    /// Registers (or refreshes) a buff.
    pub fn activate(&mut self, id: ActionId, turns: u32) {
        self.count_downs[id.index()] = (turns > 0).then_some(turns);
    }

    /// Removes a buff.
    pub fn consume(&mut self, id: ActionId) {
        self.count_downs[id.index()] = None;
    }

    /// Decrements every active buff, removing those that reach zero.
    pub fn tick(&mut self) {
        for slot in self.count_downs.iter_mut() {
            *slot = match *slot {
                Some(turns) if turns > 1 => Some(turns - 1),
                _ => None,
            };
        }
    }

    /// Active buffs with their remaining turns.
    pub fn active(&self) -> impl Iterator<Item = (ActionId, u32)> + '_ {
        ActionId::ALL
            .iter()
            .zip(self.count_downs.iter())
            .filter_map(|(id, turns)| turns.map(|t| (*id, t)))
    }
}
