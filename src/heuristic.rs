//! Greedy seed sequence.
//!
//! [`build_seed`] assembles a plausible rotation from the crafter's action
//! set with a simple resource budget: a progress block built back to front,
//! a durability top-up, an opener and touches, then Great Strides and
//! Byregot's Blessing ahead of the progress block. It ignores buffs,
//! conditions and success rates; the solver only uses it as a starting
//! point.

use std::collections::VecDeque;

use crate::actions::ActionId::{self, *};
use crate::model::Synth;

/// Synthesis actions, best first.
const PROGRESS_PREFERENCE: [ActionId; 5] = [
    FocusedSynthesisCombo,
    CarefulSynthesis2,
    CarefulSynthesis,
    BasicSynthesis2,
    BasicSynthesis,
];

/// Touches, best first.
const QUALITY_PREFERENCE: [ActionId; 4] = [
    AdvancedTouchCombo,
    StandardTouchCombo,
    FocusedTouchCombo,
    BasicTouch,
];

/// Durability the budget credits for one repair action.
const REPAIR_AMOUNT: i32 = 30;

/// Running totals while the seed is assembled.
struct Budget<'a> {
    synth: &'a Synth,
    cp: i32,
    durability: i32,
    progress: f64,
    quality: f64,
    base_progress: f64,
    base_quality: f64,
}

impl<'a> Budget<'a> {
    fn new(synth: &'a Synth) -> Self {
        let level = synth.effective_crafter_level();
        Self {
            synth,
            cp: synth.crafter.crafting_points as i32,
            durability: synth.recipe.durability as i32,
            progress: 0.0,
            quality: 0.0,
            base_progress: synth.base_progress(level, synth.crafter.craftsmanship),
            base_quality: synth.base_quality(level, synth.crafter.control),
        }
    }

    /// Whether `id` is known and affordable right now.
    fn affordable(&self, id: ActionId) -> bool {
        let def = id.definition();
        self.synth.crafter.has_action(id)
            && self.cp >= def.cp_cost
            && self.durability - def.durability_cost >= 0
    }

    /// First affordable action of `preference`.
    fn first_affordable(&self, preference: &[ActionId]) -> Option<ActionId> {
        preference.iter().copied().find(|&id| self.affordable(id))
    }

    /// Charges `id` against the budget and credits its base gains.
    fn spend(&mut self, id: ActionId) -> ActionId {
        let def = id.definition();
        self.cp -= def.cp_cost;
        self.durability -= def.durability_cost;
        self.progress += (self.base_progress * def.progress_multiplier).floor();
        self.quality += (self.base_quality * def.quality_multiplier).floor();
        id
    }

    /// Spends the first affordable repair action, crediting the repair.
    fn repair(&mut self) -> Option<ActionId> {
        let id = [Manipulation, MastersMend]
            .into_iter()
            .find(|&id| self.affordable(id))?;
        self.spend(id);
        self.durability += REPAIR_AMOUNT;
        Some(id)
    }
}

/// Builds the greedy seed sequence for `synth`.
///
/// Returns an empty sequence when nothing is affordable.
pub fn build_seed(synth: &Synth) -> Vec<ActionId> {
    let mut budget = Budget::new(synth);
    let difficulty = f64::from(synth.recipe.difficulty);

    // Progress block, finisher first, built towards the front.
    let mut progress_block: VecDeque<ActionId> = VecDeque::new();
    if let Some(id) = budget.first_affordable(&PROGRESS_PREFERENCE) {
        progress_block.push_back(budget.spend(id));
    }
    while budget.progress < difficulty {
        // Progress at 5 durability only if it completes the craft.
        match budget.first_affordable(&PROGRESS_PREFERENCE) {
            Some(id) if budget.durability >= 10 => progress_block.push_front(budget.spend(id)),
            _ => match budget.repair() {
                Some(id) => progress_block.push_front(id),
                None => break,
            },
        }
    }

    let mut sequence = progress_block;
    if budget.durability <= 20 {
        if let Some(id) = budget.repair() {
            sequence.push_front(id);
        }
    }

    // Opener and one guaranteed touch.
    let mut opener = Vec::new();
    if budget.affordable(Reflect) {
        opener.push(budget.spend(Reflect));
    }
    if let Some(id) = budget.first_affordable(&QUALITY_PREFERENCE) {
        opener.push(budget.spend(id));
    }

    // Finisher ahead of the progress block.
    if budget.affordable(ByregotsBlessing) {
        sequence.push_front(budget.spend(ByregotsBlessing));
    }
    if budget.affordable(GreatStrides) {
        sequence.push_front(budget.spend(GreatStrides));
    }

    // Spend what is left on touches and repairs.
    let max_quality = f64::from(synth.recipe.max_quality);
    let mut filler: VecDeque<ActionId> = VecDeque::new();
    while budget.cp > 0 && budget.durability > 0 && budget.quality < max_quality {
        match budget.first_affordable(&QUALITY_PREFERENCE) {
            Some(id) if budget.durability > 10 => filler.push_back(budget.spend(id)),
            _ if budget.durability < 20 => match budget.repair() {
                Some(id) => filler.push_front(id),
                None => break,
            },
            _ => break,
        }
    }

    opener
        .into_iter()
        .chain(filler)
        .chain(sequence)
        .collect()
}
