//! Per-attempt craft state and the rules engine.
//!
//! A [`CraftState`] is created fresh from a [`Synth`] and mutated once per
//! applied action through [`CraftState::apply_and_advance`]. The two
//! simulation engines differ only in how they resolve success and condition,
//! which they express as a [`Resolution`].

use super::condition::{Condition, ConditionModel};
use super::effects::EffectTracker;
use super::synth::Synth;
use crate::actions::{ActionDefinition, ActionId, ActionKind};

/// Values computed by [`CraftState::compute_modifiers`] for one application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierResult {
    pub craftsmanship: u32,
    pub control: u32,
    pub eff_crafter_level: u32,
    pub eff_recipe_level: u32,
    pub level_difference: i64,
    pub success_probability: f64,
    /// Buff-adjusted quality multiplier, excluding Inner Quiet.
    pub quality_multiplier: f64,
    /// Floor-rounded progress gain before success scaling.
    pub base_progress_gain: f64,
    /// Floor-rounded quality gain before success and condition scaling.
    pub base_quality_gain: f64,
    pub durability_cost: f64,
    pub cp_cost: i32,
}

/// How an engine resolved success and condition for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Scale on gains: `0` or `1` when sampled, a probability when expected.
    pub success: f64,
    /// Condition factor on quality gains.
    pub quality_factor: f64,
    /// Factor folded into reliability, if the step contributes progress.
    pub reliability: Option<f64>,
}

impl Resolution {
    /// Expected-value resolution: success is the action's probability (or
    /// certain when `assume_success`), and reliability is charged whenever
    /// the action produces progress.
    pub fn expected(modifiers: &ModifierResult, quality_factor: f64, assume_success: bool) -> Self {
        let success = if assume_success {
            1.0
        } else {
            modifiers.success_probability
        };
        Self {
            success,
            quality_factor,
            reliability: (modifiers.base_progress_gain > 0.0).then_some(success),
        }
    }

    /// Sampled resolution: the step either succeeded or it did not, and a
    /// successful progress step charges the action's true probability.
    pub fn sampled(modifiers: &ModifierResult, succeeded: bool, quality_factor: f64) -> Self {
        let success = if succeeded { 1.0 } else { 0.0 };
        Self {
            success,
            quality_factor,
            reliability: (succeeded && modifiers.base_progress_gain > 0.0)
                .then_some(modifiers.success_probability),
        }
    }
}

/// Result of one [`CraftState::apply_and_advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub modifiers: ModifierResult,
    /// `false` when the step only counted as wasted.
    pub committed: bool,
    pub progress_gain: f64,
    pub quality_gain: f64,
}

/// Last-step values kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepDiagnostics {
    pub inner_quiet: f64,
    pub control: u32,
    pub quality_gain: f64,
    pub base_progress_gain: f64,
    pub base_quality_gain: f64,
    pub success: f64,
}

/// Pass/fail flags for the five feasibility criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Feasibility {
    pub progress_ok: bool,
    pub cp_ok: bool,
    pub durability_ok: bool,
    pub trick_ok: bool,
    pub reliability_ok: bool,
}

impl Feasibility {
    /// Progress, durability and CP are all acceptable.
    pub fn is_completed(&self) -> bool {
        self.progress_ok && self.durability_ok && self.cp_ok
    }

    /// Every criterion passes.
    pub fn all(&self) -> bool {
        self.is_completed() && self.trick_ok && self.reliability_ok
    }
}

/// Mutable state of one simulation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftState {
    step: u32,
    action: Option<ActionId>,
    durability: i32,
    cp: f64,
    bonus_max_cp: i32,
    quality: f64,
    progress: f64,
    wasted: f64,
    trick_uses: u32,
    reliability: f64,
    condition: Condition,
    touch_combo_step: u8,
    last_durability_cost: i32,
    effects: EffectTracker,
    diagnostics: StepDiagnostics,
}

impl CraftState {
    /// Fresh state at step 0.
    pub fn new(synth: &Synth) -> Self {
        Self {
            step: 0,
            action: None,
            durability: synth.recipe.durability as i32,
            cp: synth.crafter.crafting_points as f64,
            bonus_max_cp: 0,
            quality: synth.recipe.start_quality as f64,
            progress: 0.0,
            wasted: 0.0,
            trick_uses: 0,
            reliability: 1.0,
            condition: Condition::Normal,
            touch_combo_step: 0,
            last_durability_cost: 0,
            effects: EffectTracker::default(),
            diagnostics: StepDiagnostics::default(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Last applied (or skipped) action.
    pub fn last_action(&self) -> Option<ActionId> {
        self.action
    }

    pub fn durability(&self) -> i32 {
        self.durability
    }

    pub fn cp(&self) -> f64 {
        self.cp
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Accumulated wasted-action penalty.
    pub fn wasted(&self) -> f64 {
        self.wasted
    }

    pub fn trick_uses(&self) -> u32 {
        self.trick_uses
    }

    pub fn reliability(&self) -> f64 {
        self.reliability
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    /// Durability actually debited by the last committed step.
    pub fn last_durability_cost(&self) -> i32 {
        self.last_durability_cost
    }

    pub fn effects(&self) -> &EffectTracker {
        &self.effects
    }

    pub fn diagnostics(&self) -> &StepDiagnostics {
        &self.diagnostics
    }

    /// Records `action` as a skipped step: wasted `+1` and nothing else, not
    /// even the step counter.
    pub fn record_skipped(&mut self, action: ActionId) {
        self.action = Some(action);
        self.wasted += 1.0;
    }

    /// Evaluates the feasibility criteria against `synth`.
    ///
    /// Durability only passes on a finished craft; an unfinished one fails
    /// it regardless of how much durability is left.
    pub fn feasibility(&self, synth: &Synth) -> Feasibility {
        let progress_ok = self.progress >= synth.recipe.difficulty as f64;
        let overrun_ok = match (self.last_durability_cost, self.durability) {
            (10, -5) => true,
            (20, -5 | -10 | -15) => true,
            _ => false,
        };
        Feasibility {
            progress_ok,
            cp_ok: self.cp >= 0.0,
            durability_ok: progress_ok && (self.durability >= 0 || overrun_ok),
            trick_ok: self.trick_uses <= synth.max_trick_uses,
            reliability_ok: self.reliability >= synth.reliability_target,
        }
    }

    /// Applies one real (non-combo) action.
    ///
    /// Increments the step, resolves modifiers, lets `resolve` turn them into
    /// a [`Resolution`], then either commits the gains and effects or, when
    /// the craft is already finished or broken, only counts a wasted action.
    pub fn apply_and_advance<C, F>(
        &mut self,
        synth: &Synth,
        action: &ActionDefinition,
        condition: &C,
        resolve: F,
    ) -> StepOutcome
    where
        C: ConditionModel,
        F: FnOnce(&ModifierResult) -> Resolution,
    {
        self.step += 1;
        let modifiers = self.compute_modifiers(synth, action, condition);
        let resolution = resolve(&modifiers);

        if let Some(factor) = resolution.reliability {
            self.reliability *= factor;
        }
        let progress_gain = resolution.success * modifiers.base_progress_gain.floor();
        let quality_gain = resolution.success
            * (resolution.quality_factor * modifiers.base_quality_gain).floor();

        let finished_or_broken = self.progress >= synth.recipe.difficulty as f64
            || self.durability <= 0
            || self.cp < 0.0;
        if finished_or_broken {
            self.wasted += 1.0;
        } else {
            self.commit(
                synth,
                action,
                &modifiers,
                condition,
                progress_gain,
                quality_gain,
                resolution.success,
            );
        }

        self.diagnostics = StepDiagnostics {
            inner_quiet: self.effects.inner_quiet().unwrap_or(0.0),
            control: modifiers.control,
            quality_gain,
            base_progress_gain: modifiers.base_progress_gain.floor(),
            base_quality_gain: modifiers.base_quality_gain.floor(),
            success: resolution.success,
        };
        self.action = Some(action.id);

        StepOutcome {
            modifiers,
            committed: !finished_or_broken,
            progress_gain,
            quality_gain,
        }
    }

    /// Resolves the effect-adjusted costs and gains of `action`.
    ///
    /// Some rules have side effects on the state (combo markers, consumed
    /// Muscle Memory, wasted penalties) even if the step is later wasted.
    pub fn compute_modifiers<C: ConditionModel>(
        &mut self,
        synth: &Synth,
        action: &ActionDefinition,
        condition: &C,
    ) -> ModifierResult {
        use ActionId::*;

        let id = action.id;
        let craftsmanship = synth.crafter.craftsmanship;
        let mut control = synth.crafter.control;
        let mut cp_cost = action.cp_cost;
        let mut durability_cost = action.durability_cost as f64;

        let eff_crafter_level = synth.effective_crafter_level();
        let eff_recipe_level = synth.recipe.level;
        let level_difference = eff_crafter_level as i64 - eff_recipe_level as i64;
        let pure_level_difference = synth.crafter.level as i64 - synth.recipe.base_level as i64;

        let mut success_probability = action.success_probability;
        if matches!(id, FocusedSynthesis | FocusedTouch) && self.action == Some(Observe) {
            success_probability = 1.0;
        }
        success_probability = success_probability.min(1.0);

        if id == AdvancedTouch && self.action == Some(StandardTouch) && self.touch_combo_step == 1
        {
            self.touch_combo_step = 0;
            cp_cost = 18;
        }

        if id == StandardTouch {
            match self.action {
                Some(BasicTouch) => {
                    cp_cost = 18;
                    self.wasted -= 0.05;
                    self.touch_combo_step = 1;
                }
                Some(StandardTouch) => self.wasted += 0.1,
                _ => {}
            }
        }

        if matches!(id, WasteNot | WasteNot2) && synth.solve_for_leftovers() {
            self.wasted += 50.0;
        }

        // Progress multiplier
        let mut progress_multiplier = 1.0;
        if action.progress_multiplier > 0.0 && self.effects.is_active(MuscleMemory) {
            progress_multiplier += 1.0;
            self.effects.consume(MuscleMemory);
        }
        if self.effects.is_active(Veneration) {
            progress_multiplier += 0.5;
        }
        if id == MuscleMemory && self.step != 1 {
            self.wasted += 1.0;
            progress_multiplier = 0.0;
            cp_cost = 0;
        }
        if (self.durability as f64) < durability_cost && matches!(id, Groundwork | Groundwork2) {
            progress_multiplier *= 0.5;
        }

        // Quality multiplier; Inner Quiet is multiplicative, the buffs additive.
        let mut quality_multiplier = 1.0;
        if self.effects.is_active(GreatStrides) && quality_multiplier > 0.0 {
            quality_multiplier += 1.0;
        }
        if self.effects.is_active(Innovation) {
            quality_multiplier += 0.5;
        }
        let inner_quiet = self.effects.inner_quiet();
        let iq_multiplier = 1.0 + 0.1 * inner_quiet.unwrap_or(0.0);

        if id == ByregotsBlessing {
            match inner_quiet {
                Some(stacks) if stacks >= 1.0 => {
                    quality_multiplier *= 1.0 + (0.2 * stacks).min(3.0);
                }
                _ => quality_multiplier = 0.0,
            }
        }

        let mut base_progress_gain = (synth.base_progress(eff_crafter_level, craftsmanship)
            * action.progress_multiplier
            * progress_multiplier)
            .floor();
        let mut base_quality_gain = (synth.base_quality(eff_crafter_level, control)
            * action.quality_multiplier
            * quality_multiplier
            * iq_multiplier)
            .floor();

        if self.effects.is_active(WasteNot) || self.effects.is_active(WasteNot2) {
            match id {
                PrudentTouch => {
                    base_quality_gain = 0.0;
                    self.wasted += 1.0;
                }
                PrudentSynthesis => {
                    base_progress_gain = 0.0;
                    self.wasted += 1.0;
                }
                _ => durability_cost *= 0.5,
            }
        }

        if id == TrainedFinesse && inner_quiet != Some(10.0) {
            self.wasted += 1.0;
            base_quality_gain = 0.0;
        }

        if id == TrainedEye {
            if self.step == 1 && pure_level_difference >= 10 && synth.recipe.stars == 0 {
                base_quality_gain = synth.recipe.max_quality as f64;
            } else {
                self.wasted += 1.0;
                base_quality_gain = 0.0;
                cp_cost = 0;
            }
        }

        if id == PreciseTouch {
            if condition.check_good_or_excellent() {
                base_quality_gain *= condition.probability_weight();
            } else {
                self.wasted += 1.0;
                base_quality_gain = 0.0;
                cp_cost = 0;
            }
        }

        if id == Reflect && self.step != 1 {
            self.wasted += 1.0;
            control = 0;
            base_quality_gain = 0.0;
            cp_cost = 0;
        }

        ModifierResult {
            craftsmanship,
            control,
            eff_crafter_level,
            eff_recipe_level,
            level_difference,
            success_probability,
            quality_multiplier,
            base_progress_gain,
            base_quality_gain,
            durability_cost,
            cp_cost,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn commit<C: ConditionModel>(
        &mut self,
        synth: &Synth,
        action: &ActionDefinition,
        modifiers: &ModifierResult,
        condition: &C,
        progress_gain: f64,
        quality_gain: f64,
        success: f64,
    ) {
        let durability_cost = modifiers.durability_cost as i32;
        self.progress += progress_gain;
        self.quality += quality_gain;
        self.durability -= durability_cost;
        self.last_durability_cost = durability_cost;
        self.cp -= modifiers.cp_cost as f64;

        self.apply_special_effects(synth, action, condition);
        self.update_counters(action, condition, success);

        if !synth.solve_for_leftovers()
            && self.durability >= -5
            && self.progress >= synth.recipe.difficulty as f64
        {
            self.durability = 0;
        }
        self.durability = self.durability.min(synth.recipe.durability as i32);
        self.cp = self
            .cp
            .min((synth.crafter.crafting_points as i32 + self.bonus_max_cp) as f64);
    }

    fn apply_special_effects<C: ConditionModel>(
        &mut self,
        synth: &Synth,
        action: &ActionDefinition,
        condition: &C,
    ) {
        use ActionId::*;
        let id = action.id;

        if id == MastersMend {
            self.durability += 30;
            if synth.solve_for_leftovers() {
                self.wasted += 50.0;
            }
        }

        if self.effects.is_active(Manipulation) && self.durability > 0 && id != Manipulation {
            self.durability += 5;
            if synth.solve_for_leftovers() {
                self.wasted += 50.0;
            }
        }

        if id == ByregotsBlessing {
            if self.effects.inner_quiet().is_some() {
                self.effects.clear_inner_quiet();
            } else {
                self.wasted += 1.0;
            }
        }

        if id == Reflect {
            if self.step == 1 {
                self.effects.set_inner_quiet(2.0);
            } else {
                self.wasted += 1.0;
            }
        }

        if action.quality_multiplier > 0.0 {
            self.effects.consume(GreatStrides);
        }

        if action.gate.on_good || action.gate.on_excellent {
            if self.cp > 0.0 && condition.check_good_or_excellent() {
                self.trick_uses += 1;
                if id == TricksOfTheTrade {
                    self.cp += 20.0 * condition.probability_weight();
                }
            } else {
                self.wasted += 1.0;
            }
        }

        if matches!(id, Veneration | Innovation) && self.effects.is_active(id) {
            self.wasted += 1.0;
        }
    }

    fn update_counters<C: ConditionModel>(
        &mut self,
        action: &ActionDefinition,
        condition: &C,
        success: f64,
    ) {
        use ActionId::*;
        let id = action.id;

        self.effects.tick();

        if id == PreparatoryTouch {
            self.effects.add_inner_quiet(2.0);
        } else if id == PreciseTouch && condition.check_good_or_excellent() {
            self.effects
                .add_inner_quiet(2.0 * success * condition.probability_weight());
        } else if action.quality_multiplier > 0.0 && id != Reflect && id != TrainedFinesse {
            self.effects.add_inner_quiet(success);
        }

        if action.kind == ActionKind::CountDown {
            if id == MuscleMemory && self.step != 1 {
                self.wasted += 1.0;
            } else {
                self.effects.activate(id, action.active_turns);
            }
        }
    }
}
