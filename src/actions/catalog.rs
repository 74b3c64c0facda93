//! The immutable action table.

use super::id::{ActionId, ACTION_COUNT};

/// How an action's effect persists over the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Applies once, on the step it is used.
    Immediate,
    /// Accumulates a value over the craft (Inner Quiet stacks).
    CountUp,
    /// A buff that stays active for a number of turns.
    CountDown,
}

/// Material conditions under which a gated action may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionGate {
    pub on_good: bool,
    pub on_excellent: bool,
    pub on_poor: bool,
}

impl ConditionGate {
    /// No restriction.
    pub const NONE: ConditionGate = ConditionGate {
        on_good: false,
        on_excellent: false,
        on_poor: false,
    };

    /// Usable on good or excellent.
    pub const GOOD_OR_EXCELLENT: ConditionGate = ConditionGate {
        on_good: true,
        on_excellent: true,
        on_poor: false,
    };

    /// Returns `true` if any condition gate is set.
    pub const fn is_gated(&self) -> bool {
        self.on_good || self.on_excellent || self.on_poor
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub id: ActionId,
    /// camelCase name used in settings files.
    pub short_name: &'static str,
    /// Display name.
    pub name: &'static str,
    pub durability_cost: i32,
    pub cp_cost: i32,
    /// Base chance of success in `[0, 1]`.
    pub success_probability: f64,
    pub quality_multiplier: f64,
    pub progress_multiplier: f64,
    pub kind: ActionKind,
    /// Buff duration for [`ActionKind::CountDown`] actions.
    pub active_turns: u32,
    /// Crafter level at which the action unlocks.
    pub level: u32,
    pub gate: ConditionGate,
    /// Constituent actions of a combo entry; empty for real actions.
    pub combo: &'static [ActionId],
}

impl ActionDefinition {
    /// Returns `true` for combo entries.
    pub fn is_combo(&self) -> bool {
        !self.combo.is_empty()
    }

    /// Returns `true` for condition-gated actions.
    pub fn is_conditional(&self) -> bool {
        self.gate.is_gated()
    }

    /// The actions this entry stands for: the combo expansion, or the entry
    /// itself.
    pub fn expand(&self) -> impl Iterator<Item = &'static ActionDefinition> + '_ {
        let single = if self.is_combo() { None } else { Some(self.id) };
        self.combo
            .iter()
            .copied()
            .chain(single)
            .map(ActionId::definition)
    }
}

impl ActionId {
    /// Catalog entry for this identifier.
    pub fn definition(self) -> &'static ActionDefinition {
        &CATALOG[self.index()]
    }
}

/// Looks up a catalog entry.
pub fn get(id: ActionId) -> &'static ActionDefinition {
    id.definition()
}

/// All catalog entries in identifier order.
pub fn all() -> &'static [ActionDefinition; ACTION_COUNT] {
    &CATALOG
}

#[allow(clippy::too_many_arguments)]
const fn action(
    id: ActionId,
    short_name: &'static str,
    name: &'static str,
    durability_cost: i32,
    cp_cost: i32,
    success_probability: f64,
    quality_multiplier: f64,
    progress_multiplier: f64,
    kind: ActionKind,
    active_turns: u32,
    level: u32,
) -> ActionDefinition {
    ActionDefinition {
        id,
        short_name,
        name,
        durability_cost,
        cp_cost,
        success_probability,
        quality_multiplier,
        progress_multiplier,
        kind,
        active_turns,
        level,
        gate: ConditionGate::NONE,
        combo: &[],
    }
}

const fn gated(def: ActionDefinition, gate: ConditionGate) -> ActionDefinition {
    ActionDefinition { gate, ..def }
}

const fn combo(def: ActionDefinition, actions: &'static [ActionId]) -> ActionDefinition {
    ActionDefinition {
        combo: actions,
        ..def
    }
}

use ActionId::*;
use ActionKind::{CountDown, CountUp, Immediate};

#[rustfmt::skip]
static CATALOG: [ActionDefinition; ACTION_COUNT] = [
    //     id                  short name            display name           dur  cp  succ  qual  prog  kind       turns  lvl
    action(Observe,            "observe",            "Observe",               0,   7, 1.0, 0.0,  0.0, Immediate, 1, 13),

    action(BasicSynthesis,     "basicSynthesis",     "Basic Synthesis",      10,   0, 1.0, 0.0,  1.0, Immediate, 1,  1),
    action(BasicSynthesis2,    "basicSynthesis2",    "Basic Synthesis",      10,   0, 1.0, 0.0,  1.2, Immediate, 1, 31),
    action(CarefulSynthesis,   "carefulSynthesis",   "Careful Synthesis",    10,   7, 1.0, 0.0,  1.5, Immediate, 1, 62),
    action(RapidSynthesis,     "rapidSynthesis",     "Rapid Synthesis",      10,   0, 0.5, 0.0,  2.5, Immediate, 1,  9),

    action(BasicTouch,         "basicTouch",         "Basic Touch",          10,  18, 1.0, 1.0,  0.0, Immediate, 1,  5),
    action(StandardTouch,      "standardTouch",      "Standard Touch",       10,  32, 1.0, 1.2,  0.0, Immediate, 1, 18),
    action(HastyTouch,         "hastyTouch",         "Hasty Touch",          10,   0, 0.6, 1.0,  0.0, Immediate, 1,  9),
    action(ByregotsBlessing,   "byregotsBlessing",   "Byregot's Blessing",   10,  24, 1.0, 1.0,  0.0, Immediate, 1, 50),

    action(MastersMend,        "mastersMend",        "Master's Mend",         0,  88, 1.0, 0.0,  0.0, Immediate, 1,  7),
    gated(
    action(TricksOfTheTrade,   "tricksOfTheTrade",   "Tricks of the Trade",   0,   0, 1.0, 0.0,  0.0, Immediate, 1, 13),
        ConditionGate::GOOD_OR_EXCELLENT),

    action(InnerQuiet,         "innerQuiet",         "Inner Quiet",           0,  18, 1.0, 0.0,  0.0, CountUp,   1, 11),
    action(Manipulation,       "manipulation",       "Manipulation",          0,  96, 1.0, 0.0,  0.0, CountDown, 8, 65),
    action(WasteNot,           "wasteNot",           "Waste Not",             0,  56, 1.0, 0.0,  0.0, CountDown, 4, 15),
    action(WasteNot2,          "wasteNot2",          "Waste Not II",          0,  98, 1.0, 0.0,  0.0, CountDown, 8, 47),
    action(Veneration,         "veneration",         "Veneration",            0,  18, 1.0, 0.0,  0.0, CountDown, 4, 15),
    action(Innovation,         "innovation",         "Innovation",            0,  18, 1.0, 0.0,  0.0, CountDown, 4, 26),
    action(GreatStrides,       "greatStrides",       "Great Strides",         0,  32, 1.0, 0.0,  0.0, CountDown, 3, 21),

    gated(
    action(PreciseTouch,       "preciseTouch",       "Precise Touch",        10,  18, 1.0, 1.5,  0.0, Immediate, 1, 53),
        ConditionGate::GOOD_OR_EXCELLENT),
    action(MuscleMemory,       "muscleMemory",       "Muscle Memory",        10,   6, 1.0, 0.0,  3.0, CountDown, 5, 54),

    action(RapidSynthesis2,    "rapidSynthesis2",    "Rapid Synthesis",      10,   0, 0.5, 0.0,  5.0, Immediate, 1, 63),
    action(PrudentTouch,       "prudentTouch",       "Prudent Touch",         5,  25, 1.0, 1.0,  0.0, Immediate, 1, 66),
    action(FocusedSynthesis,   "focusedSynthesis",   "Focused Synthesis",    10,   5, 0.5, 0.0,  2.0, Immediate, 1, 67),
    action(FocusedTouch,       "focusedTouch",       "Focused Touch",        10,  18, 0.5, 1.5,  0.0, Immediate, 1, 68),
    action(Reflect,            "reflect",            "Reflect",              10,   6, 1.0, 1.0,  0.0, Immediate, 1, 69),

    action(PreparatoryTouch,   "preparatoryTouch",   "Preparatory Touch",    20,  40, 1.0, 2.0,  0.0, Immediate, 1, 71),
    action(Groundwork,         "groundwork",         "Groundwork",           20,  18, 1.0, 0.0,  3.0, Immediate, 1, 72),
    action(DelicateSynthesis,  "delicateSynthesis",  "Delicate Synthesis",   10,  32, 1.0, 1.0,  1.0, Immediate, 1, 76),
    gated(
    action(IntensiveSynthesis, "intensiveSynthesis", "Intensive Synthesis",  10,   6, 1.0, 0.0,  4.0, Immediate, 1, 78),
        ConditionGate::GOOD_OR_EXCELLENT),
    action(TrainedEye,         "trainedEye",         "Trained Eye",          10, 250, 1.0, 0.0,  0.0, Immediate, 1, 80),

    action(CarefulSynthesis2,  "carefulSynthesis2",  "Careful Synthesis",    10,   7, 1.0, 0.0,  1.8, Immediate, 1, 82),
    action(Groundwork2,        "groundwork2",        "Groundwork",           20,  18, 1.0, 0.0,  3.6, Immediate, 1, 86),
    action(AdvancedTouch,      "advancedTouch",      "Advanced Touch",       10,  46, 1.0, 1.5,  0.0, Immediate, 1, 84),
    action(PrudentSynthesis,   "prudentSynthesis",   "Prudent Synthesis",     5,  18, 1.0, 0.0,  1.8, Immediate, 1, 88),
    action(TrainedFinesse,     "trainedFinesse",     "Trained Finesse",       0,  32, 1.0, 1.0,  0.0, Immediate, 1, 90),

    combo(
    action(FocusedTouchCombo,     "focusedTouchCombo",     "Focused Touch Combo",     10, 25, 1.0, 1.5,  0.0, Immediate, 1, 68),
        &[Observe, FocusedTouch]),
    combo(
    action(FocusedSynthesisCombo, "focusedSynthesisCombo", "Focused Synthesis Combo", 10, 12, 1.0, 0.0,  2.0, Immediate, 1, 67),
        &[Observe, FocusedSynthesis]),
    combo(
    action(StandardTouchCombo,    "standardTouchCombo",    "Standard Touch Combo",    20, 36, 1.0, 2.25, 0.0, Immediate, 1, 18),
        &[BasicTouch, StandardTouch]),
    combo(
    action(AdvancedTouchCombo,    "advancedTouchCombo",    "Advanced Touch Combo",    30, 54, 1.0, 3.75, 0.0, Immediate, 1, 84),
        &[BasicTouch, StandardTouch, AdvancedTouch]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_id() {
        for (i, def) in all().iter().enumerate() {
            assert_eq!(def.id.index(), i, "{} out of place", def.short_name);
            assert_eq!(get(def.id), def);
        }
    }

    #[test]
    fn test_short_names_are_unique() {
        let mut names: Vec<_> = all().iter().map(|d| d.short_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ACTION_COUNT);
    }

    #[test]
    fn test_combos_are_one_level_deep() {
        let combos: Vec<_> = all().iter().filter(|d| d.is_combo()).collect();
        assert_eq!(combos.len(), 4);
        for def in combos {
            assert!(def.combo.len() >= 2);
            for part in def.combo {
                assert!(
                    !part.definition().is_combo(),
                    "{} expands into combo {}",
                    def.short_name,
                    part.definition().short_name
                );
            }
        }
    }

    #[test]
    fn test_expand() {
        let parts: Vec<_> = AdvancedTouchCombo.definition().expand().map(|d| d.id).collect();
        assert_eq!(parts, vec![BasicTouch, StandardTouch, AdvancedTouch]);

        let parts: Vec<_> = Veneration.definition().expand().map(|d| d.id).collect();
        assert_eq!(parts, vec![Veneration]);
    }

    #[test]
    fn test_gated_actions() {
        let gated: Vec<_> = all()
            .iter()
            .filter(|d| d.is_conditional())
            .map(|d| d.id)
            .collect();
        assert_eq!(gated, vec![TricksOfTheTrade, PreciseTouch, IntensiveSynthesis]);
        for id in gated {
            assert!(!id.definition().gate.on_poor);
        }
    }

    #[test]
    fn test_probabilities_in_range() {
        for def in all() {
            assert!((0.0..=1.0).contains(&def.success_probability));
            if def.kind == ActionKind::CountDown {
                assert!(def.active_turns > 0);
            }
        }
    }
}
