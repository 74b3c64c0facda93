//! Human-readable session report.

use std::fmt;

use crate::actions::ActionId;
use crate::model::{CraftState, Feasibility};
use crate::sim::{MonteCarloStats, StatLine};
use crate::solver::Fitness;

/// Everything a solve session produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Sequence the population was seeded with.
    pub seed: Vec<ActionId>,

    /// Feasibility of the seed under deterministic replay.
    pub seed_feasibility: Feasibility,

    /// Best sequence found.
    pub best: Vec<ActionId>,

    pub fitness: Fitness,

    pub generations: usize,

    /// Fitness-component standard deviations of the final population.
    pub diversity: [f64; 4],

    /// Deterministic replay of the best sequence, fresh state first.
    pub trajectory: Vec<CraftState>,

    /// Feasibility of the best sequence under deterministic replay.
    pub feasibility: Feasibility,

    /// Monte Carlo replays of the best sequence.
    pub monte_carlo: MonteCarloStats,
}

impl Report {
    /// Final state of the deterministic replay.
    pub fn final_state(&self) -> Option<&CraftState> {
        self.trajectory.last()
    }
}

fn flag(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAIL"
    }
}

fn write_feasibility(f: &mut fmt::Formatter<'_>, checks: &Feasibility) -> fmt::Result {
    writeln!(
        f,
        "  progress {}  durability {}  cp {}  tricks {}  reliability {}",
        flag(checks.progress_ok),
        flag(checks.durability_ok),
        flag(checks.cp_ok),
        flag(checks.trick_ok),
        flag(checks.reliability_ok),
    )
}

fn write_sequence(f: &mut fmt::Formatter<'_>, sequence: &[ActionId]) -> fmt::Result {
    for (i, action) in sequence.iter().enumerate() {
        writeln!(f, "  {:>3}. {action}", i + 1)?;
    }
    Ok(())
}

fn write_stat_row(f: &mut fmt::Formatter<'_>, label: &str, row: &StatLine) -> fmt::Result {
    writeln!(
        f,
        "  {label:<8} {:>10.1} {:>8.1} {:>10.1} {:>10.1} {:>6.1}",
        row.durability, row.cp, row.quality, row.progress, row.hq_percent
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seed sequence ({} actions):", self.seed.len())?;
        write_sequence(f, &self.seed)?;
        write_feasibility(f, &self.seed_feasibility)?;
        writeln!(f)?;

        writeln!(
            f,
            "Best sequence after {} generations ({} actions):",
            self.generations,
            self.best.len()
        )?;
        write_sequence(f, &self.best)?;
        writeln!(
            f,
            "  fitness {:.3}  progress {:.0}  cp {:.0}",
            self.fitness.fitness, self.fitness.progress, self.fitness.cp
        )?;
        writeln!(
            f,
            "  diversity {:.3} / {:.3} / {:.3} / {:.3}",
            self.diversity[0], self.diversity[1], self.diversity[2], self.diversity[3]
        )?;
        writeln!(f)?;

        writeln!(f, "Trajectory:")?;
        writeln!(
            f,
            "  {:>4} {:<28} {:>5} {:>6} {:>8} {:>8} {:>5} {:>9} {:>6} {:>6}",
            "step", "action", "dur", "cp", "quality", "progress", "iq", "condition", "waste", "rel"
        )?;
        for state in &self.trajectory {
            let action = state
                .last_action()
                .map_or_else(|| "-".to_string(), |a| a.to_string());
            writeln!(
                f,
                "  {:>4} {:<28} {:>5} {:>6.0} {:>8.0} {:>8.0} {:>5.1} {:>9} {:>6.2} {:>6.3}",
                state.step(),
                action,
                state.durability(),
                state.cp(),
                state.quality(),
                state.progress(),
                state.effects().inner_quiet().unwrap_or(0.0),
                state.condition().to_string(),
                state.wasted(),
                state.reliability(),
            )?;
        }
        writeln!(f)?;

        let mc = &self.monte_carlo;
        writeln!(
            f,
            "Monte Carlo ({} runs): success rate {:.1}%",
            mc.runs, mc.success_rate
        )?;
        writeln!(
            f,
            "  {:<8} {:>10} {:>8} {:>10} {:>10} {:>6}",
            "", "durability", "cp", "quality", "progress", "hq%"
        )?;
        write_stat_row(f, "mean", &mc.mean)?;
        write_stat_row(f, "median", &mc.median)?;
        write_stat_row(f, "min", &mc.min)?;
        write_stat_row(f, "max", &mc.max)?;
        writeln!(f)?;

        writeln!(f, "Feasibility:")?;
        write_feasibility(f, &self.feasibility)
    }
}
