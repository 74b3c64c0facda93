//! End-to-end solve session.

use tracing::info;

use crate::error::Result;
use crate::heuristic::build_seed;
use crate::report::Report;
use crate::settings::Settings;
use crate::sim::{ExpectedSim, MonteCarloSim};
use crate::solver::{FitnessEvaluator, IslandRunner, SequenceOps};

/// Runs a full session: seed, search, deterministic replay and Monte Carlo
/// batch of the winner.
///
/// The Monte Carlo stream is derived from the solver seed, so a seeded
/// session is reproducible end to end.
///
/// # Errors
/// Returns [`SolverError::InvalidConfig`](crate::SolverError::InvalidConfig)
/// when `settings` fail validation.
pub fn solve(settings: &Settings) -> Result<Report> {
    settings.validate()?;
    let synth = settings.synth();
    let config = &settings.solver;

    let seed = if settings.sequence.is_empty() {
        build_seed(&synth)
    } else {
        settings.sequence.clone()
    };
    let expected = ExpectedSim::new(&synth);
    let seed_feasibility = expected.execute(&seed).feasibility(&synth);
    info!(
        length = seed.len(),
        heuristic = settings.sequence.is_empty(),
        completed = seed_feasibility.is_completed(),
        "seed sequence ready"
    );

    info!(
        population = config.population_size,
        islands = config.islands,
        generations = config.generations,
        seed = ?config.seed,
        "solver started"
    );
    let evaluator = FitnessEvaluator::new(&synth, config);
    let ops = SequenceOps::new(&synth.crafter.actions, synth.max_length, config)?;
    let result = IslandRunner::run(&evaluator, &ops, &seed, config)?;
    let best = result.best.sequence.clone();
    info!(
        fitness = result.best.fitness.fitness,
        progress = result.best.fitness.progress,
        cp = result.best.fitness.cp,
        length = best.len(),
        "solver finished"
    );

    let trajectory = expected.trajectory(&best);
    let feasibility = expected.execute(&best).feasibility(&synth);

    let monte_carlo = MonteCarloSim::new(&synth, config.seed.map(|s| s.wrapping_add(1)))
        .with_handling(settings.conditional_handling)
        .with_parallel(config.parallel)
        .execute(&best, settings.monte_carlo_runs)?;
    info!(
        runs = monte_carlo.runs,
        success_rate = monte_carlo.success_rate,
        "monte carlo batch finished"
    );

    Ok(Report {
        seed,
        seed_feasibility,
        best,
        fitness: result.best.fitness,
        generations: result.generations,
        diversity: result.final_diversity(),
        trajectory,
        feasibility,
        monte_carlo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId::*;
    use crate::error::SolverError;
    use crate::model::Crafter;
    use crate::solver::SolverConfig;

    fn settings() -> Settings {
        Settings {
            crafter: Crafter {
                level: 90,
                craftsmanship: 4041,
                control: 4043,
                crafting_points: 611,
                actions: vec![
                    Reflect,
                    BasicTouch,
                    CarefulSynthesis2,
                    BasicSynthesis2,
                    MastersMend,
                    Innovation,
                ],
                ..Crafter::default()
            },
            solver: SolverConfig::fast()
                .with_population_size(60)
                .with_islands(3)
                .with_generations(5)
                .with_seed(11),
            monte_carlo_runs: 50,
            ..Settings::default()
        }
    }

    #[test]
    fn test_session_runs() {
        let report = solve(&settings()).unwrap();
        assert!(!report.best.is_empty());
        assert_eq!(report.generations, 5);
        assert_eq!(report.monte_carlo.runs, 50);
        assert_eq!(
            report.final_state().map(|s| s.step() as usize),
            Some(report.trajectory.len() - 1)
        );
        let text = report.to_string();
        assert!(text.contains("Monte Carlo (50 runs)"));
        assert!(text.contains("Feasibility:"));
    }

    #[test]
    fn test_seeded_session_is_reproducible() {
        let a = solve(&settings()).unwrap();
        let b = solve(&settings()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_explicit_seed_sequence_is_used() {
        let settings = Settings {
            sequence: vec![Reflect, CarefulSynthesis2],
            ..settings()
        };
        let report = solve(&settings).unwrap();
        assert_eq!(report.seed, vec![Reflect, CarefulSynthesis2]);
    }

    #[test]
    fn test_invalid_settings() {
        let settings = Settings {
            monte_carlo_runs: 0,
            ..settings()
        };
        assert!(matches!(
            solve(&settings),
            Err(SolverError::InvalidConfig(_))
        ));
    }
}
