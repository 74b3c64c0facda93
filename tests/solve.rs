//! End-to-end sessions through the public API.

use u_craftsolve::actions::ActionId::{self, *};
use u_craftsolve::model::{Crafter, CrafterClass, Objective, Recipe};
use u_craftsolve::sim::{ExpectedSim, MonteCarloSim};
use u_craftsolve::solver::SolverConfig;
use u_craftsolve::{solve, Settings};

const ACTIONS: &[ActionId] = &[
    Reflect,
    BasicSynthesis2,
    CarefulSynthesis2,
    BasicTouch,
    StandardTouchCombo,
    ByregotsBlessing,
    MastersMend,
    Manipulation,
    Veneration,
    Innovation,
    GreatStrides,
    WasteNot,
    Observe,
];

fn settings() -> Settings {
    Settings {
        recipe: Recipe {
            level: 560,
            difficulty: 2000,
            durability: 70,
            max_quality: 3000,
            ..Recipe::default()
        },
        crafter: Crafter {
            class: CrafterClass::Weaver,
            level: 90,
            craftsmanship: 4041,
            control: 4043,
            crafting_points: 611,
            specialist: false,
            actions: ACTIONS.to_vec(),
        },
        solver: SolverConfig::fast()
            .with_population_size(400)
            .with_islands(4)
            .with_generations(40)
            .with_seed(2024),
        monte_carlo_runs: 200,
        ..Settings::default()
    }
}

#[test]
fn test_session_finishes_the_craft() {
    let settings = settings();
    let report = solve(&settings).unwrap();

    // The heuristic seed alone completes this recipe, and the best
    // individual can only improve on it.
    assert!(report.seed_feasibility.is_completed());
    assert!(report.feasibility.progress_ok);
    assert!(report.feasibility.durability_ok);
    assert!(report.feasibility.cp_ok);

    // Every action here always succeeds, so the batch agrees with the
    // deterministic replay.
    let synth = settings.synth();
    let final_state = ExpectedSim::new(&synth).execute(&report.best);
    assert_eq!(report.final_state(), Some(&final_state));
    assert_eq!(report.monte_carlo.success_rate, 100.0);
    assert_eq!(report.monte_carlo.mean.quality, final_state.quality());
    assert_eq!(report.monte_carlo.min, report.monte_carlo.max);
}

#[test]
fn test_leftover_session_keeps_resources() {
    let settings = Settings {
        objective: Objective::LeftoverResources,
        ..settings()
    };
    let report = solve(&settings).unwrap();
    assert!(report.feasibility.is_completed());
    let last = report.final_state().unwrap();
    assert!(last.cp() > 0.0);
    assert!(last.durability() > 0);
}

#[test]
fn test_report_renders_every_section() {
    let report = solve(&settings()).unwrap();
    let text = report.to_string();
    for heading in [
        "Seed sequence",
        "Best sequence after 40 generations",
        "Trajectory:",
        "Monte Carlo (200 runs)",
        "median",
        "Feasibility:",
    ] {
        assert!(text.contains(heading), "missing {heading:?}");
    }
}

#[test]
fn test_certain_batch_has_no_spread() {
    let synth = settings().synth();
    let sequence = [
        Reflect,
        BasicTouch,
        CarefulSynthesis2,
        CarefulSynthesis2,
        CarefulSynthesis2,
        CarefulSynthesis2,
    ];
    let stats = MonteCarloSim::new(&synth, Some(1))
        .with_assume_success(true)
        .execute(&sequence, 600)
        .unwrap();
    assert_eq!(stats.success_rate, 100.0);
    assert_eq!(stats.min, stats.max);
    assert_eq!(stats.mean.quality, stats.median.quality);
    assert_eq!(stats.mean.progress, stats.median.progress);
    assert_eq!(stats.mean.durability, stats.max.durability);
}

#[cfg(feature = "cli")]
#[test]
fn test_session_from_toml() {
    let text = r#"
        monte_carlo_runs = 20

        [recipe]
        level = 560
        difficulty = 1500
        durability = 70
        max_quality = 2000

        [crafter]
        class = "weaver"
        level = 90
        craftsmanship = 4041
        control = 4043
        crafting_points = 611
        actions = ["reflect", "carefulSynthesis2", "basicTouch", "mastersMend", "innovation"]

        [solver]
        population_size = 60
        islands = 3
        generations = 5
        seed = 3
    "#;
    let settings = Settings::from_toml_str(text).unwrap();
    let report = solve(&settings).unwrap();
    assert_eq!(report.generations, 5);
    assert_eq!(report.monte_carlo.runs, 20);
    assert!(report
        .best
        .iter()
        .all(|a| settings.crafter.actions.contains(a)));
}
