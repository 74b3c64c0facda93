//! Criterion benchmarks for u-craftsolve.
//!
//! A level 90 culinarian on a four-star recipe: fitness evaluation, a short
//! solver run and a Monte Carlo batch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_craftsolve::actions::ActionId::{self, *};
use u_craftsolve::heuristic::build_seed;
use u_craftsolve::model::{Crafter, CrafterClass, Recipe, Synth};
use u_craftsolve::sim::MonteCarloSim;
use u_craftsolve::solver::{Evaluate, FitnessEvaluator, IslandRunner, SequenceOps, SolverConfig};

// ===========================================================================
// Fixture
// ===========================================================================

const ACTIONS: &[ActionId] = &[
    MuscleMemory,
    Reflect,
    BasicSynthesis2,
    CarefulSynthesis2,
    Groundwork2,
    PrudentSynthesis,
    FocusedSynthesisCombo,
    FocusedTouchCombo,
    StandardTouchCombo,
    AdvancedTouchCombo,
    BasicTouch,
    ByregotsBlessing,
    PrudentTouch,
    PreparatoryTouch,
    MastersMend,
    WasteNot,
    WasteNot2,
    Manipulation,
    Veneration,
    GreatStrides,
    Innovation,
    Observe,
];

fn synth() -> Synth {
    let recipe = Recipe {
        base_level: 90,
        level: 640,
        difficulty: 6600,
        durability: 70,
        max_quality: 14040,
        progress_divider: 130,
        progress_modifier: 80,
        quality_divider: 115,
        quality_modifier: 70,
        stars: 4,
        ..Recipe::default()
    };
    let crafter = Crafter {
        class: CrafterClass::Culinarian,
        level: 90,
        craftsmanship: 4041,
        control: 4043,
        crafting_points: 611,
        specialist: false,
        actions: ACTIONS.to_vec(),
    };
    Synth::new(crafter, recipe)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_fitness(c: &mut Criterion) {
    let synth = synth();
    let config = SolverConfig::default();
    let evaluator = FitnessEvaluator::new(&synth, &config);
    let seed = build_seed(&synth);

    c.bench_function("fitness_heuristic_seed", |b| {
        b.iter(|| black_box(evaluator.evaluate(black_box(&seed))))
    });
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("island_solver");
    group.sample_size(10);

    let synth = synth();
    let seed = build_seed(&synth);
    for (pop, islands, gen) in [(300usize, 3usize, 20usize), (1200, 12, 10)] {
        let config = SolverConfig::default()
            .with_population_size(pop)
            .with_islands(islands)
            .with_generations(gen)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("p{}_i{}_g{}", pop, islands, gen), pop),
            &config,
            |b, config| {
                let evaluator = FitnessEvaluator::new(&synth, config);
                let ops = SequenceOps::new(&synth.crafter.actions, None, config)
                    .expect("non-empty action set");
                b.iter(|| {
                    let result = IslandRunner::run(&evaluator, &ops, black_box(&seed), config);
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(10);

    let synth = synth();
    let seed = build_seed(&synth);
    for &runs in &[100usize, 600] {
        group.bench_with_input(BenchmarkId::from_parameter(runs), &runs, |b, &runs| {
            b.iter(|| {
                let stats = MonteCarloSim::new(&synth, Some(42)).execute(black_box(&seed), runs);
                black_box(stats)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fitness, bench_solver, bench_monte_carlo);
criterion_main!(benches);
