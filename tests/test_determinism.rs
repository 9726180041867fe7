use chromoga::{
    breeding::{CrossoverKind, MutationKind},
    caching::CacheType,
    evolution::{EvolutionLauncher, EvolutionOptions, EvolutionResult},
    genome::{Alphabet, ChromosomeSchema},
    selection::{FitnessScaling, SelectionMethod},
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn rastrigin(genes: &[f64]) -> f64 {
    let penalty: f64 = genes
        .iter()
        .map(|x| x * x - 10.0 * (std::f64::consts::TAU * x).cos())
        .sum();
    // Shifted so that larger is better and the value stays positive.
    1000.0 - (10.0 * genes.len() as f64 + penalty)
}

fn options(seed: u64, parallel_threshold: usize, selection: SelectionMethod) -> EvolutionOptions {
    EvolutionOptions::builder()
        .population_size(24)
        .max_generations(30)
        .crossover(CrossoverKind::MultiPoint(2))
        .mutation(MutationKind::gaussian())
        .mutation_rate(0.2)
        .inversion_rate(0.05)
        .elitism(2)
        .overpopulation(1.5)
        .selection(selection)
        .cache_type(CacheType::Run)
        .parallel_threshold(parallel_threshold)
        .seed(seed)
        .build()
}

fn run(seed: u64, parallel_threshold: usize, selection: SelectionMethod) -> EvolutionResult<f64> {
    let schema = ChromosomeSchema::uniform(Alphabet::range(-5.12f64, 5.12).unwrap(), 6).unwrap();
    EvolutionLauncher::builder()
        .with_schema(schema)
        .with_challenge(rastrigin as fn(&[f64]) -> f64)
        .with_options(options(seed, parallel_threshold, selection))
        .build()
        .unwrap()
        .evolve()
        .unwrap()
}

#[test]
fn test_same_seed_same_history() {
    init_tracing();
    for selection in [
        SelectionMethod::Proportionate {
            scaling: FitnessScaling::Raw,
        },
        SelectionMethod::Proportionate {
            scaling: FitnessScaling::linear(),
        },
        SelectionMethod::Tournament { size: 4 },
        SelectionMethod::Rank { pressure: 1.7 },
    ] {
        let first = run(99, 1000, selection);
        let second = run(99, 1000, selection);
        assert_eq!(first, second, "{:?} is not reproducible", selection);
    }
}

#[test]
fn test_parallel_run_matches_sequential() {
    init_tracing();
    let selection = SelectionMethod::Tournament { size: 3 };
    let sequential = run(7, usize::MAX, selection);
    let parallel = run(7, 1, selection);
    assert_eq!(sequential.history, parallel.history);
    assert_eq!(sequential.best, parallel.best);
    assert_eq!(sequential.fitness, parallel.fitness);
}

#[test]
fn test_different_seeds_differ() {
    init_tracing();
    let selection = SelectionMethod::Rank { pressure: 1.5 };
    let a = run(1, 1000, selection);
    let b = run(2, 1000, selection);
    assert_ne!(a.history, b.history);
}

#[test]
fn test_reported_seed_reproduces_run() {
    init_tracing();
    let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 12).unwrap();
    let ones = |genes: &[u8]| genes.iter().map(|&g| g as f64).sum::<f64>();

    let unseeded = EvolutionLauncher::builder()
        .with_schema(schema.clone())
        .with_challenge(ones)
        .with_options(
            EvolutionOptions::builder()
                .population_size(10)
                .max_generations(15)
                .mutation_rate(0.05)
                .build(),
        )
        .build()
        .unwrap()
        .evolve()
        .unwrap();

    let replay = EvolutionLauncher::builder()
        .with_schema(schema)
        .with_challenge(ones)
        .with_options(
            EvolutionOptions::builder()
                .population_size(10)
                .max_generations(15)
                .mutation_rate(0.05)
                .seed(unseeded.seed)
                .build(),
        )
        .build()
        .unwrap()
        .evolve()
        .unwrap();

    assert_eq!(unseeded, replay);
}
