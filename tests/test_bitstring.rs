use chromoga::{
    evolution::{EvolutionLauncher, EvolutionOptions, LogLevel, TerminationReason},
    genome::{Alphabet, ChromosomeSchema},
    selection::SelectionMethod,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn one_max(genes: &[u8]) -> f64 {
    genes.iter().map(|&g| g as f64).sum()
}

fn bits(length: usize) -> ChromosomeSchema<u8> {
    ChromosomeSchema::uniform(Alphabet::<u8>::binary(), length).unwrap()
}

fn small_one_max_options(seed: u64, mutation_rate: f64) -> EvolutionOptions {
    EvolutionOptions::builder()
        .population_size(4)
        .max_generations(50)
        .crossover_rate(1.0)
        .mutation_rate(mutation_rate)
        .inversion_rate(0.0)
        .elitism(1)
        .seed(seed)
        .build()
}

fn converged_runs(mutation_rate: f64) -> usize {
    (0..100u64)
        .filter(|&seed| {
            let launcher = EvolutionLauncher::builder()
                .with_schema(bits(5))
                .with_challenge(one_max as fn(&[u8]) -> f64)
                .with_options(small_one_max_options(seed, mutation_rate))
                .build()
                .unwrap();
            let result = launcher.evolve().unwrap();
            result.fitness == 5.0 && result.best.genes() == [1u8; 5]
        })
        .count()
}

#[test]
fn test_one_max_without_mutation() {
    init_tracing();
    // Without mutation a bit missing from every initial chromosome can never
    // appear, and drift in a population of four loses bits quickly.
    let converged = converged_runs(0.0);
    assert!(converged >= 10, "only {} of 100 runs converged", converged);
}

#[test]
fn test_one_max_with_mutation() {
    init_tracing();
    let converged = converged_runs(0.05);
    assert!(converged >= 90, "only {} of 100 runs converged", converged);
}

#[test]
fn test_target_fitness_stops_the_run() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(16))
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(40)
                .max_generations(500)
                .mutation_rate(0.03)
                .elitism(2)
                .selection(SelectionMethod::Tournament { size: 3 })
                .target_fitness(16.0)
                .seed(21)
                .log_level(LogLevel::Minimal)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve().unwrap();
    assert_eq!(result.reason, TerminationReason::TargetReached);
    assert_eq!(result.fitness, 16.0);
    assert!(result.generations < 500);
    assert_eq!(result.history.len(), result.generations + 1);
    assert_eq!(result.history.last().unwrap().best_ever, 16.0);
}

#[test]
fn test_best_ever_never_decreases() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(20))
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(12)
                .max_generations(60)
                .mutation_rate(0.2)
                .seed(8)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve().unwrap();
    for pair in result.history.windows(2) {
        assert!(pair[1].best_ever >= pair[0].best_ever);
        assert!(pair[1].best_ever >= pair[1].best);
    }
    assert_eq!(result.fitness, result.history.last().unwrap().best_ever);
    assert_eq!(one_max(result.best.genes()), result.fitness);
}

#[test]
fn test_elitism_keeps_generation_best() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(20))
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(12)
                .max_generations(60)
                .mutation_rate(0.3)
                .elitism(1)
                .seed(8)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve().unwrap();
    for pair in result.history.windows(2) {
        assert!(pair[1].best >= pair[0].best);
    }
}

#[test]
fn test_two_individuals_of_one_gene() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(1))
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(2)
                .max_generations(10)
                .crossover_rate(1.0)
                .seed(5)
                .log_level(LogLevel::Verbose)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve().unwrap();
    assert_eq!(result.reason, TerminationReason::MaxGenerations);
    assert_eq!(result.generations, 10);
    assert!(result.history.iter().all(|record| record.crossovers == 0));
}

#[test]
fn test_stagnation_window() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(6))
        .with_challenge(|_: &[u8]| 1.0)
        .with_options(
            EvolutionOptions::builder()
                .population_size(6)
                .max_generations(100)
                .stagnation_window(4)
                .seed(2)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve().unwrap();
    assert_eq!(result.reason, TerminationReason::Stagnation);
    assert_eq!(result.generations, 4);
}

#[test]
fn test_observer_sees_every_generation() {
    init_tracing();
    let launcher = EvolutionLauncher::builder()
        .with_schema(bits(10))
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(8)
                .max_generations(12)
                .mutation_rate(0.1)
                .seed(31)
                .build(),
        )
        .build()
        .unwrap();

    let mut observed = Vec::new();
    let result = launcher
        .evolve_with(|record, population| {
            assert_eq!(population.len(), 8);
            let best = population
                .fitness()
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(best, record.best);
            observed.push(record.clone());
        })
        .unwrap();

    assert_eq!(observed, result.history);
    assert!(observed[1..].iter().all(|record| record.evaluations <= 8));
}

#[test]
fn test_evolve_from_seeded_optimum() {
    init_tracing();
    let schema = bits(8);
    let optimum = schema.chromosome(vec![1; 8]).unwrap();
    let launcher = EvolutionLauncher::builder()
        .with_schema(schema)
        .with_challenge(one_max as fn(&[u8]) -> f64)
        .with_options(
            EvolutionOptions::builder()
                .population_size(10)
                .target_fitness(8.0)
                .seed(1)
                .build(),
        )
        .build()
        .unwrap();

    let result = launcher.evolve_from(vec![optimum.clone()], |_, _| {}).unwrap();
    assert_eq!(result.reason, TerminationReason::TargetReached);
    assert_eq!(result.generations, 0);
    assert_eq!(result.best, optimum);
}
