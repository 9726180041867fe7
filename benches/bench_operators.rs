use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chromoga::{
    breeding::{CrossoverKind, MutationKind},
    caching::CacheType,
    evolution::FitnessEvaluator,
    genome::{Alphabet, ChromosomeSchema},
    population::Candidate,
    rng::RandomNumberGenerator,
    selection::{FitnessScaling, SelectionMethod, SelectionStrategy},
};

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");
    let mut rng = RandomNumberGenerator::from_seed(1);

    for length in [16, 256].iter() {
        let bits = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), *length).unwrap();
        let a = bits.random_chromosome(&mut rng).unwrap();
        let b = bits.random_chromosome(&mut rng).unwrap();

        for kind in [CrossoverKind::SinglePoint, CrossoverKind::MultiPoint(4)] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", kind), length), length, |bench, _| {
                bench.iter(|| black_box(kind.crossover(&a, &b, 1.0, &mut rng)))
            });
        }

        let tours = ChromosomeSchema::uniform(Alphabet::indices(*length).unwrap(), *length).unwrap();
        let x = tours.random_chromosome(&mut rng).unwrap();
        let y = tours.random_chromosome(&mut rng).unwrap();

        for kind in [CrossoverKind::Order, CrossoverKind::PartiallyMatched] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", kind), length), length, |bench, _| {
                bench.iter(|| black_box(kind.crossover(&x, &y, 1.0, &mut rng)))
            });
        }
    }

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation");
    let mut rng = RandomNumberGenerator::from_seed(2);
    let reals = ChromosomeSchema::uniform(Alphabet::range(-1.0f64, 1.0).unwrap(), 128).unwrap();
    let chromosome = reals.random_chromosome(&mut rng).unwrap();

    for kind in [MutationKind::Resample, MutationKind::gaussian()] {
        group.bench_function(format!("{:?}", kind), |b| {
            b.iter(|| black_box(kind.mutate(&reals, &chromosome, 0.05, 1.0, &mut rng).unwrap()))
        });
    }

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let mut rng = RandomNumberGenerator::from_seed(3);

    for size in [100, 10000].iter() {
        let fitness: Vec<f64> = (0..*size).map(|i| (i % 97) as f64).collect();
        for method in [
            SelectionMethod::Proportionate {
                scaling: FitnessScaling::Raw,
            },
            SelectionMethod::Proportionate {
                scaling: FitnessScaling::Rank,
            },
            SelectionMethod::Tournament { size: 4 },
            SelectionMethod::Rank { pressure: 1.5 },
        ] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", method), size), &fitness, |b, fitness| {
                b.iter(|| black_box(method.select(fitness, fitness.len(), &mut rng).unwrap()))
            });
        }
    }

    group.finish();
}

fn bench_fitness_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_evaluation");
    let mut rng = RandomNumberGenerator::from_seed(4);
    let schema = ChromosomeSchema::uniform(Alphabet::<u8>::binary(), 12).unwrap();
    let challenge = |genes: &[u8]| genes.iter().map(|&g| (g as f64).sqrt()).sum::<f64>();

    // A small alphabet and many candidates make duplicates common.
    let candidates: Vec<Candidate<u8>> = (0..5000)
        .map(|_| Candidate::new(schema.random_chromosome(&mut rng).unwrap()))
        .collect();

    for cache_type in [CacheType::Disabled, CacheType::Generation] {
        for threshold in [usize::MAX, 1] {
            let label = if threshold == 1 { "parallel" } else { "sequential" };
            group.bench_function(format!("{:?}_{}", cache_type, label), |b| {
                b.iter(|| {
                    let mut evaluator = FitnessEvaluator::new(&challenge, cache_type, None, threshold);
                    black_box(evaluator.evaluate(&candidates, None).unwrap())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_crossover,
    bench_mutation,
    bench_selection,
    bench_fitness_evaluation
);
criterion_main!(benches);
