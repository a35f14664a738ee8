use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kd_table::{BuildConfig, KdTree, Point};
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn get_rand() -> impl rand::Rng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

fn random_points(rng: &mut impl Rng, size: usize, extent: f64) -> Vec<Point> {
    (0..size)
        .map(|_| Point::new(rng.gen_range(0.0, extent), rng.gen_range(0.0, extent)))
        .collect()
}

fn nearest_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("KdTree nearest random");
    for size in 8..17 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let tree = KdTree::from_iterator(random_points(&mut rng, size, 7800.0).into_iter());

            b.iter(|| {
                let p = Point::new(rng.gen_range(0.0, 7800.0), rng.gen_range(0.0, 7800.0));
                tree.nearest(&p)
            })
        });
    }
    group.finish();
}

fn nearest_in_tree_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("KdTree nearest, all queried points are in the tree");
    for size in 8..17 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let points = random_points(&mut rng, size, 7800.0);
            let tree = KdTree::from_iterator(points.iter().cloned());

            b.iter(|| {
                let i = rng.gen_range(0, points.len());
                tree.nearest(&points[i])
            })
        });
    }
    group.finish();
}

fn brute_force_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("Brute force nearest random");
    for size in 8..13 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let points = random_points(&mut rng, size, 7800.0);

            b.iter(|| {
                let p = Point::new(rng.gen_range(0.0, 7800.0), rng.gen_range(0.0, 7800.0));
                let nearest = points
                    .iter()
                    .map(|q| q.dist_sq(&p))
                    .fold(f64::INFINITY, f64::min);
                black_box(nearest)
            })
        });
    }
    group.finish();
}

fn make_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("KdTree make_tree");
    for size in 8..17 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let points = random_points(&mut rng, size, 7800.0);

            b.iter(|| {
                let mut points = points.clone();
                KdTree::new(&mut points)
            });
        });
    }
    group.finish();
}

fn make_tree_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("KdTree make_tree sequential");
    let config = BuildConfig::default().with_parallel_cutoff(usize::MAX);
    for size in 8..17 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let points = random_points(&mut rng, size, 7800.0);

            b.iter(|| {
                let mut points = points.clone();
                KdTree::with_config(&mut points, config)
            });
        });
    }
    group.finish();
}

criterion_group!(
    kdtree_benches,
    nearest_rand,
    nearest_in_tree_rand,
    brute_force_rand,
    make_tree,
    make_tree_sequential,
);

criterion_main!(kdtree_benches);
