//! Benchmarks for the geo-cvrp solver.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_cvrp::config::Config;
use geo_cvrp::construction::CheapestInsertion;
use geo_cvrp::context::SolveContext;
use geo_cvrp::distance::DistanceMatrix;
use geo_cvrp::local_search::LocalSearch;
use geo_cvrp::problem::{Fleet, Location, RoutingProblem};
use std::time::Duration;

/// Customers on a grid with roughly 1 km spacing around a depot in Madrid.
fn create_benchmark_locations(size: usize) -> Vec<Location> {
    let (lat0, lng0) = (40.4168, -3.7038);
    let grid_size = (size as f64).sqrt().ceil() as usize;

    let mut locations = vec![Location::new("depot", lat0, lng0)];
    for i in 1..=size {
        let row = (i - 1) / grid_size;
        let col = (i - 1) % grid_size;
        let lat = lat0 + (row as f64 - grid_size as f64 / 2.0) * 0.009;
        let lng = lng0 + (col as f64 - grid_size as f64 / 2.0) * 0.012;
        locations.push(Location::new(format!("c{}", i), lat, lng));
    }
    locations
}

/// Create a benchmark problem of specified size, demand 1 per customer.
fn create_benchmark_problem(size: usize) -> RoutingProblem {
    let vehicles = (size / 10).max(1);
    let mut demands = vec![1; size + 1];
    demands[0] = 0;

    RoutingProblem::formulate(
        &create_benchmark_locations(size),
        Fleet::with_capacities(vec![12; vehicles]).unwrap(),
        Some(demands),
        Duration::from_secs(60),
    )
    .unwrap()
}

#[cfg(feature = "bench")]
fn benchmark_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");

    for size in [100, 500, 1000].iter() {
        let locations = create_benchmark_locations(*size);
        group.bench_with_input(BenchmarkId::new("serial", size), &locations, |b, locations| {
            b.iter(|| DistanceMatrix::build(locations, usize::MAX).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &locations, |b, locations| {
            b.iter(|| DistanceMatrix::build(locations, 0).unwrap());
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);

            b.iter(|| {
                let ctx = SolveContext::new(Duration::from_secs(60));
                CheapestInsertion::construct(&problem, &ctx)
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let config = Config::new().with_seed(1);
            let initial = CheapestInsertion::construct(&problem, &SolveContext::new(Duration::from_secs(60)))
                .assignment;

            // A single neighborhood scan from the construction
            b.iter(|| {
                let mut local_search = LocalSearch::new(&problem, &config);
                local_search.index(&initial);
                local_search.scan(&initial, &problem)
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_convergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("convergence");
    group.measurement_time(Duration::from_secs(30));
    group.sample_size(10);

    for size in [50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let config = Config::new()
                .with_seed(1)
                .with_max_iterations_without_improvement(100);

            b.iter(|| {
                let mut ctx = SolveContext::new(Duration::from_secs(10));
                geo_cvrp::solve_with(&problem, &config, &mut ctx)
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_distance_matrix,
    benchmark_construction,
    benchmark_local_search,
    benchmark_convergence
);

#[cfg(feature = "bench")]
criterion_main!(benches);
