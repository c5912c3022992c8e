//! Performance benchmarks for the power model
//!
//! The solver evaluates the full steady-state model once per bisection
//! step, so it dominates the cost of every power-to-time calculation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use velocalc::{solve_velocity, PhysicalConstants, Position, Ride, Wind};

fn create_benchmark_ride(gradient: f64) -> Ride {
    Ride {
        cda: Position::Hoods.cda(),
        gradient,
        total_mass: 78.0,
        wind: Wind {
            speed: 3.5,
            direction: 225.0,
        },
        heading: 180.0,
        ..Default::default()
    }
}

fn bench_power_evaluation(c: &mut Criterion) {
    let constants = PhysicalConstants::default();
    let ride = create_benchmark_ride(0.04);

    c.bench_function("power_at", |b| {
        b.iter(|| ride.power_at(black_box(9.5), &constants));
    });
}

fn bench_velocity_solver(c: &mut Criterion) {
    let constants = PhysicalConstants::default();
    let mut group = c.benchmark_group("Velocity Solver");

    for &gradient in &[0.0, 0.04, 0.10] {
        let ride = create_benchmark_ride(gradient);
        group.bench_with_input(
            BenchmarkId::new("solve_velocity", gradient),
            &ride,
            |b, ride| {
                b.iter(|| solve_velocity(black_box(300.0), ride, &constants));
            },
        );
    }

    group.finish();
}

fn bench_power_sweep(c: &mut Criterion) {
    let constants = PhysicalConstants::default();
    let ride = create_benchmark_ride(0.02);
    let mut group = c.benchmark_group("Power Sweep");

    for &steps in &[10u64, 100, 1000] {
        group.throughput(Throughput::Elements(steps));
        group.bench_with_input(BenchmarkId::new("solve_range", steps), &steps, |b, &steps| {
            b.iter(|| {
                for i in 0..steps {
                    let power = 50.0 + 950.0 * i as f64 / steps as f64;
                    let _ = solve_velocity(power, &ride, &constants);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_power_evaluation,
    bench_velocity_solver,
    bench_power_sweep
);
criterion_main!(benches);
