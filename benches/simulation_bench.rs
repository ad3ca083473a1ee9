use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use physics2d::{
    collide, Aabb2, Capsule2, Disc2, Obb2, PhysicsSystem, Shape, SimulationMode, Vec2,
};

fn add_floor(system: &mut PhysicsSystem) {
    let floor = system.create_rigidbody(SimulationMode::Static);
    if let Some(body) = system.body_mut(floor) {
        let _ = body.set_collider(Shape::Aabb(Aabb2::new(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0))));
    }
}

// --- Helper for creating stack benchmarks ---
fn run_disc_stack_bench(system: &mut PhysicsSystem, num_discs: usize) {
    let radius = 0.5;
    for i in 0..num_discs {
        let y_pos = radius + (i as f64 * (radius * 2.1)); // Stack with slight gap
        let handle = system.create_rigidbody(SimulationMode::Dynamic);
        if let Some(body) = system.body_mut(handle) {
            body.set_position(Vec2::new(0.0, y_pos));
            let _ = body.set_collider(Shape::Disc(Disc2::new(Vec2::ZERO, radius)));
        }
    }

    let mut events: Vec<String> = Vec::new();
    let dt = 1.0 / 60.0;
    for _ in 0..30 {
        system.update(black_box(dt), &mut events);
    }
}

// Mixed boxes and capsules scattered over the floor
fn run_mixed_pile_bench(system: &mut PhysicsSystem, num_bodies: usize) {
    for i in 0..num_bodies {
        let x = (i % 20) as f64 * 1.1 - 11.0;
        let y = 1.0 + (i / 20) as f64 * 1.2;
        let shape = if i % 2 == 0 {
            Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.3), (i * 17 % 90) as f64))
        } else {
            Shape::Capsule(Capsule2::new(Vec2::new(-0.3, 0.0), Vec2::new(0.3, 0.0), 0.2))
        };
        let handle = system.create_rigidbody(SimulationMode::Dynamic);
        if let Some(body) = system.body_mut(handle) {
            body.set_position(Vec2::new(x, y));
            let _ = body.set_collider(shape);
        }
    }

    let mut events: Vec<String> = Vec::new();
    let dt = 1.0 / 60.0;
    for _ in 0..30 {
        system.update(black_box(dt), &mut events);
    }
}

// Benchmark for a stack of discs falling onto a floor
fn bench_disc_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("disc_stack");

    for num_discs in [10, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_discs), num_discs, |b, &n| {
            b.iter(|| {
                let mut system = PhysicsSystem::default();
                system.config_mut().velocity_iterations = 4; // Fewer iterations for benchmark speed
                add_floor(&mut system);
                run_disc_stack_bench(&mut system, black_box(n));
            });
        });
    }
    group.finish();
}

fn bench_mixed_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_pile");

    for num_bodies in [20, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_bodies), num_bodies, |b, &n| {
            b.iter(|| {
                let mut system = PhysicsSystem::default();
                add_floor(&mut system);
                run_mixed_pile_bench(&mut system, black_box(n));
            });
        });
    }
    group.finish();
}

// Raw narrow-phase cost for each kernel
fn bench_narrow_phase(c: &mut Criterion) {
    let obb_a = Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 0.5), 20.0));
    let obb_b = Shape::Box(Obb2::new(Vec2::new(1.2, 0.4), Vec2::new(0.7, 0.7), -35.0));
    let capsule = Shape::Capsule(Capsule2::new(Vec2::new(0.5, -1.0), Vec2::new(1.5, 1.0), 0.3));
    let disc = Shape::Disc(Disc2::new(Vec2::new(0.9, 0.9), 0.6));

    let mut group = c.benchmark_group("narrow_phase");
    group.bench_function("box_box", |b| b.iter(|| collide(black_box(&obb_a), black_box(&obb_b))));
    group.bench_function("box_capsule", |b| b.iter(|| collide(black_box(&obb_a), black_box(&capsule))));
    group.bench_function("capsule_disc", |b| b.iter(|| collide(black_box(&capsule), black_box(&disc))));
    group.finish();
}

criterion_group!(benches, bench_disc_stack, bench_mixed_pile, bench_narrow_phase);
criterion_main!(benches);
