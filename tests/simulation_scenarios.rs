use physics2d::scene::SceneDocument;
use physics2d::{
    collide, Aabb2, BodyHandle, Capsule2, Disc2, EventBus, EventSink, Obb2, PhysicsSystem, Shape, SimulationMode,
    Vec2,
};
use std::cell::Cell;
use std::rc::Rc;

const EPSILON: f64 = 1e-9;
const DT: f64 = 1.0 / 60.0;

fn zero_gravity() -> PhysicsSystem {
    let mut system = PhysicsSystem::default();
    system.set_gravity(Vec2::ZERO);
    system
}

fn add_body(system: &mut PhysicsSystem, mode: SimulationMode, position: Vec2, shape: Shape) -> BodyHandle {
    let handle = system.create_rigidbody(mode);
    let body = system.body_mut(handle).unwrap();
    body.set_position(position);
    body.set_collider(shape).unwrap();
    handle
}

fn add_floor(system: &mut PhysicsSystem) -> BodyHandle {
    let floor = add_body(
        system,
        SimulationMode::Static,
        Vec2::ZERO,
        Shape::Aabb(Aabb2::new(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0))),
    );
    system.body_mut(floor).unwrap().set_mass(f64::INFINITY).unwrap();
    floor
}

/// A 40 x 2 static box whose top face is at y = 0.
fn add_box_floor(system: &mut PhysicsSystem) -> BodyHandle {
    let floor = add_body(
        system,
        SimulationMode::Static,
        Vec2::new(0.0, -1.0),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(20.0, 1.0), 0.0)),
    );
    system.body_mut(floor).unwrap().set_mass(f64::INFINITY).unwrap();
    floor
}

fn assert_at_rest(system: &PhysicsSystem, handle: BodyHandle) {
    let body = system.body(handle).unwrap();
    assert!(body.velocity.magnitude() < 1e-3, "velocity = {:?}", body.velocity);
    assert!(body.angular_velocity.abs() < 1e-3, "angular velocity = {}", body.angular_velocity);
}

/// Distance in degrees from the nearest multiple of `period`.
fn tilt_from(rotation_degrees: f64, period: f64) -> f64 {
    let r = rotation_degrees.rem_euclid(period);
    r.min(period - r)
}

fn disc(radius: f64) -> Shape {
    Shape::Disc(Disc2::new(Vec2::ZERO, radius))
}

fn run(system: &mut PhysicsSystem, steps: usize, events: &mut dyn EventSink) {
    for _ in 0..steps {
        system.update(DT, events);
    }
}

fn penetration(system: &PhysicsSystem, a: BodyHandle, b: BodyHandle) -> f64 {
    let shape_a = system.body(a).unwrap().world_shape().unwrap();
    let shape_b = system.body(b).unwrap().world_shape().unwrap();
    collide(&shape_a, &shape_b).map_or(0.0, |m| m.depth)
}

#[test]
fn elastic_discs_swap_velocities() {
    let mut system = zero_gravity();
    let a = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(-1.5, 0.0), disc(1.0));
    let b = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(1.5, 0.0), disc(1.0));
    for (handle, vx) in [(a, 2.0), (b, -2.0)] {
        let body = system.body_mut(handle).unwrap();
        body.set_restitution(1.0);
        body.velocity = Vec2::new(vx, 0.0);
    }

    run(&mut system, 60, &mut Vec::new());

    let va = system.body(a).unwrap().velocity;
    let vb = system.body(b).unwrap().velocity;
    assert!((va.x - -2.0).abs() < EPSILON, "va = {:?}", va);
    assert!((vb.x - 2.0).abs() < EPSILON, "vb = {:?}", vb);
    assert!(va.y.abs() < EPSILON && vb.y.abs() < EPSILON);
}

#[test]
fn box_settles_on_static_floor() {
    let mut system = PhysicsSystem::default();
    let floor = add_floor(&mut system);
    let crate_body = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 2.0),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.5), 0.0)),
    );

    run(&mut system, 300, &mut Vec::new());

    let body = system.body(crate_body).unwrap();
    assert!(body.velocity.magnitude() < 1e-3, "velocity = {:?}", body.velocity);
    assert!((body.position().y - 0.5).abs() < 0.05, "y = {}", body.position().y);
    assert!(body.rotation_degrees().abs() < 1e-6);
    assert!(penetration(&system, floor, crate_body) < 0.05);
}

#[test]
fn tilted_box_tips_onto_a_face_and_settles() {
    let mut system = PhysicsSystem::default();
    add_box_floor(&mut system);
    let tilted = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 2.0),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.5), 0.0)),
    );
    system.body_mut(tilted).unwrap().set_rotation_degrees(30.0);

    run(&mut system, 600, &mut Vec::new());

    assert_at_rest(&system, tilted);
    let body = system.body(tilted).unwrap();
    assert!(tilt_from(body.rotation_degrees(), 90.0) < 2.0, "rotation = {}", body.rotation_degrees());
    assert!((body.position().y - 0.5).abs() < 0.05, "y = {}", body.position().y);
}

#[test]
fn tilted_plank_settles_flat() {
    let mut system = PhysicsSystem::default();
    add_box_floor(&mut system);
    let plank = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 1.0),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 0.2), 0.0)),
    );
    system.body_mut(plank).unwrap().set_rotation_degrees(10.0);

    run(&mut system, 600, &mut Vec::new());

    assert_at_rest(&system, plank);
    let body = system.body(plank).unwrap();
    assert!(tilt_from(body.rotation_degrees(), 180.0) < 2.0, "rotation = {}", body.rotation_degrees());
    assert!((body.position().y - 0.2).abs() < 0.05, "y = {}", body.position().y);
}

#[test]
fn tilted_capsule_settles_flat() {
    let mut system = PhysicsSystem::default();
    add_box_floor(&mut system);
    let capsule = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 1.5),
        Shape::Capsule(Capsule2::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), 0.3)),
    );
    system.body_mut(capsule).unwrap().set_rotation_degrees(20.0);

    run(&mut system, 600, &mut Vec::new());

    assert_at_rest(&system, capsule);
    let body = system.body(capsule).unwrap();
    assert!(tilt_from(body.rotation_degrees(), 180.0) < 2.0, "rotation = {}", body.rotation_degrees());
    assert!((body.position().y - 0.3).abs() < 0.05, "y = {}", body.position().y);
}

/// Floor plus a static step whose right edge is at x = 0 and top at y = 1.
fn ledge_system() -> PhysicsSystem {
    let mut system = PhysicsSystem::default();
    add_floor(&mut system);
    let ledge = add_body(
        &mut system,
        SimulationMode::Static,
        Vec2::ZERO,
        Shape::Aabb(Aabb2::new(Vec2::new(-5.0, 0.0), Vec2::new(0.0, 1.0))),
    );
    system.body_mut(ledge).unwrap().set_mass(f64::INFINITY).unwrap();
    system
}

fn unit_block() -> Shape {
    Shape::Aabb(Aabb2::new(Vec2::new(-0.5, -0.5), Vec2::new(0.5, 0.5)))
}

fn run_without_turning(system: &mut PhysicsSystem, block: BodyHandle, steps: usize) {
    for _ in 0..steps {
        system.update(DT, &mut Vec::new());
        let body = system.body(block).unwrap();
        assert_eq!(body.angular_velocity, 0.0);
        assert_eq!(body.rotation_degrees(), 0.0);
    }
}

#[test]
fn aabb_block_never_spins_on_a_ledge_edge() {
    let mut system = ledge_system();
    // Only a fifth of the block lands on the ledge
    let block = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.3, 2.0), unit_block());

    run_without_turning(&mut system, block, 600);

    assert_at_rest(&system, block);
    let body = system.body(block).unwrap();
    assert!((body.position().x - 0.3).abs() < 1e-6, "x = {}", body.position().x);
    assert!((body.position().y - 1.5).abs() < 0.05, "y = {}", body.position().y);
}

#[test]
fn aabb_block_slides_off_a_ledge_without_spinning() {
    let mut system = ledge_system();
    let block = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(-2.0, 1.5), unit_block());
    system.body_mut(block).unwrap().velocity = Vec2::new(7.0, 0.0);

    run_without_turning(&mut system, block, 600);

    // Came to rest on the floor below, clear of the ledge
    assert_at_rest(&system, block);
    let body = system.body(block).unwrap();
    assert!(body.position().x > 0.5, "x = {}", body.position().x);
    assert!((body.position().y - 0.5).abs() < 0.05, "y = {}", body.position().y);
}

#[test]
fn trigger_fires_one_enter_and_one_exit() {
    let mut system = zero_gravity();
    let zone = system.create_trigger(SimulationMode::Static);
    {
        let trigger = system.trigger_mut(zone).unwrap();
        trigger
            .set_collider(Shape::Aabb(Aabb2::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))))
            .unwrap();
        trigger.set_on_enter_event("enter");
        trigger.set_on_exit_event("exit");
    }
    let runner = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(-3.0, 0.0), disc(0.25));
    system.body_mut(runner).unwrap().velocity = Vec2::new(5.0, 0.0);

    let mut events: Vec<String> = Vec::new();
    run(&mut system, 120, &mut events);

    assert_eq!(events, vec!["enter", "exit"]);
    assert!(!system.trigger(zone).unwrap().is_overlapping(runner));
}

#[test]
fn locked_axis_never_moves() {
    let mut system = PhysicsSystem::default();
    let slider = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::ZERO,
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(2.0, 0.25), 0.0)),
    );
    {
        let body = system.body_mut(slider).unwrap();
        body.set_constraints(true, false, false);
        body.velocity = Vec2::new(0.5, 0.0);
    }
    let ball = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.3, 2.0), disc(0.3));

    run(&mut system, 120, &mut Vec::new());

    let body = system.body(slider).unwrap();
    assert_eq!(body.position().y, 0.0);
    assert_eq!(body.velocity.y, 0.0);
    assert!(body.position().x > 0.0);
    // The ball came down and now rests on the slider
    assert!(system.body(ball).unwrap().position().y < 1.0);
}

#[test]
fn immovable_body_is_unchanged() {
    let mut system = zero_gravity();
    let wall = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::ZERO,
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 3.0), 10.0)),
    );
    system.body_mut(wall).unwrap().set_mass(f64::INFINITY).unwrap();
    let before = system.body(wall).unwrap().clone();

    for (i, y) in [-1.5, 0.0, 1.5].into_iter().enumerate() {
        let h = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(-2.0 - i as f64, y), disc(0.4));
        system.body_mut(h).unwrap().velocity = Vec2::new(6.0, 0.0);
    }

    let mut hits = 0;
    for _ in 0..120 {
        system.update(DT, &mut Vec::new());
        hits += system.contacts().len();
    }

    assert!(hits > 0);
    let after = system.body(wall).unwrap();
    assert_eq!(after.transform, before.transform);
    assert_eq!(after.velocity, before.velocity);
    assert_eq!(after.angular_velocity, before.angular_velocity);
}

#[test]
fn separated_bodies_receive_no_impulse() {
    let mut system = zero_gravity();
    let a = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.0, 0.0), disc(0.5));
    let b = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 2.0),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.5), 45.0)),
    );
    for h in [a, b] {
        system.body_mut(h).unwrap().velocity = Vec2::new(1.0, 0.0);
    }

    run(&mut system, 60, &mut Vec::new());

    assert!(system.contacts().is_empty());
    for h in [a, b] {
        let body = system.body(h).unwrap();
        assert_eq!(body.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(body.angular_velocity, 0.0);
    }
}

#[test]
fn resolution_never_worsens_penetration() {
    let mut system = zero_gravity();
    let a = add_body(
        &mut system,
        SimulationMode::Dynamic,
        Vec2::ZERO,
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 0.5), 0.0)),
    );
    let b = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.8, 0.6), disc(0.5));

    let mut depth = penetration(&system, a, b);
    assert!(depth > 0.1);
    for _ in 0..60 {
        system.update(DT, &mut Vec::new());
        let next = penetration(&system, a, b);
        assert!(next <= depth + EPSILON, "penetration grew from {} to {}", depth, next);
        depth = next;
    }
    assert!(depth < 0.05);
}

#[test]
fn scene_round_trip_continues_identically() {
    let mut original = PhysicsSystem::default();
    add_floor(&mut original);
    let tilted = add_body(
        &mut original,
        SimulationMode::Dynamic,
        Vec2::new(0.0, 1.5),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.3), 0.0)),
    );
    original.body_mut(tilted).unwrap().set_rotation_degrees(25.0);
    add_body(&mut original, SimulationMode::Dynamic, Vec2::new(1.5, 3.0), disc(0.4));
    let ramp = add_body(
        &mut original,
        SimulationMode::Static,
        Vec2::new(-3.0, 0.5),
        Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.5, 0.2), 0.0)),
    );
    original.body_mut(ramp).unwrap().set_rotation_degrees(15.0);
    let spinner = add_body(
        &mut original,
        SimulationMode::Dynamic,
        Vec2::new(-3.0, 2.0),
        Shape::Capsule(Capsule2::new(Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0), 0.2)),
    );
    {
        let body = original.body_mut(spinner).unwrap();
        body.set_rotation_degrees(40.0);
        body.angular_velocity = 3.0;
        body.set_angular_drag(0.6).unwrap();
    }
    let locked = add_body(
        &mut original,
        SimulationMode::Dynamic,
        Vec2::new(4.0, 1.0),
        Shape::Capsule(Capsule2::new(Vec2::new(0.0, -0.4), Vec2::new(0.0, 0.4), 0.25)),
    );
    {
        let body = original.body_mut(locked).unwrap();
        body.set_constraints(true, true, false);
        body.set_angular_drag(0.2).unwrap();
        body.velocity = Vec2::new(-1.0, 0.0);
    }
    run(&mut original, 30, &mut Vec::new());
    assert_ne!(original.body(spinner).unwrap().angular_velocity, 0.0);

    let json = SceneDocument::capture(&original).to_json().unwrap();
    let mut restored = PhysicsSystem::default();
    SceneDocument::from_json(&json).unwrap().spawn_into(&mut restored).unwrap();

    run(&mut original, 30, &mut Vec::new());
    run(&mut restored, 30, &mut Vec::new());
    assert_eq!(SceneDocument::capture(&restored), SceneDocument::capture(&original));
}

#[test]
fn collision_events_reach_bus_subscribers() {
    let mut system = PhysicsSystem::default();
    add_floor(&mut system);
    let ball = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.0, 1.0), disc(0.5));
    system
        .body_mut(ball)
        .unwrap()
        .collider_mut()
        .unwrap()
        .set_collision_event("ball_hit");

    let hits = Rc::new(Cell::new(0));
    let mut bus = EventBus::new();
    let counter = Rc::clone(&hits);
    bus.subscribe("ball_hit", move |_| {
        counter.set(counter.get() + 1);
        true
    });

    run(&mut system, 60, &mut bus);
    // Resting contact keeps firing once per step
    assert!(hits.get() > 10);
}

#[test]
fn destroyed_body_leaves_simulation_and_handle_goes_stale() {
    let mut system = PhysicsSystem::default();
    add_floor(&mut system);
    let ball = add_body(&mut system, SimulationMode::Dynamic, Vec2::new(0.0, 0.45), disc(0.5));
    run(&mut system, 5, &mut Vec::new());
    assert!(!system.contacts().is_empty());

    assert!(system.destroy_rigidbody(ball));
    run(&mut system, 1, &mut Vec::new());
    assert!(system.contacts().is_empty());

    system.purge_deleted_objects();
    assert!(system.body(ball).is_none());
    assert!(system.body_mut(ball).is_none());
    assert!(system.begin_possession(ball).is_none());
}
