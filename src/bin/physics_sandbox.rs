use clap::Parser;
use log::{debug, info, warn};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use physics2d::scene;
use physics2d::world::{DebugDraw, Rgba};
use physics2d::{
    Aabb2, Capsule2, Disc2, EventBus, Obb2, PhysicsConfig, PhysicsSystem, Shape, SimulationMode, Vec2,
};

/// Headless physics sandbox
#[derive(Parser)]
#[command(version, about = "Steps a 2D physics scene without a window and reports what happened.")]
struct Cli {
    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 300)]
    steps: u32,

    /// Step length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// INI file with a [physics] section.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene to load instead of the built-in demo.
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Write the final scene here.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

/// Logs every collider outline at debug level.
struct LogDraw;

impl DebugDraw for LogDraw {
    fn draw_shape(&mut self, shape: &Shape, color: Rgba) {
        let bounds = shape.bounds();
        debug!(
            "{:?} ({}, {}, {}) bounds ({:.2}, {:.2})..({:.2}, {:.2})",
            shape.collider_type(),
            color.r,
            color.g,
            color.b,
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y
        );
    }
}

fn build_demo_scene(system: &mut PhysicsSystem) -> physics2d::Result<()> {
    let floor = system.create_rigidbody(SimulationMode::Static);
    let body = system.try_body_mut(floor)?;
    body.set_mass(f64::INFINITY)?;
    body.set_collider(Shape::Aabb(Aabb2::new(Vec2::new(-20.0, -1.0), Vec2::new(20.0, 0.0))))?;
    body.set_friction(0.6);

    let ramp = system.create_rigidbody(SimulationMode::Static);
    let body = system.try_body_mut(ramp)?;
    body.set_position(Vec2::new(-6.0, 2.0));
    body.set_rotation_degrees(-20.0);
    body.set_collider(Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(4.0, 0.2), 0.0)))?;

    let crate_body = system.create_rigidbody(SimulationMode::Dynamic);
    let body = system.try_body_mut(crate_body)?;
    body.set_position(Vec2::new(-7.0, 5.0));
    body.set_mass(2.0)?;
    body.set_collider(Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.5), 0.0)))?;
    if let Some(collider) = body.collider_mut() {
        collider.set_collision_event("crate_hit");
    }

    let pill = system.create_rigidbody(SimulationMode::Dynamic);
    let body = system.try_body_mut(pill)?;
    body.set_position(Vec2::new(0.0, 4.0));
    body.set_rotation_degrees(15.0);
    body.set_collider(Shape::Capsule(Capsule2::new(
        Vec2::new(-0.6, 0.0),
        Vec2::new(0.6, 0.0),
        0.3,
    )))?;

    let ball = system.create_rigidbody(SimulationMode::Dynamic);
    let body = system.try_body_mut(ball)?;
    body.set_position(Vec2::new(3.0, 6.0));
    body.set_restitution(0.8);
    body.set_collider(Shape::Disc(Disc2::new(Vec2::ZERO, 0.4)))?;
    if let Some(collider) = body.collider_mut() {
        collider.set_collision_event("ball_bounce");
    }

    let slider = system.create_rigidbody(SimulationMode::Dynamic);
    let body = system.try_body_mut(slider)?;
    body.set_position(Vec2::new(6.0, 0.5));
    body.velocity = Vec2::new(-3.0, 0.0);
    body.set_constraints(true, false, false);
    body.set_collider(Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(0.5, 0.5), 0.0)))?;

    let zone = system.create_trigger(SimulationMode::Static);
    let trigger = system.try_trigger_mut(zone)?;
    trigger.set_collider(Shape::Aabb(Aabb2::new(Vec2::new(1.0, 0.0), Vec2::new(5.0, 3.0))))?;
    trigger.set_on_enter_event("zone_enter");
    trigger.set_on_exit_event("zone_exit");

    Ok(())
}

fn counter(bus: &mut EventBus, name: &str) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    bus.subscribe(name, move |_| {
        c.set(c.get() + 1);
        true
    });
    count
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match PhysicsConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default physics config: {}", e);
                PhysicsConfig::default()
            }
        },
        None => PhysicsConfig::default(),
    };

    let mut system = PhysicsSystem::new(config);
    let setup = match &cli.load {
        Some(path) => scene::load_scene(&mut system, path).map(|_| ()),
        None => build_demo_scene(&mut system),
    };
    if let Err(e) = setup {
        eprintln!("Error building scene: {e}");
        std::process::exit(1);
    }

    let mut bus = EventBus::new();
    let crate_hits = counter(&mut bus, "crate_hit");
    let bounces = counter(&mut bus, "ball_bounce");
    let enters = counter(&mut bus, "zone_enter");
    let exits = counter(&mut bus, "zone_exit");

    info!(
        "Simulating {} steps of {:.4}s with {} static and {} dynamic bodies",
        cli.steps,
        cli.dt,
        system.body_count(SimulationMode::Static),
        system.body_count(SimulationMode::Dynamic)
    );

    for _ in 0..cli.steps {
        system.update(cli.dt, &mut bus);
        system.purge_deleted_objects();
    }

    for (handle, body) in system.bodies() {
        info!(
            "Body {}: {:?} at ({:.3}, {:.3}) rot {:.1} vel ({:.3}, {:.3})",
            handle.index(),
            body.simulation_mode(),
            body.position().x,
            body.position().y,
            body.rotation_degrees(),
            body.velocity.x,
            body.velocity.y
        );
    }
    info!(
        "Events: crate_hit={} ball_bounce={} zone_enter={} zone_exit={}",
        crate_hits.get(),
        bounces.get(),
        enters.get(),
        exits.get()
    );
    system.debug_render(&mut LogDraw);

    if let Some(path) = &cli.save {
        if let Err(e) = scene::save_scene(&system, path) {
            warn!("Failed to save scene to {}: {}", path.display(), e);
        }
    }
}
