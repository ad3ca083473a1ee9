//! JSON scene files.
//!
//! A scene stores every live body of a [`PhysicsSystem`] so it can be rebuilt
//! later. Triggers, contacts and event subscriptions are not saved.
//! Infinite mass and moment of inertia are written as `null`.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::Material;
use crate::constraints::Constraints;
use crate::error::{PhysicsError, Result};
use crate::math::{Transform2, Vec2};
use crate::objects::{OwnerId, Rigidbody2D, SimulationMode};
use crate::shapes::{Aabb2, Capsule2, Disc2, Obb2, Shape};
use crate::world::{BodyHandle, PhysicsSystem};

pub const SCENE_VERSION: u32 = 1;

/// Collider geometry as written to disk, in body-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeRecord {
    Aabb { min: Vec2, max: Vec2 },
    Box { center: Vec2, size: Vec2, rotation: f64 },
    Disc { center: Vec2, radius: f64 },
    Capsule { start: Vec2, end: Vec2, radius: f64 },
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        match shape {
            Shape::Aabb(aabb) => ShapeRecord::Aabb {
                min: aabb.min,
                max: aabb.max,
            },
            Shape::Box(obb) => ShapeRecord::Box {
                center: obb.center,
                size: obb.half_extents * 2.0,
                rotation: obb.rotation_degrees,
            },
            Shape::Disc(disc) => ShapeRecord::Disc {
                center: disc.center,
                radius: disc.radius,
            },
            Shape::Capsule(capsule) => ShapeRecord::Capsule {
                start: capsule.start,
                end: capsule.end,
                radius: capsule.radius,
            },
        }
    }
}

impl ShapeRecord {
    pub fn to_shape(&self) -> Shape {
        match *self {
            ShapeRecord::Aabb { min, max } => Shape::Aabb(Aabb2::new(min, max)),
            ShapeRecord::Box { center, size, rotation } => Shape::Box(Obb2::new(center, size * 0.5, rotation)),
            ShapeRecord::Disc { center, radius } => Shape::Disc(Disc2::new(center, radius)),
            ShapeRecord::Capsule { start, end, radius } => Shape::Capsule(Capsule2::new(start, end, radius)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub mode: SimulationMode,
    pub transform: Transform2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default)]
    pub angular_velocity: f64,
    /// `None` is infinite mass.
    pub mass: Option<f64>,
    /// `None` is an infinite moment (no rotation response).
    pub moment_of_inertia: Option<f64>,
    pub friction: f64,
    pub restitution: f64,
    #[serde(default)]
    pub linear_drag: f64,
    #[serde(default)]
    pub angular_drag: f64,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub shape: Option<ShapeRecord>,
    #[serde(default)]
    pub collision_event: Option<String>,
    #[serde(default)]
    pub owner: Option<u64>,
}

impl BodyRecord {
    pub fn capture(body: &Rigidbody2D) -> Self {
        Self {
            mode: body.simulation_mode(),
            transform: body.transform,
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
            mass: finite(body.mass()),
            moment_of_inertia: finite(body.moment_of_inertia()),
            friction: body.friction(),
            restitution: body.restitution(),
            linear_drag: body.linear_drag(),
            angular_drag: body.angular_drag(),
            constraints: body.constraints,
            shape: body.collider().map(|c| ShapeRecord::from(c.shape())),
            collision_event: body
                .collider()
                .and_then(|c| c.collision_event())
                .map(str::to_string),
            owner: body.owner().map(|o| o.0),
        }
    }

    /// Rebuilds the body. Mass goes in before the collider so the derived
    /// moment is right, then any saved moment overrides it.
    pub fn to_body(&self) -> Result<Rigidbody2D> {
        let mut body = Rigidbody2D::new(self.mode);
        body.transform = self.transform;
        body.set_mass(self.mass.unwrap_or(f64::INFINITY))?;
        body.material = Material::new(self.restitution, self.friction);
        body.set_linear_drag(self.linear_drag)?;
        body.set_angular_drag(self.angular_drag)?;
        body.constraints = self.constraints;

        if let Some(shape) = &self.shape {
            body.set_collider(shape.to_shape())?;
            if let (Some(name), Some(collider)) = (&self.collision_event, body.collider_mut()) {
                collider.set_collision_event(name.as_str());
            }
        } else if self.collision_event.is_some() {
            warn!("Body record has a collision event but no shape; event dropped");
        }
        body.set_moment_of_inertia(self.moment_of_inertia.unwrap_or(f64::INFINITY))?;

        if self.mode == SimulationMode::Dynamic {
            body.velocity = self.velocity;
            body.angular_velocity = self.angular_velocity;
        }
        body.set_owner(self.owner.map(OwnerId));
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    pub bodies: Vec<BodyRecord>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            bodies: Vec::new(),
        }
    }
}

impl SceneDocument {
    /// Snapshot of every live body, in creation order.
    pub fn capture(system: &PhysicsSystem) -> Self {
        Self {
            version: SCENE_VERSION,
            bodies: system.bodies().map(|(_, body)| BodyRecord::capture(body)).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: SceneDocument = serde_json::from_str(json)?;
        if document.version > SCENE_VERSION {
            return Err(PhysicsError::MalformedScene(format!(
                "scene version {} is newer than supported version {}",
                document.version, SCENE_VERSION
            )));
        }
        Ok(document)
    }

    /// Adds every body to `system`. Either all bodies are added or none are.
    pub fn spawn_into(&self, system: &mut PhysicsSystem) -> Result<Vec<BodyHandle>> {
        let bodies = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, record)| {
                record
                    .to_body()
                    .map_err(|e| PhysicsError::MalformedScene(format!("body {}: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(bodies.into_iter().map(|body| system.add_rigidbody(body)).collect())
    }
}

pub fn save_scene(system: &PhysicsSystem, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let document = SceneDocument::capture(system);
    std::fs::write(path, document.to_json()?)?;
    info!("Saved {} bodies to {}", document.bodies.len(), path.display());
    Ok(())
}

/// Loads a scene file and adds its bodies to `system`.
pub fn load_scene(system: &mut PhysicsSystem, path: impl AsRef<Path>) -> Result<Vec<BodyHandle>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let handles = SceneDocument::from_json(&json)?.spawn_into(system)?;
    info!("Loaded {} bodies from {}", handles.len(), path.display());
    Ok(handles)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
