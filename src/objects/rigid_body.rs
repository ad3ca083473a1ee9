use log::warn;
use serde::{Deserialize, Serialize};

use super::collider::{Collider2D, ColliderOwner};
use crate::common::Material;
use crate::constraints::Constraints;
use crate::error::{PhysicsError, Result};
use crate::math::{Transform2, Vec2};
use crate::shapes::{ColliderType, Shape};
use crate::world::BodyHandle;

/// Whether a body is driven by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Never integrates; behaves as infinite mass in every contact.
    Static,
    Dynamic,
}

/// Identifier of the external object a body belongs to. Used for lookup only;
/// the physics core never owns or dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody2D {
    handle: Option<BodyHandle>,
    mode: SimulationMode,

    // Primary state
    pub transform: Transform2,
    pub velocity: Vec2,
    pub angular_velocity: f64, // Radians per second

    // Physical properties
    mass: f64, // May be infinite
    moment_of_inertia: f64,
    pub material: Material,
    linear_drag: f64,
    angular_drag: f64,
    pub constraints: Constraints,

    alive: bool,
    collider: Option<Collider2D>,
    owner: Option<OwnerId>,
}

impl Rigidbody2D {
    /// A unit-mass body at the origin with no collider.
    pub fn new(mode: SimulationMode) -> Self {
        Self {
            handle: None,
            mode,
            transform: Transform2::identity(),
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: 1.0,
            moment_of_inertia: f64::INFINITY,
            material: Material::default(),
            linear_drag: 0.0,
            angular_drag: 0.0,
            constraints: Constraints::FREE,
            alive: true,
            collider: None,
            owner: None,
        }
    }

    /// The bucket handle, once the body has been added to a physics system.
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    pub(crate) fn bind_handle(&mut self, handle: BodyHandle) {
        self.handle = Some(handle);
        if let Some(collider) = self.collider.as_mut() {
            collider.set_owner(Some(ColliderOwner::Body(handle)));
        }
    }

    pub fn simulation_mode(&self) -> SimulationMode {
        self.mode
    }

    /// Switching to Static stops the body dead; switching to Dynamic lets it
    /// integrate again from rest.
    pub fn set_simulation_mode(&mut self, mode: SimulationMode) {
        if mode == SimulationMode::Static {
            self.velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }
        self.mode = mode;
    }

    pub fn is_static(&self) -> bool {
        self.mode == SimulationMode::Static
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.transform.rotation_degrees
    }

    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        self.transform.rotation_degrees = degrees;
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Sets the mass and re-derives the moment of inertia from the collider.
    /// `f64::INFINITY` makes the body immovable.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidProperty(format!("mass must be positive, got {}", mass)));
        }
        self.mass = mass;
        self.set_moment_for_object();
        Ok(())
    }

    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    /// Overrides the derived moment of inertia (used when restoring saved scenes).
    pub fn set_moment_of_inertia(&mut self, moment: f64) -> Result<()> {
        if moment.is_nan() || moment <= 0.0 {
            return Err(PhysicsError::InvalidProperty(format!(
                "moment of inertia must be positive, got {}",
                moment
            )));
        }
        self.moment_of_inertia = moment;
        Ok(())
    }

    /// Derives the moment of inertia from the collider shape and current mass.
    /// Without a collider the body keeps its previous value.
    pub fn set_moment_for_object(&mut self) {
        if let Some(collider) = &self.collider {
            self.moment_of_inertia = collider.moment_of_inertia(self.mass);
        }
    }

    pub fn friction(&self) -> f64 {
        self.material.friction
    }

    pub fn set_friction(&mut self, friction: f64) {
        self.material = Material::new(self.material.restitution, friction);
    }

    pub fn restitution(&self) -> f64 {
        self.material.restitution
    }

    pub fn set_restitution(&mut self, restitution: f64) {
        self.material = Material::new(restitution, self.material.friction);
    }

    pub fn linear_drag(&self) -> f64 {
        self.linear_drag
    }

    pub fn set_linear_drag(&mut self, drag: f64) -> Result<()> {
        self.linear_drag = checked_drag(drag)?;
        Ok(())
    }

    pub fn angular_drag(&self) -> f64 {
        self.angular_drag
    }

    pub fn set_angular_drag(&mut self, drag: f64) -> Result<()> {
        self.angular_drag = checked_drag(drag)?;
        Ok(())
    }

    pub fn set_constraints(&mut self, x: bool, y: bool, rotation: bool) {
        self.constraints = Constraints::new(x, y, rotation);
    }

    pub fn collider(&self) -> Option<&Collider2D> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut Collider2D> {
        self.collider.as_mut()
    }

    /// Attaches a collider built from `shape` (in body-local space), replacing
    /// any previous one, and derives the moment of inertia from it.
    pub fn set_collider(&mut self, shape: Shape) -> Result<&Collider2D> {
        let mut collider = Collider2D::new(shape)?;
        collider.set_owner(self.handle.map(ColliderOwner::Body));
        let collider = self.collider.insert(collider);
        if self.mass.is_finite() {
            self.moment_of_inertia = collider.moment_of_inertia(self.mass);
        } else {
            self.moment_of_inertia = f64::INFINITY;
        }
        Ok(collider)
    }

    pub fn remove_collider(&mut self) -> Option<Collider2D> {
        self.collider.take()
    }

    /// The collider's shape placed at the body's transform.
    pub fn world_shape(&self) -> Option<Shape> {
        self.collider.as_ref().map(|c| c.world_shape(&self.transform))
    }

    pub fn owner(&self) -> Option<OwnerId> {
        self.owner
    }

    pub fn set_owner(&mut self, owner: Option<OwnerId>) {
        self.owner = owner;
    }

    /// Effective inverse mass: zero for Static bodies and infinite mass.
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static() || !self.mass.is_finite() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Inverse mass per world axis; locked axes behave as infinitely heavy.
    pub fn inverse_mass_axes(&self) -> Vec2 {
        self.constraints.linear_mask() * self.inverse_mass()
    }

    /// Zero for Static bodies, infinite mass, locked rotation and AABB
    /// colliders, which cannot turn.
    pub fn inverse_inertia(&self) -> f64 {
        let axis_aligned = self
            .collider
            .as_ref()
            .is_some_and(|c| c.collider_type() == ColliderType::Aabb);
        if self.is_static()
            || !self.mass.is_finite()
            || !self.constraints.rotation
            || axis_aligned
            || !self.moment_of_inertia.is_finite()
            || self.moment_of_inertia <= 0.0
        {
            0.0
        } else {
            1.0 / self.moment_of_inertia
        }
    }

    /// True when no impulse can change this body's motion.
    pub fn is_immovable(&self) -> bool {
        self.inverse_mass_axes() == Vec2::ZERO && self.inverse_inertia() == 0.0
    }

    /// Velocity of the material point at `point` (world space).
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        let r = point - self.transform.position;
        self.velocity + r.cross_scalar(self.angular_velocity)
    }

    /// Applies an impulse at world-space offset `r` from the body origin.
    pub fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.velocity += impulse.scale_by(self.inverse_mass_axes());
        self.angular_velocity += r.cross(impulse) * self.inverse_inertia();
    }
}

fn checked_drag(drag: f64) -> Result<f64> {
    if !drag.is_finite() {
        return Err(PhysicsError::InvalidProperty(format!("drag must be finite, got {}", drag)));
    }
    if drag < 0.0 {
        warn!("Negative drag {} clamped to 0", drag);
        return Ok(0.0);
    }
    Ok(drag)
}
