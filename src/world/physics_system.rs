use log::{debug, warn};

use super::arena::Arena;
use super::bucket::RigidBodyBucket;
use super::debug_draw::{body_color, DebugDraw, TRIGGER_COLOR};
use super::{BodyHandle, TriggerHandle};
use crate::collision::manifold::MAX_MANIFOLD_POINTS;
use crate::collision::{self, Manifold};
use crate::common::Material;
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::EventSink;
use crate::integration::integrator;
use crate::math::vec2::Vec2;
use crate::objects::{OwnerId, Rigidbody2D, SimulationMode, Trigger2D};
use crate::shapes::Shape;

/// Effective masses below this are treated as immovable along the direction.
const MIN_EFFECTIVE_MASS: f64 = 1e-12;

/// A narrow-phase hit between two bodies found during the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Normal points from `body_a` to `body_b`.
    pub manifold: Manifold,
}

/// Impulse totals for one manifold point during a single step.
#[derive(Debug, Clone, Copy, Default)]
struct PointImpulse {
    position: Vec2,
    /// Separating speed the normal impulse aims for.
    bounce_velocity: f64,
    normal_impulse: f64,
    tangent_impulse: f64,
}

/// A contact prepared for the velocity iterations of one step.
#[derive(Debug, Clone, Copy)]
struct ContactConstraint {
    body_a: BodyHandle,
    body_b: BodyHandle,
    normal: Vec2,
    friction: f64,
    points: [PointImpulse; MAX_MANIFOLD_POINTS],
    point_count: usize,
}

/// State saved while a body is held by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Possession {
    pub handle: BodyHandle,
    pub previous_mode: SimulationMode,
    pub velocity: Vec2,
    pub angular_velocity: f64,
    pub material: Material,
}

/// Owns every rigid body and trigger and advances them one frame at a time.
pub struct PhysicsSystem {
    config: PhysicsConfig,
    bodies: RigidBodyBucket,
    triggers: Arena<Trigger2D>,
    trigger_order: Vec<TriggerHandle>,
    contacts: Vec<Contact>,
}

impl PhysicsSystem {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            bodies: RigidBodyBucket::new(),
            triggers: Arena::new(),
            trigger_order: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    // --- Bodies --- //

    /// Creates a body at the origin with no collider and adds it to the bucket.
    pub fn create_rigidbody(&mut self, mode: SimulationMode) -> BodyHandle {
        self.add_rigidbody(Rigidbody2D::new(mode))
    }

    /// Adds an already configured body.
    pub fn add_rigidbody(&mut self, body: Rigidbody2D) -> BodyHandle {
        self.bodies.insert(body)
    }

    /// The body behind `handle`, if it is still alive.
    pub fn body(&self, handle: BodyHandle) -> Option<&Rigidbody2D> {
        self.bodies.get(handle).filter(|b| b.is_alive())
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Rigidbody2D> {
        self.bodies.get_mut(handle).filter(|b| b.is_alive())
    }

    /// Like [`PhysicsSystem::body`], but a stale or dead handle is an error.
    pub fn try_body(&self, handle: BodyHandle) -> Result<&Rigidbody2D> {
        self.body(handle)
            .ok_or_else(|| PhysicsError::UnknownHandle(format!("{:?} is not a live body", handle)))
    }

    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Rigidbody2D> {
        self.body_mut(handle)
            .ok_or_else(|| PhysicsError::UnknownHandle(format!("{:?} is not a live body", handle)))
    }

    /// Marks the body dead. It stops simulating immediately; its slot is freed
    /// by [`PhysicsSystem::purge_deleted_objects`].
    pub fn destroy_rigidbody(&mut self, handle: BodyHandle) -> bool {
        match self.body_mut(handle) {
            Some(body) => {
                body.mark_dead();
                true
            }
            None => {
                warn!("destroy_rigidbody: {:?} is not a live body", handle);
                false
            }
        }
    }

    /// Live bodies in creation order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Rigidbody2D)> {
        self.bodies.iter_live()
    }

    pub fn body_count(&self, mode: SimulationMode) -> usize {
        self.bodies.count(mode)
    }

    pub fn find_by_owner(&self, owner: OwnerId) -> Option<BodyHandle> {
        self.bodies()
            .find(|(_, body)| body.owner() == Some(owner))
            .map(|(handle, _)| handle)
    }

    // --- Triggers --- //

    pub fn create_trigger(&mut self, mode: SimulationMode) -> TriggerHandle {
        let handle = self.triggers.next_handle();
        let mut trigger = Trigger2D::new(mode);
        trigger.bind_handle(handle);
        let inserted = self.triggers.insert(trigger);
        debug_assert_eq!(inserted, handle);
        self.trigger_order.push(handle);
        handle
    }

    pub fn trigger(&self, handle: TriggerHandle) -> Option<&Trigger2D> {
        self.triggers.get(handle).filter(|t| t.is_alive())
    }

    pub fn trigger_mut(&mut self, handle: TriggerHandle) -> Option<&mut Trigger2D> {
        self.triggers.get_mut(handle).filter(|t| t.is_alive())
    }

    pub fn try_trigger_mut(&mut self, handle: TriggerHandle) -> Result<&mut Trigger2D> {
        self.trigger_mut(handle)
            .ok_or_else(|| PhysicsError::UnknownHandle(format!("{:?} is not a live trigger", handle)))
    }

    pub fn destroy_trigger(&mut self, handle: TriggerHandle) -> bool {
        match self.trigger_mut(handle) {
            Some(trigger) => {
                trigger.mark_dead();
                true
            }
            None => {
                warn!("destroy_trigger: {:?} is not a live trigger", handle);
                false
            }
        }
    }

    pub fn triggers(&self) -> impl Iterator<Item = (TriggerHandle, &Trigger2D)> {
        self.trigger_order
            .iter()
            .filter_map(|&h| self.triggers.get(h).map(|t| (h, t)))
            .filter(|(_, t)| t.is_alive())
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers().count()
    }

    /// Contacts found by the most recent step.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    // --- Simulation --- //

    /// Advances the simulation by `dt` seconds. A non-positive `dt` pauses:
    /// nothing moves and no events fire.
    pub fn update(&mut self, dt: f64, events: &mut dyn EventSink) {
        if dt <= 0.0 {
            return;
        }

        // 1. Integrate motion
        self.bodies.rebuild_partitions();
        self.integrate_bodies(dt);

        // 2. Collision Detection
        self.find_contacts();

        // 3. Solve collisions (impulses, then positional correction)
        let mut constraints = self.prepare_contact_constraints();
        for _ in 0..self.config.velocity_iterations {
            for constraint in constraints.iter_mut() {
                self.apply_contact_impulse(constraint);
            }
        }
        for i in 0..self.contacts.len() {
            let contact = self.contacts[i];
            self.apply_positional_correction(&contact);
        }

        // 4. Collision events
        self.fire_collision_events(events);

        // 5. Triggers
        self.check_triggers(events);
    }

    fn integrate_bodies(&mut self, dt: f64) {
        let gravity = self.config.gravity;
        let dynamic: Vec<BodyHandle> = self.bodies.partition(SimulationMode::Dynamic).to_vec();
        for handle in dynamic {
            if let Some(body) = self.bodies.get_mut(handle) {
                integrator::integrate(body, gravity, dt);
            }
        }
    }

    /// Checks every unordered pair of live bodies with colliders, in creation order.
    fn find_contacts(&mut self) {
        self.contacts.clear();

        let candidates: Vec<(BodyHandle, Shape, bool)> = self
            .bodies
            .iter_live()
            .filter_map(|(handle, body)| body.world_shape().map(|shape| (handle, shape, body.is_immovable())))
            .collect();

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (handle_a, shape_a, immovable_a) = &candidates[i];
                let (handle_b, shape_b, immovable_b) = &candidates[j];
                if *immovable_a && *immovable_b {
                    continue;
                }
                if let Some(manifold) = collision::collide(shape_a, shape_b) {
                    self.contacts.push(Contact {
                        body_a: *handle_a,
                        body_b: *handle_b,
                        manifold,
                    });
                }
            }
        }

        if !self.contacts.is_empty() {
            debug!("{} contacts this step", self.contacts.len());
        }
    }

    /// Captures each contact point's bounce target from the velocities before
    /// any impulse of this step. Closing speeds under the restitution
    /// threshold get no bounce at all.
    fn prepare_contact_constraints(&self) -> Vec<ContactConstraint> {
        let restitution_threshold = self.config.restitution_velocity_threshold;
        self.contacts
            .iter()
            .filter_map(|contact| {
                let body_a = self.bodies.get(contact.body_a)?;
                let body_b = self.bodies.get(contact.body_b)?;
                let normal = contact.manifold.normal;
                let restitution = body_a.material.combined_restitution(&body_b.material);

                let manifold_points = contact.manifold.points();
                let mut points = [PointImpulse::default(); MAX_MANIFOLD_POINTS];
                for (slot, point) in points.iter_mut().zip(manifold_points) {
                    let relative_velocity =
                        body_b.velocity_at(point.position) - body_a.velocity_at(point.position);
                    let closing_speed = -relative_velocity.dot(normal);
                    slot.position = point.position;
                    slot.bounce_velocity = if closing_speed < restitution_threshold {
                        0.0
                    } else {
                        restitution * closing_speed
                    };
                }

                Some(ContactConstraint {
                    body_a: contact.body_a,
                    body_b: contact.body_b,
                    normal,
                    friction: body_a.material.combined_friction(&body_b.material),
                    points,
                    point_count: manifold_points.len(),
                })
            })
            .collect()
    }

    /// One pass over a contact's points: a normal impulse towards the bounce
    /// target, then a Coulomb-clamped friction impulse. Both are clamped as
    /// running totals for the step, so a later pass may take back part of an
    /// earlier push but the total never pulls the bodies together.
    fn apply_contact_impulse(&mut self, constraint: &mut ContactConstraint) {
        let Some((body_a, body_b)) = self.bodies.get2_mut(constraint.body_a, constraint.body_b) else {
            return;
        };

        let normal = constraint.normal;
        let tangent = normal.perpendicular();
        for point in constraint.points[..constraint.point_count].iter_mut() {
            let r_a = point.position - body_a.position();
            let r_b = point.position - body_b.position();

            let effective_mass_normal =
                inverse_mass_along(body_a, r_a, normal) + inverse_mass_along(body_b, r_b, normal);
            if effective_mass_normal < MIN_EFFECTIVE_MASS {
                continue;
            }

            let relative_velocity = body_b.velocity_at(point.position) - body_a.velocity_at(point.position);
            let relative_velocity_normal = relative_velocity.dot(normal);
            let total = (point.normal_impulse
                + (point.bounce_velocity - relative_velocity_normal) / effective_mass_normal)
                .max(0.0);
            let j = total - point.normal_impulse;
            point.normal_impulse = total;

            let impulse = normal * j;
            body_a.apply_impulse(-impulse, r_a);
            body_b.apply_impulse(impulse, r_b);

            // --- Friction --- //
            let effective_mass_tangent =
                inverse_mass_along(body_a, r_a, tangent) + inverse_mass_along(body_b, r_b, tangent);
            if effective_mass_tangent < MIN_EFFECTIVE_MASS {
                continue;
            }

            let relative_velocity = body_b.velocity_at(point.position) - body_a.velocity_at(point.position);
            let max_friction = constraint.friction * point.normal_impulse;
            let total = (point.tangent_impulse - relative_velocity.dot(tangent) / effective_mass_tangent)
                .clamp(-max_friction, max_friction);
            let jt = total - point.tangent_impulse;
            point.tangent_impulse = total;

            let friction_impulse = tangent * jt;
            body_a.apply_impulse(-friction_impulse, r_a);
            body_b.apply_impulse(friction_impulse, r_b);
        }
    }

    /// Pushes the pair apart along the normal, split by inverse mass.
    fn apply_positional_correction(&mut self, contact: &Contact) {
        let percent = self.config.positional_correction_percent;
        let slop = self.config.positional_correction_slop;

        let correction_magnitude = (contact.manifold.depth - slop).max(0.0);
        if correction_magnitude < 1e-9 {
            return;
        }

        let Some((body_a, body_b)) = self.bodies.get2_mut(contact.body_a, contact.body_b) else {
            return;
        };

        let normal = contact.manifold.normal;
        let inv_a = body_a.inverse_mass_axes();
        let inv_b = body_b.inverse_mass_axes();
        let total_inv_mass = normal.dot(normal.scale_by(inv_a)) + normal.dot(normal.scale_by(inv_b));
        if total_inv_mass < MIN_EFFECTIVE_MASS {
            return;
        }

        let correction = normal * (correction_magnitude / total_inv_mass * percent);
        body_a.transform.position -= correction.scale_by(inv_a);
        body_b.transform.position += correction.scale_by(inv_b);
    }

    fn fire_collision_events(&self, events: &mut dyn EventSink) {
        for contact in &self.contacts {
            for handle in [contact.body_a, contact.body_b] {
                let event = self
                    .bodies
                    .get(handle)
                    .and_then(|body| body.collider())
                    .and_then(|collider| collider.collision_event());
                if let Some(name) = event {
                    debug!("Collision event '{}' from {:?}", name, handle);
                    events.fire_event(name);
                }
            }
        }
    }

    /// Compares each trigger's current overlaps with last frame's and fires
    /// enter/exit events for the differences.
    fn check_triggers(&mut self, events: &mut dyn EventSink) {
        let body_shapes: Vec<(BodyHandle, Shape)> = self
            .bodies
            .iter_live()
            .filter_map(|(handle, body)| body.world_shape().map(|shape| (handle, shape)))
            .collect();

        for &trigger_handle in &self.trigger_order {
            let Some(trigger) = self.triggers.get_mut(trigger_handle) else {
                continue;
            };
            if !trigger.is_alive() {
                continue;
            }

            let current: Vec<BodyHandle> = match trigger.world_shape() {
                Some(trigger_shape) => body_shapes
                    .iter()
                    .filter(|(_, shape)| collision::overlaps(&trigger_shape, shape))
                    .map(|(handle, _)| *handle)
                    .collect(),
                None => Vec::new(),
            };

            let transitions = trigger.update_overlaps(current);
            if let Some(name) = trigger.on_enter_event() {
                for body in &transitions.entered {
                    debug!("Trigger {:?}: {:?} entered", trigger_handle, body);
                    events.fire_event(name);
                }
            }
            if let Some(name) = trigger.on_exit_event() {
                for body in &transitions.exited {
                    debug!("Trigger {:?}: {:?} exited", trigger_handle, body);
                    events.fire_event(name);
                }
            }
        }
    }

    /// Releases every destroyed body and trigger. Call between frames, never
    /// from inside an event callback of the same step.
    pub fn purge_deleted_objects(&mut self) -> usize {
        let mut purged = self.bodies.purge();

        let triggers = &mut self.triggers;
        let before = self.trigger_order.len();
        self.trigger_order
            .retain(|&handle| match triggers.get(handle).map(Trigger2D::is_alive) {
                Some(true) => true,
                Some(false) => {
                    triggers.remove(handle);
                    false
                }
                None => false,
            });
        purged += before - self.trigger_order.len();

        let bodies = &self.bodies;
        self.contacts
            .retain(|c| bodies.get(c.body_a).is_some() && bodies.get(c.body_b).is_some());

        if purged > 0 {
            debug!("Purged {} deleted objects", purged);
        }
        purged
    }

    // --- Collaborator queries --- //

    /// Live bodies whose collider contains `point`, in creation order.
    pub fn bodies_at_point(&self, point: Vec2) -> Vec<BodyHandle> {
        self.bodies()
            .filter(|(_, body)| body.world_shape().is_some_and(|shape| shape.contains(point)))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Holds a body in place: it turns Static until released.
    pub fn begin_possession(&mut self, handle: BodyHandle) -> Option<Possession> {
        let body = self.body_mut(handle)?;
        let possession = Possession {
            handle,
            previous_mode: body.simulation_mode(),
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
            material: body.material,
        };
        body.set_simulation_mode(SimulationMode::Static);
        Some(possession)
    }

    pub fn move_possessed(&mut self, possession: &Possession, position: Vec2) -> bool {
        match self.body_mut(possession.handle) {
            Some(body) => {
                body.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Restores the held body's mode and material and drops it at rest.
    pub fn end_possession(&mut self, possession: Possession) -> bool {
        let Some(body) = self.body_mut(possession.handle) else {
            warn!("end_possession: {:?} no longer exists", possession.handle);
            return false;
        };
        body.set_simulation_mode(possession.previous_mode);
        body.material = possession.material;
        body.velocity = Vec2::ZERO;
        body.angular_velocity = 0.0;
        true
    }

    /// Hands every live collider to `draw` in world space.
    pub fn debug_render(&self, draw: &mut dyn DebugDraw) {
        for (_, body) in self.bodies() {
            if let Some(shape) = body.world_shape() {
                draw.draw_shape(&shape, body_color(body.simulation_mode()));
            }
        }
        for (_, trigger) in self.triggers() {
            if let Some(shape) = trigger.world_shape() {
                draw.draw_shape(&shape, TRIGGER_COLOR);
            }
        }
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Inverse effective mass of `body` for an impulse along unit `direction`
/// applied at offset `r`.
fn inverse_mass_along(body: &Rigidbody2D, r: Vec2, direction: Vec2) -> f64 {
    let r_cross_d = r.cross(direction);
    direction.dot(direction.scale_by(body.inverse_mass_axes())) + r_cross_d * r_cross_d * body.inverse_inertia()
}
