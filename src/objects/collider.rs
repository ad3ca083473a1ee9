use crate::collision::{self, Manifold};
use crate::error::Result;
use crate::math::{Transform2, Vec2};
use crate::shapes::{ColliderType, Shape};
use crate::world::{BodyHandle, TriggerHandle};

/// Non-owning link from a collider back to whatever carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderOwner {
    Body(BodyHandle),
    Trigger(TriggerHandle),
}

/// A shape bound to a rigid body or trigger.
///
/// The shape is stored in the owner's local space; every world-space query
/// takes the owner's transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider2D {
    shape: Shape,
    owner: Option<ColliderOwner>,
    collision_event: Option<String>,
}

impl Collider2D {
    /// Validates `shape` and wraps it in an unowned collider.
    pub fn new(shape: Shape) -> Result<Self> {
        shape.validate()?;
        Ok(Self {
            shape,
            owner: None,
            collision_event: None,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn collider_type(&self) -> ColliderType {
        self.shape.collider_type()
    }

    pub fn owner(&self) -> Option<ColliderOwner> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ColliderOwner>) {
        self.owner = owner;
    }

    /// Name fired on the event bus whenever this collider takes part in a contact.
    pub fn collision_event(&self) -> Option<&str> {
        self.collision_event.as_deref()
    }

    pub fn set_collision_event(&mut self, event: impl Into<String>) {
        self.collision_event = Some(event.into());
    }

    pub fn clear_collision_event(&mut self) {
        self.collision_event = None;
    }

    pub fn world_shape(&self, transform: &Transform2) -> Shape {
        self.shape.to_world(transform)
    }

    pub fn contains(&self, transform: &Transform2, point: Vec2) -> bool {
        self.world_shape(transform).contains(point)
    }

    /// Overlap test against another collider; the normal points from `self` to `other`.
    pub fn overlap(
        &self,
        transform: &Transform2,
        other: &Collider2D,
        other_transform: &Transform2,
    ) -> Option<Manifold> {
        collision::collide(&self.world_shape(transform), &other.world_shape(other_transform))
    }

    /// Moment of inertia this shape gives a body of `mass`.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        self.shape.moment_of_inertia(mass)
    }
}
