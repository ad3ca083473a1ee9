pub mod aabb2;
pub mod capsule2;
pub mod disc2;
pub mod obb2;
pub mod segment;

pub use aabb2::Aabb2;
pub use capsule2::Capsule2;
pub use disc2::Disc2;
pub use obb2::Obb2;
pub use segment::Segment2;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::{Transform2, Vec2};

/// Tag identifying which shape variant a collider carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderType {
    Aabb,
    Box,
    Disc,
    Capsule,
}

/// Geometry of a collider.
///
/// Collider shapes live in body-local space; [`Shape::to_world`] produces the
/// world-space copy used by every overlap and containment query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Aabb(Aabb2),
    Box(Obb2),
    Disc(Disc2),
    Capsule(Capsule2),
}

impl Shape {
    pub fn collider_type(&self) -> ColliderType {
        match self {
            Shape::Aabb(_) => ColliderType::Aabb,
            Shape::Box(_) => ColliderType::Box,
            Shape::Disc(_) => ColliderType::Disc,
            Shape::Capsule(_) => ColliderType::Capsule,
        }
    }

    /// Places a body-local shape in the world.
    ///
    /// AABBs follow the transform's translation only and stay axis-aligned.
    pub fn to_world(&self, transform: &Transform2) -> Shape {
        match self {
            Shape::Aabb(aabb) => Shape::Aabb(aabb.translated(transform.position)),
            Shape::Box(obb) => Shape::Box(Obb2::new(
                transform.apply(obb.center),
                obb.half_extents,
                obb.rotation_degrees + transform.rotation_degrees,
            )),
            Shape::Disc(disc) => Shape::Disc(Disc2::new(transform.apply(disc.center), disc.radius)),
            Shape::Capsule(capsule) => Shape::Capsule(Capsule2::new(
                transform.apply(capsule.start),
                transform.apply(capsule.end),
                capsule.radius,
            )),
        }
    }

    /// Point-in-shape test, inclusive of the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Aabb(aabb) => aabb.contains(point),
            Shape::Box(obb) => obb.contains(point),
            Shape::Disc(disc) => disc.contains(point),
            Shape::Capsule(capsule) => capsule.contains(point),
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        match self {
            Shape::Aabb(aabb) => *aabb,
            Shape::Box(obb) => obb.bounds(),
            Shape::Disc(disc) => disc.bounds(),
            Shape::Capsule(capsule) => capsule.bounds(),
        }
    }

    /// Moment of inertia about the local origin for a body of `mass`.
    /// Infinite mass yields infinite inertia.
    ///
    /// An AABB never rotates with its body, so it is infinite for any mass.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        if !mass.is_finite() {
            return f64::INFINITY;
        }
        match self {
            Shape::Aabb(_) => f64::INFINITY,
            Shape::Box(obb) => obb.moment_of_inertia(mass),
            Shape::Disc(disc) => disc.moment_of_inertia(mass),
            Shape::Capsule(capsule) => capsule.moment_of_inertia(mass),
        }
    }

    /// Rejects geometry the solver cannot work with.
    pub fn validate(&self) -> Result<()> {
        let finite = |v: Vec2| v.is_finite();
        match self {
            Shape::Aabb(aabb) => {
                if !finite(aabb.min) || !finite(aabb.max) {
                    return Err(PhysicsError::InvalidShape(format!("non-finite AABB {:?}", aabb)));
                }
            }
            Shape::Box(obb) => {
                if !finite(obb.center) || !finite(obb.half_extents) || !obb.rotation_degrees.is_finite() {
                    return Err(PhysicsError::InvalidShape(format!("non-finite box {:?}", obb)));
                }
                if obb.half_extents.x < 0.0 || obb.half_extents.y < 0.0 {
                    return Err(PhysicsError::InvalidShape(format!(
                        "negative box half extents {:?}",
                        obb.half_extents
                    )));
                }
            }
            Shape::Disc(disc) => {
                if !finite(disc.center) || !disc.radius.is_finite() || disc.radius < 0.0 {
                    return Err(PhysicsError::InvalidShape(format!("bad disc {:?}", disc)));
                }
            }
            Shape::Capsule(capsule) => {
                if !finite(capsule.start)
                    || !finite(capsule.end)
                    || !capsule.radius.is_finite()
                    || capsule.radius < 0.0
                {
                    return Err(PhysicsError::InvalidShape(format!("bad capsule {:?}", capsule)));
                }
            }
        }
        Ok(())
    }
}
