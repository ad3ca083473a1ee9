use serde::{Deserialize, Serialize};

use super::aabb2::Aabb2;
use crate::math::vec2::Vec2;

/// Oriented box: center, half extents along its local axes, rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb2 {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub rotation_degrees: f64,
}

impl Obb2 {
    pub fn new(center: Vec2, half_extents: Vec2, rotation_degrees: f64) -> Self {
        Self {
            center,
            half_extents,
            rotation_degrees,
        }
    }

    /// Builds a box from a full size (width, height) instead of half extents.
    pub fn from_size(center: Vec2, size: Vec2, rotation_degrees: f64) -> Self {
        Self::new(center, size * 0.5, rotation_degrees)
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// The box's local x and y axes in world space (unit length).
    pub fn axes(&self) -> [Vec2; 2] {
        let right = Vec2::from_angle_degrees(self.rotation_degrees);
        [right, right.perpendicular()]
    }

    /// Corners in counter-clockwise order starting at the bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let [right, up] = self.axes();
        let rx = right * self.half_extents.x;
        let uy = up * self.half_extents.y;
        [
            self.center - rx - uy,
            self.center + rx - uy,
            self.center + rx + uy,
            self.center - rx + uy,
        ]
    }

    /// Expresses a world point in the box's local frame (origin at center).
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        (point - self.center).rotate_degrees(-self.rotation_degrees)
    }

    pub fn from_local(&self, point: Vec2) -> Vec2 {
        point.rotate_degrees(self.rotation_degrees) + self.center
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let local = self.to_local(point);
        let clamped = Vec2::new(
            local.x.clamp(-self.half_extents.x, self.half_extents.x),
            local.y.clamp(-self.half_extents.y, self.half_extents.y),
        );
        self.from_local(clamped)
    }

    /// Projection interval of the box onto a unit axis.
    pub fn project(&self, axis: Vec2) -> (f64, f64) {
        let [right, up] = self.axes();
        let center = self.center.dot(axis);
        let radius = self.half_extents.x * right.dot(axis).abs() + self.half_extents.y * up.dot(axis).abs();
        (center - radius, center + radius)
    }

    pub fn bounds(&self) -> Aabb2 {
        let corners = self.corners();
        Aabb2::from_points(&corners).unwrap_or_else(|| Aabb2::new(self.center, self.center))
    }

    /// Moment of inertia of a solid rectangle about the body origin.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        let size = self.size();
        mass * (size.x * size.x + size.y * size.y) / 12.0 + mass * self.center.magnitude_squared()
    }
}

impl From<Aabb2> for Obb2 {
    fn from(aabb: Aabb2) -> Self {
        Obb2::new(aabb.center(), aabb.half_extents(), 0.0)
    }
}
