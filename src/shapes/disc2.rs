use serde::{Deserialize, Serialize};

use super::aabb2::Aabb2;
use crate::math::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc2 {
    pub center: Vec2,
    pub radius: f64,
}

impl Disc2 {
    pub fn new(center: Vec2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_center_half_extents(self.center, Vec2::new(self.radius, self.radius))
    }

    /// Solid disc about the body origin.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius + mass * self.center.magnitude_squared()
    }
}
