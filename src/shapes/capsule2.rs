use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::aabb2::Aabb2;
use super::segment::Segment2;
use crate::math::vec2::Vec2;

/// A segment swept by a disc of `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule2 {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f64,
}

impl Capsule2 {
    pub fn new(start: Vec2, end: Vec2, radius: f64) -> Self {
        Self { start, end, radius }
    }

    pub fn segment(&self) -> Segment2 {
        Segment2::new(self.start, self.end)
    }

    pub fn center(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Length of the inner segment (excluding the rounded caps).
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.segment().distance_squared_to(point) <= self.radius * self.radius
    }

    pub fn bounds(&self) -> Aabb2 {
        let r = Vec2::new(self.radius, self.radius);
        let mut bounds = Aabb2::new(self.start - r, self.start + r);
        bounds.merge(&Aabb2::new(self.end - r, self.end + r));
        bounds
    }

    /// Rectangle of the segment length plus two half-disc caps, mass split by area.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        let r = self.radius;
        let l = self.length();
        let rect_area = l * 2.0 * r;
        let caps_area = PI * r * r;
        let total_area = rect_area + caps_area;
        if total_area <= f64::EPSILON {
            return mass * self.center().magnitude_squared();
        }
        let rect_mass = mass * rect_area / total_area;
        let caps_mass = mass * caps_area / total_area;
        let rect = rect_mass * (l * l + 4.0 * r * r) / 12.0;
        // Each half-disc: r^2/2 about its flat edge, shifted out by l/2 (centroid at 4r/3pi)
        let caps = caps_mass * (0.5 * r * r + 0.25 * l * l + l * 4.0 * r / (3.0 * PI));
        rect + caps + mass * self.center().magnitude_squared()
    }
}
