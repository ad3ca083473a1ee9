use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Squared length under which a segment is treated as a single point.
const DEGENERATE_LENGTH_SQ: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2 {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment2 {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Calculates the length of the line segment.
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Calculates the squared length of the line segment.
    pub fn length_squared(&self) -> f64 {
        self.a.distance_squared(self.b)
    }

    /// Returns the direction vector of the line segment (from a to b).
    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.length_squared() < DEGENERATE_LENGTH_SQ
    }

    /// Finds the point on the segment closest to `point`.
    /// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
    pub fn closest_point(&self, point: Vec2) -> (Vec2, f64) {
        let segment_vec = self.direction();
        let length_sq = segment_vec.magnitude_squared();
        if length_sq < DEGENERATE_LENGTH_SQ {
            return (self.a, 0.0);
        }
        let t = ((point - self.a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
        (self.a + segment_vec * t, t)
    }

    pub fn distance_squared_to(&self, point: Vec2) -> f64 {
        let (closest, _) = self.closest_point(point);
        closest.distance_squared(point)
    }

    /// Closest pair of points between two segments: (point on self, point on other).
    ///
    /// Parallel overlapping segments report the middle of the overlap so that
    /// a capsule lying flat on another gets a centred contact.
    pub fn closest_points(&self, other: &Segment2) -> (Vec2, Vec2) {
        let d1 = self.direction();
        let d2 = other.direction();
        let r = self.a - other.a;
        let a = d1.magnitude_squared();
        let e = d2.magnitude_squared();
        let f = d2.dot(r);

        if a < DEGENERATE_LENGTH_SQ && e < DEGENERATE_LENGTH_SQ {
            return (self.a, other.a);
        }
        if a < DEGENERATE_LENGTH_SQ {
            let (on_other, _) = other.closest_point(self.a);
            return (self.a, on_other);
        }
        if e < DEGENERATE_LENGTH_SQ {
            let (on_self, _) = self.closest_point(other.a);
            return (on_self, other.a);
        }

        let c = d1.dot(r);
        let b = d1.dot(d2);
        let denom = a * e - b * b;

        if denom.abs() <= 1e-9 * a * e {
            // Parallel: centre of the shared interval, projected onto self.
            let t0 = ((other.a - self.a).dot(d1) / a).clamp(0.0, 1.0);
            let t1 = ((other.b - self.a).dot(d1) / a).clamp(0.0, 1.0);
            let s = 0.5 * (t0 + t1);
            let on_self = self.a + d1 * s;
            let (on_other, _) = other.closest_point(on_self);
            return (on_self, on_other);
        }

        let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
        let mut t = (b * s + f) / e;
        if t < 0.0 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else if t > 1.0 {
            t = 1.0;
            s = ((b - c) / a).clamp(0.0, 1.0);
        }
        (self.a + d1 * s, other.a + d2 * t)
    }
}
