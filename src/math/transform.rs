use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Position, rotation and scale of a body or trigger.
///
/// Rotation is stored in degrees, counter-clockwise. Scale is carried for
/// renderers and persistence only; collider geometry is never scaled by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2 {
    pub position: Vec2,
    pub rotation_degrees: f64,
    #[serde(default = "default_scale")]
    pub scale: Vec2,
}

fn default_scale() -> Vec2 {
    Vec2::ONE
}

impl Transform2 {
    /// Creates a new transform with unit scale.
    pub fn new(position: Vec2, rotation_degrees: f64) -> Self {
        Self {
            position,
            rotation_degrees,
            scale: Vec2::ONE,
        }
    }

    /// Creates an identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    /// Applies the transform (rotation then translation) to a local point.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        point.rotate_degrees(self.rotation_degrees) + self.position
    }

    /// Rotates a local direction without translating it.
    pub fn apply_direction(&self, direction: Vec2) -> Vec2 {
        direction.rotate_degrees(self.rotation_degrees)
    }

    /// Applies the inverse transform (inverse translation then inverse rotation) to a world point.
    pub fn apply_inverse(&self, point: Vec2) -> Vec2 {
        (point - self.position).rotate_degrees(-self.rotation_degrees)
    }
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::identity()
    }
}
