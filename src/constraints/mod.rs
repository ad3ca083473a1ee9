use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// Per-axis freedom of a rigid body. `true` means the body may move along
/// (or rotate about) that axis; a locked axis neither integrates nor responds
/// to impulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub x: bool,
    pub y: bool,
    pub rotation: bool,
}

impl Constraints {
    pub const FREE: Constraints = Constraints {
        x: true,
        y: true,
        rotation: true,
    };

    pub const LOCKED: Constraints = Constraints {
        x: false,
        y: false,
        rotation: false,
    };

    pub fn new(x: bool, y: bool, rotation: bool) -> Self {
        Self { x, y, rotation }
    }

    pub fn is_fully_locked(&self) -> bool {
        !self.x && !self.y && !self.rotation
    }

    /// Component-wise multiplier for linear quantities: 1 on free axes, 0 on locked ones.
    pub fn linear_mask(&self) -> Vec2 {
        Vec2::new(mask(self.x), mask(self.y))
    }

    /// Multiplier for angular quantities.
    pub fn angular_mask(&self) -> f64 {
        mask(self.rotation)
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::FREE
    }
}

fn mask(free: bool) -> f64 {
    if free {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_free() {
        let c = Constraints::default();
        assert_eq!(c, Constraints::FREE);
        assert_eq!(c.linear_mask(), Vec2::ONE);
        assert_eq!(c.angular_mask(), 1.0);
    }

    #[test]
    fn test_masks_follow_flags() {
        let c = Constraints::new(true, false, false);
        assert_eq!(c.linear_mask(), Vec2::new(1.0, 0.0));
        assert_eq!(c.angular_mask(), 0.0);
        assert!(!c.is_fully_locked());
        assert!(Constraints::LOCKED.is_fully_locked());
    }
}
