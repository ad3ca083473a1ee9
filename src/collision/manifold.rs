use crate::math::vec2::Vec2;

/// Most points a manifold carries: two features of a 2D face contact.
pub const MAX_MANIFOLD_POINTS: usize = 2;

/// One point of a manifold and how far the shapes overlap there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub position: Vec2,
    pub depth: f64,
}

/// Result of a successful narrow-phase test between two world-space shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// The collision normal, pointing from shape A towards shape B.
    pub normal: Vec2,
    /// The amount of penetration along `normal`. Always positive.
    pub depth: f64,
    /// A single representative contact point in world coordinates.
    pub contact_point: Vec2,
    points: [ContactPoint; MAX_MANIFOLD_POINTS],
    point_count: usize,
}

impl Manifold {
    /// A manifold whose only solver point is `contact_point`.
    pub fn new(normal: Vec2, depth: f64, contact_point: Vec2) -> Self {
        let point = ContactPoint {
            position: contact_point,
            depth,
        };
        Self {
            normal,
            depth,
            contact_point,
            points: [point; MAX_MANIFOLD_POINTS],
            point_count: 1,
        }
    }

    /// A manifold solved at up to two clipped points. With no points it falls
    /// back to the representative point; extra points are dropped.
    pub fn with_points(normal: Vec2, depth: f64, contact_point: Vec2, points: &[ContactPoint]) -> Self {
        let mut manifold = Self::new(normal, depth, contact_point);
        let count = points.len().min(MAX_MANIFOLD_POINTS);
        if count > 0 {
            manifold.points[..count].copy_from_slice(&points[..count]);
            manifold.point_count = count;
        }
        manifold
    }

    /// Points the solver applies impulses at.
    pub fn points(&self) -> &[ContactPoint] {
        &self.points[..self.point_count]
    }

    /// The same contact seen from the other shape.
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}
