pub mod detection;
pub mod manifold;

// Re-export key types
pub use detection::{collide, overlaps};
pub use manifold::{ContactPoint, Manifold};
