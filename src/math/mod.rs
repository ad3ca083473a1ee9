pub mod transform;
pub mod vec2;

pub use transform::Transform2;
pub use vec2::Vec2;
