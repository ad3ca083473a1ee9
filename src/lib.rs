pub mod collision;
pub mod common;
pub mod config;
pub mod constraints;
pub mod error;
pub mod events;
pub mod integration;
pub mod math;
pub mod objects;
pub mod scene;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{collide, ContactPoint, Manifold};
pub use common::Material;
pub use config::PhysicsConfig;
pub use constraints::Constraints;
pub use error::{PhysicsError, Result};
pub use events::{EventBus, EventSink};
pub use math::{Transform2, Vec2};
pub use objects::{Collider2D, OwnerId, Rigidbody2D, SimulationMode, Trigger2D};
pub use scene::SceneDocument;
pub use shapes::{Aabb2, Capsule2, ColliderType, Disc2, Obb2, Shape};
pub use world::{BodyHandle, PhysicsSystem, TriggerHandle};
