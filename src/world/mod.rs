pub mod arena;
pub mod bucket;
pub mod debug_draw;
pub mod physics_system;

pub use arena::{Arena, Handle};
pub use bucket::RigidBodyBucket;
pub use debug_draw::{body_color, DebugDraw, Rgba};
pub use physics_system::{Contact, PhysicsSystem, Possession};

use crate::objects::{Rigidbody2D, Trigger2D};

pub type BodyHandle = Handle<Rigidbody2D>;
pub type TriggerHandle = Handle<Trigger2D>;
