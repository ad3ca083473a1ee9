pub mod collider;
pub mod rigid_body;
pub mod trigger;

pub use collider::{Collider2D, ColliderOwner};
pub use rigid_body::{OwnerId, Rigidbody2D, SimulationMode};
pub use trigger::{Trigger2D, TriggerTransitions};
