use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{Rigidbody2D, SimulationMode};

/// Integrates the rigid body's state forward in time using Semi-Implicit Euler.
///
/// Only live Dynamic bodies of finite mass move. Locked axes have their
/// velocity component zeroed so a later unlock starts from rest.
pub fn integrate(body: &mut Rigidbody2D, gravity: Vec2, dt: f64) {
    if !body.is_alive() || body.simulation_mode() != SimulationMode::Dynamic || !body.mass().is_finite() {
        return;
    }

    // --- Linear Motion --- //
    let mut velocity = body.velocity + gravity * dt;
    velocity = velocity * drag_factor(body.linear_drag(), dt);
    velocity = velocity.scale_by(body.constraints.linear_mask());
    body.velocity = velocity;
    body.transform.position += velocity * dt;

    // --- Angular Motion --- //
    let angular_velocity =
        body.angular_velocity * drag_factor(body.angular_drag(), dt) * body.constraints.angular_mask();
    body.angular_velocity = angular_velocity;
    if angular_velocity != 0.0 {
        body.transform.rotation_degrees =
            wrap_degrees(body.transform.rotation_degrees + angular_velocity.to_degrees() * dt);
    }
}

/// Linear drag multiplier for one step; never negative.
fn drag_factor(drag: f64, dt: f64) -> f64 {
    (1.0 - drag * dt).max(0.0)
}

/// Wraps an angle in degrees to the range (-180, 180].
fn wrap_degrees(angle: f64) -> f64 {
    let radians = angle.to_radians();
    radians.sin().atan2(radians.cos()).to_degrees()
}
