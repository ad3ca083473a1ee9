use crate::objects::SimulationMode;
use crate::shapes::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

pub const STATIC_COLOR: Rgba = Rgba::new(255, 0, 0, 255);
pub const DYNAMIC_COLOR: Rgba = Rgba::new(0, 0, 255, 255);
pub const TRIGGER_COLOR: Rgba = Rgba::new(255, 0, 255, 255);

/// Outline colour for a body in `mode`.
pub fn body_color(mode: SimulationMode) -> Rgba {
    match mode {
        SimulationMode::Static => STATIC_COLOR,
        SimulationMode::Dynamic => DYNAMIC_COLOR,
    }
}

/// Receives world-space shapes from [`PhysicsSystem::debug_render`].
///
/// [`PhysicsSystem::debug_render`]: super::PhysicsSystem::debug_render
pub trait DebugDraw {
    fn draw_shape(&mut self, shape: &Shape, color: Rgba);
}
