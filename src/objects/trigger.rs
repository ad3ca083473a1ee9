use super::collider::{Collider2D, ColliderOwner};
use super::rigid_body::SimulationMode;
use crate::error::Result;
use crate::math::Transform2;
use crate::shapes::Shape;
use crate::world::{BodyHandle, TriggerHandle};

/// A volume that reports bodies entering and leaving it. Triggers never
/// exchange momentum and are never integrated.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger2D {
    handle: Option<TriggerHandle>,
    mode: SimulationMode,
    pub transform: Transform2,
    collider: Option<Collider2D>,
    on_enter_event: Option<String>,
    on_exit_event: Option<String>,
    // Bodies overlapping as of the last trigger check, in detection order
    overlapping: Vec<BodyHandle>,
    alive: bool,
}

/// Overlap transitions found by one trigger check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerTransitions {
    pub entered: Vec<BodyHandle>,
    pub exited: Vec<BodyHandle>,
}

impl Trigger2D {
    pub fn new(mode: SimulationMode) -> Self {
        Self {
            handle: None,
            mode,
            transform: Transform2::identity(),
            collider: None,
            on_enter_event: None,
            on_exit_event: None,
            overlapping: Vec::new(),
            alive: true,
        }
    }

    pub fn handle(&self) -> Option<TriggerHandle> {
        self.handle
    }

    pub(crate) fn bind_handle(&mut self, handle: TriggerHandle) {
        self.handle = Some(handle);
        if let Some(collider) = self.collider.as_mut() {
            collider.set_owner(Some(ColliderOwner::Trigger(handle)));
        }
    }

    pub fn simulation_mode(&self) -> SimulationMode {
        self.mode
    }

    pub fn set_simulation_mode(&mut self, mode: SimulationMode) {
        self.mode = mode;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
    }

    pub fn collider(&self) -> Option<&Collider2D> {
        self.collider.as_ref()
    }

    pub fn set_collider(&mut self, shape: Shape) -> Result<&Collider2D> {
        let mut collider = Collider2D::new(shape)?;
        collider.set_owner(self.handle.map(ColliderOwner::Trigger));
        Ok(self.collider.insert(collider))
    }

    pub fn world_shape(&self) -> Option<Shape> {
        self.collider.as_ref().map(|c| c.world_shape(&self.transform))
    }

    pub fn on_enter_event(&self) -> Option<&str> {
        self.on_enter_event.as_deref()
    }

    pub fn set_on_enter_event(&mut self, event: impl Into<String>) {
        self.on_enter_event = Some(event.into());
    }

    pub fn on_exit_event(&self) -> Option<&str> {
        self.on_exit_event.as_deref()
    }

    pub fn set_on_exit_event(&mut self, event: impl Into<String>) {
        self.on_exit_event = Some(event.into());
    }

    pub fn is_overlapping(&self, body: BodyHandle) -> bool {
        self.overlapping.contains(&body)
    }

    pub fn overlapping(&self) -> &[BodyHandle] {
        &self.overlapping
    }

    /// Replaces last frame's overlap set with `current` and reports the difference.
    pub(crate) fn update_overlaps(&mut self, current: Vec<BodyHandle>) -> TriggerTransitions {
        let entered = current
            .iter()
            .copied()
            .filter(|h| !self.overlapping.contains(h))
            .collect();
        let exited = self
            .overlapping
            .iter()
            .copied()
            .filter(|h| !current.contains(h))
            .collect();
        self.overlapping = current;
        TriggerTransitions { entered, exited }
    }
}
