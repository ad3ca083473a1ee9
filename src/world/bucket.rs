use super::arena::Arena;
use super::BodyHandle;
use crate::objects::rigid_body::{Rigidbody2D, SimulationMode};

/// Storage for every rigid body of a physics system.
///
/// Bodies keep their insertion order for pair iteration. The per-mode
/// partitions are rebuilt at the start of every step and only list live bodies.
#[derive(Default)]
pub struct RigidBodyBucket {
    bodies: Arena<Rigidbody2D>,
    order: Vec<BodyHandle>,
    static_bodies: Vec<BodyHandle>,
    dynamic_bodies: Vec<BodyHandle>,
}

impl RigidBodyBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mut body: Rigidbody2D) -> BodyHandle {
        let handle = self.bodies.next_handle();
        body.bind_handle(handle);
        let inserted = self.bodies.insert(body);
        debug_assert_eq!(inserted, handle);
        self.order.push(handle);
        handle
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Rigidbody2D> {
        self.bodies.get(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Rigidbody2D> {
        self.bodies.get_mut(handle)
    }

    pub fn get2_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Rigidbody2D, &mut Rigidbody2D)> {
        self.bodies.get2_mut(a, b)
    }

    /// All stored handles (dead ones included until purged), in insertion order.
    pub fn order(&self) -> &[BodyHandle] {
        &self.order
    }

    /// Live bodies in insertion order.
    pub fn iter_live(&self) -> impl Iterator<Item = (BodyHandle, &Rigidbody2D)> {
        self.order
            .iter()
            .filter_map(|&h| self.bodies.get(h).map(|b| (h, b)))
            .filter(|(_, b)| b.is_alive())
    }

    pub fn rebuild_partitions(&mut self) {
        self.static_bodies.clear();
        self.dynamic_bodies.clear();
        for &handle in &self.order {
            let Some(body) = self.bodies.get(handle) else {
                continue;
            };
            if !body.is_alive() {
                continue;
            }
            match body.simulation_mode() {
                SimulationMode::Static => self.static_bodies.push(handle),
                SimulationMode::Dynamic => self.dynamic_bodies.push(handle),
            }
        }
    }

    /// Live bodies of `mode` as of the last partition rebuild.
    pub fn partition(&self, mode: SimulationMode) -> &[BodyHandle] {
        match mode {
            SimulationMode::Static => &self.static_bodies,
            SimulationMode::Dynamic => &self.dynamic_bodies,
        }
    }

    /// Live bodies currently in `mode`.
    pub fn count(&self, mode: SimulationMode) -> usize {
        self.iter_live().filter(|(_, b)| b.simulation_mode() == mode).count()
    }

    /// Stored bodies, dead ones included.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Frees the slots of every dead body. Returns how many were released.
    pub fn purge(&mut self) -> usize {
        let bodies = &mut self.bodies;
        let before = self.order.len();
        self.order.retain(|&handle| match bodies.get(handle).map(Rigidbody2D::is_alive) {
            Some(true) => true,
            Some(false) => {
                bodies.remove(handle);
                false
            }
            None => false,
        });
        self.static_bodies.retain(|&h| bodies.contains(h));
        self.dynamic_bodies.retain(|&h| bodies.contains(h));
        before - self.order.len()
    }
}
