//! The body store and the fixed step.

use std::collections::BTreeMap;

use glam::DVec3;

use crate::body::{BodyHandle, RigidBody};
use crate::contact::{self, Contact, Material};

/// Collision filter of the implicit ground plane at y = 0.
#[derive(Debug, Clone, Copy)]
struct Ground {
    group: u32,
    mask: u32,
}

/// Owns every rigid body. Iteration order is handle order, so stepping is
/// deterministic for a given sequence of inserts.
#[derive(Debug)]
pub struct PhysicsWorld {
    gravity: DVec3,
    ground: Option<Ground>,
    material: Material,
    bodies: BTreeMap<BodyHandle, RigidBody>,
    next_handle: u32,
    contacts: Vec<Contact>,
}

impl PhysicsWorld {
    /// A world pulling everything down -Y at `gravity` units/s².
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity: DVec3::new(0.0, -gravity, 0.0),
            ground: None,
            material: Material::default(),
            bodies: BTreeMap::new(),
            next_handle: 0,
            contacts: Vec::new(),
        }
    }

    /// Add a ground plane at y = 0 with the given collision filter.
    pub fn with_ground(mut self, group: u32, mask: u32) -> Self {
        self.ground = Some(Ground { group, mask });
        self
    }

    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(handle, body);
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        self.bodies.remove(&handle)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(&handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(&handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.bodies.iter().map(|(handle, body)| (*handle, body))
    }

    /// Advance every body by `dt`: resolve current contacts, then integrate.
    pub fn step(&mut self, dt: f64) {
        self.find_contacts();

        let contacts = std::mem::take(&mut self.contacts);
        for c in &contacts {
            self.with_pair(c, |a, b, material| {
                contact::resolve_velocity(c, a, b, material);
            });
        }
        for c in &contacts {
            self.with_pair(c, |a, b, _| contact::resolve_position(c, a, b));
        }
        self.contacts = contacts;

        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            body.integrate(gravity, dt);
        }
    }

    fn find_contacts(&mut self) {
        self.contacts.clear();

        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        for (i, &ha) in handles.iter().enumerate() {
            let a = &self.bodies[&ha];

            if let Some(ground) = self.ground {
                if !a.is_static() && a.accepts(ground.group, ground.mask) {
                    if let Some(c) = contact::ground_contact(ha, a) {
                        self.contacts.push(c);
                    }
                }
            }

            for &hb in &handles[i + 1..] {
                let b = &self.bodies[&hb];
                if (a.is_static() && b.is_static()) || !a.accepts(b.group, b.mask) {
                    continue;
                }
                if let Some(c) = contact::pair_contact(ha, a, hb, b) {
                    self.contacts.push(c);
                }
            }
        }
    }

    /// Run `f` with mutable access to both sides of a contact.
    fn with_pair<F>(&mut self, c: &Contact, f: F)
    where
        F: FnOnce(Option<&mut RigidBody>, &mut RigidBody, Material),
    {
        let Some(mut b) = self.bodies.remove(&c.b) else {
            return;
        };
        let a = c.a.and_then(|handle| self.bodies.get_mut(&handle));
        f(a, &mut b, self.material);
        self.bodies.insert(c.b, b);
    }
}
