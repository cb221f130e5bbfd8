//! Narrow-phase contact generation and impulse resolution.

use glam::DVec3;

use crate::body::{BodyHandle, RigidBody};

/// A penetrating pair. `normal` points from `a` towards `b`.
/// `a == None` means the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: Option<BodyHandle>,
    pub b: BodyHandle,
    pub normal: DVec3,
    pub depth: f64,
}

/// Surface response shared by every contact.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub friction: f64,
    pub restitution: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.2,
        }
    }
}

/// Fraction of the remaining penetration removed per step.
const CORRECTION_PERCENT: f64 = 0.8;
/// Penetration tolerated without correction.
const CORRECTION_SLOP: f64 = 0.005;

/// Contact against the ground plane at y = 0, if any.
pub fn ground_contact(handle: BodyHandle, body: &RigidBody) -> Option<Contact> {
    let lowest = body.position.y - body.shape.bottom_extent();
    (lowest < 0.0).then_some(Contact {
        a: None,
        b: handle,
        normal: DVec3::Y,
        depth: -lowest,
    })
}

/// Contact between two bodies, if they overlap.
pub fn pair_contact(
    ha: BodyHandle,
    a: &RigidBody,
    hb: BodyHandle,
    b: &RigidBody,
) -> Option<Contact> {
    let (pa, pb) = closest_core_points(a, b);
    let reach = a.shape.radius() + b.shape.radius();
    let offset = pb - pa;
    let dist_sq = offset.length_squared();
    if dist_sq >= reach * reach {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-9 { offset / dist } else { DVec3::X };
    Some(Contact {
        a: Some(ha),
        b: hb,
        normal,
        depth: reach - dist,
    })
}

/// Closest points between the vertical core segments of two shapes.
fn closest_core_points(a: &RigidBody, b: &RigidBody) -> (DVec3, DVec3) {
    let ha = a.shape.half_segment();
    let hb = b.shape.half_segment();
    let (a_lo, a_hi) = (a.position.y - ha, a.position.y + ha);
    let (b_lo, b_hi) = (b.position.y - hb, b.position.y + hb);

    let (ya, yb) = if a_hi < b_lo {
        (a_hi, b_lo)
    } else if b_hi < a_lo {
        (a_lo, b_hi)
    } else {
        let y = (a_lo.max(b_lo) + a_hi.min(b_hi)) * 0.5;
        (y, y)
    };

    (
        DVec3::new(a.position.x, ya, a.position.z),
        DVec3::new(b.position.x, yb, b.position.z),
    )
}

/// Resolve the velocity part of one contact. Returns the normal impulse applied.
pub fn resolve_velocity(
    contact: &Contact,
    a: Option<&mut RigidBody>,
    b: &mut RigidBody,
    material: Material,
) -> f64 {
    let (va, inv_a) = a
        .as_ref()
        .map_or((DVec3::ZERO, 0.0), |body| (body.velocity, body.inv_mass()));
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return 0.0;
    }

    let n = contact.normal;
    let relative = b.velocity - va;
    let vn = relative.dot(n);
    if vn >= 0.0 {
        return 0.0;
    }

    let j = -(1.0 + material.restitution) * vn / inv_sum;
    let mut dva = -n * j * inv_a;
    let mut dvb = n * j * inv_b;

    // Coulomb friction on whatever tangential slip is left.
    let relative = (b.velocity + dvb) - (va + dva);
    let tangential = relative - n * relative.dot(n);
    let slip = tangential.length();
    if slip > 1e-9 {
        let t = tangential / slip;
        let jt = (slip / inv_sum).min(material.friction * j);
        dva += t * jt * inv_a;
        dvb -= t * jt * inv_b;
    }

    if let Some(body) = a {
        body.velocity += dva;
    }
    b.velocity += dvb;
    j
}

/// Push the pair apart along the normal, split by inverse mass.
pub fn resolve_position(contact: &Contact, a: Option<&mut RigidBody>, b: &mut RigidBody) {
    let inv_a = a.as_ref().map_or(0.0, |body| body.inv_mass());
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;
    let excess = contact.depth - CORRECTION_SLOP;
    if inv_sum == 0.0 || excess <= 0.0 {
        return;
    }

    let correction = contact.normal * (excess * CORRECTION_PERCENT / inv_sum);
    if let Some(body) = a {
        body.position -= correction * inv_a;
    }
    b.position += correction * inv_b;
}
