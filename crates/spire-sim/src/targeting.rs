//! Target selection over the living enemies.
//!
//! Every selector works on a `Candidate` list gathered once per use so the
//! choice does not depend on hecs archetype iteration order. Candidates are
//! sorted by id; ties go to the earliest-spawned enemy.

use glam::DVec3;
use hecs::{Entity, World};

use spire_core::components::Enemy;
use spire_core::tuning::TargetingTuning;
use spire_core::types::{EntityId, Planar};
use spire_physics::{BodyHandle, PhysicsWorld};

/// A living enemy as seen by an attack.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub id: EntityId,
    pub body: BodyHandle,
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Gather every living enemy, ordered by id.
pub fn living_enemies(world: &World, physics: &PhysicsWorld) -> Vec<Candidate> {
    let mut query = world.query::<(&EntityId, &Enemy, &BodyHandle)>();
    let mut living: Vec<Candidate> = query
        .iter()
        .filter(|(_, (_, enemy, _))| enemy.alive)
        .filter_map(|(entity, (id, _, handle))| {
            let body = physics.get(*handle)?;
            Some(Candidate {
                entity,
                id: *id,
                body: *handle,
                position: body.position,
                velocity: body.velocity,
            })
        })
        .collect();
    living.sort_by_key(|c| c.id);
    living
}

/// Closest candidate to `from` on the ground plane.
pub fn nearest(candidates: &[Candidate], from: DVec3) -> Option<&Candidate> {
    best_by(candidates, |c| from.horizontal_distance_squared(c.position))
}

/// Closest candidate to `from` in full 3D.
pub fn nearest_3d(candidates: &[Candidate], from: DVec3) -> Option<&Candidate> {
    best_by(candidates, |c| from.distance_squared(c.position))
}

/// Farthest candidate from `from` on the ground plane.
pub fn farthest(candidates: &[Candidate], from: DVec3) -> Option<&Candidate> {
    best_by(candidates, |c| -from.horizontal_distance_squared(c.position))
}

/// The enemy whose neighbourhood is most crowded, nudged toward closer ones.
///
/// Score is `neighbours * neighbor_weight - distance * distance_weight`, where
/// neighbours are other living enemies within `cluster_radius` on the ground
/// plane. With `cluster_min_enemies` or fewer alive, this is just `nearest`.
pub fn cluster_biased<'a>(
    candidates: &'a [Candidate],
    from: DVec3,
    tuning: &TargetingTuning,
) -> Option<&'a Candidate> {
    if candidates.len() <= tuning.cluster_min_enemies {
        return nearest(candidates, from);
    }

    let radius_sq = tuning.cluster_radius * tuning.cluster_radius;
    best_by(candidates, |c| {
        let neighbours = candidates
            .iter()
            .filter(|other| other.id != c.id)
            .filter(|other| c.position.horizontal_distance_squared(other.position) < radius_sq)
            .count();
        let score = neighbours as f64 * tuning.neighbor_weight
            - from.horizontal_distance(c.position) * tuning.distance_weight;
        -score
    })
}

/// Build a lightning chain of up to `count` links.
///
/// The first link is the candidate nearest `from`. Each further link is the
/// closest not-yet-chosen candidate strictly within `range` of the previous
/// link; the chain stops early when nothing is in range.
pub fn select_chain(
    candidates: &[Candidate],
    from: DVec3,
    count: usize,
    range: f64,
) -> Vec<Candidate> {
    let mut chain: Vec<Candidate> = Vec::with_capacity(count);
    let Some(first) = nearest(candidates, from) else {
        return chain;
    };
    if count == 0 {
        return chain;
    }
    chain.push(*first);

    let range_sq = range * range;
    while chain.len() < count {
        let Some(last) = chain.last().map(|c| c.position) else {
            break;
        };
        let next = candidates
            .iter()
            .filter(|c| !chain.iter().any(|linked| linked.id == c.id))
            .map(|c| (c, last.horizontal_distance_squared(c.position)))
            .filter(|(_, d)| *d < range_sq)
            .fold(None::<(&Candidate, f64)>, |best, (c, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((c, d)),
            });
        match next {
            Some((c, _)) => chain.push(*c),
            None => break,
        }
    }
    chain
}

/// Lowest-cost candidate, first one wins on ties.
fn best_by<F>(candidates: &[Candidate], mut cost: F) -> Option<&Candidate>
where
    F: FnMut(&Candidate) -> f64,
{
    let mut best: Option<(&Candidate, f64)> = None;
    for candidate in candidates {
        let c = cost(candidate);
        if best.map_or(true, |(_, best_cost)| c < best_cost) {
            best = Some((candidate, c));
        }
    }
    best.map(|(candidate, _)| candidate)
}
