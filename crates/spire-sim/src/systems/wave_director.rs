//! Wave director: spawns enemies on a ramping cadence, detects wave
//! clears, and runs the reprieve between waves.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use spire_core::components::Enemy;
use spire_core::events::SimEvent;
use spire_core::tuning::Tuning;
use spire_core::types::IdAllocator;
use spire_physics::PhysicsWorld;

use crate::tower::WaveState;
use crate::world_setup;

/// Advance the wave director by `dt`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut ChaCha8Rng,
    ids: &mut IdAllocator,
    wave: &mut WaveState,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
    dt: f64,
) {
    if wave.in_reprieve {
        wave.reprieve_timer -= dt;
        if wave.reprieve_timer <= 0.0 {
            wave.in_reprieve = false;
            wave.reprieve_timer = 0.0;
            start_next_wave(wave, tuning, events);
        }
        return;
    }

    if wave.enemies_spawned < wave.enemies_total {
        wave.spawn_timer -= dt;
        if wave.spawn_timer <= 0.0 {
            let (id, position) = world_setup::spawn_enemy(
                world,
                physics,
                rng,
                ids,
                &tuning.enemy,
                wave.number,
            );
            wave.enemies_spawned += 1;
            wave.enemies_remaining += 1;
            wave.spawn_timer = tuning.wave.next_spawn_delay(
                wave.spawn_interval,
                wave.enemies_spawned,
                wave.enemies_total,
            );
            debug!(
                ?id,
                wave = wave.number,
                spawned = wave.enemies_spawned,
                total = wave.enemies_total,
                "enemy spawned"
            );
            events.push(SimEvent::EnemySpawned { id, position });
        }
    }

    if wave.enemies_spawned >= wave.enemies_total && living_count(world) == 0 {
        wave.in_reprieve = true;
        wave.reprieve_timer = tuning.wave.reprieve_secs;
        info!(wave = wave.number, kills = wave.kills, "wave cleared");
        events.push(SimEvent::WaveCleared {
            number: wave.number,
        });
    }
}

/// Roll the director over to the next wave.
pub fn start_next_wave(wave: &mut WaveState, tuning: &Tuning, events: &mut Vec<SimEvent>) {
    wave.number += 1;
    wave.enemies_spawned = 0;
    wave.enemies_remaining = 0;
    wave.enemies_total = tuning.wave.enemies_total(wave.number);
    wave.spawn_interval = tuning.wave.spawn_interval(wave.number);
    wave.spawn_timer = 0.0;

    info!(
        wave = wave.number,
        enemies = wave.enemies_total,
        interval = wave.spawn_interval,
        "wave started"
    );
    events.push(SimEvent::WaveStarted {
        number: wave.number,
        enemies_total: wave.enemies_total,
    });
}

fn living_count(world: &World) -> usize {
    world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| enemy.alive)
        .count()
}
