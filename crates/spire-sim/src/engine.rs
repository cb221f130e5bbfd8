//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the physics world,
//! processes player commands, runs all systems, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use spire_core::commands::PlayerCommand;
use spire_core::components::FadeHold;
use spire_core::enums::{AttackKind, SessionPhase};
use spire_core::events::SimEvent;
use spire_core::state::GameStateSnapshot;
use spire_core::tuning::{Tuning, TuningError};
use spire_core::types::{EntityId, IdAllocator, SimTime};
use spire_minion_ai::profiles::MinionProfile;
use spire_physics::{BodyHandle, PhysicsWorld};

use crate::clock::FixedStep;
use crate::systems;
use crate::systems::frost::FrostPulse;
use crate::systems::lightning::ChainArc;
use crate::tower::{TowerState, WaveState};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Balance table.
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: Tuning::default(),
        }
    }
}

/// Reasons an engine cannot be built.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    physics: PhysicsWorld,
    time: SimTime,
    phase: SessionPhase,
    seed: u64,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    tuning: Tuning,
    minion_profile: MinionProfile,
    clock: FixedStep,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<(Entity, BodyHandle)>,
    events: Vec<SimEvent>,

    // --- Session state ---
    tower: TowerState,
    wave: WaveState,
    arcs: Vec<ChainArc>,
    frost_pulses: Vec<FrostPulse>,
    minion_count: usize,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.tuning.validate()?;

        let tuning = config.tuning;
        let mut engine = Self {
            world: World::new(),
            physics: world_setup::physics_world(&tuning),
            time: SimTime::default(),
            phase: SessionPhase::default(),
            seed: config.seed,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ids: IdAllocator::new(),
            minion_profile: MinionProfile::from_tuning(&tuning.minion),
            clock: FixedStep::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            tower: TowerState::new(&tuning),
            wave: WaveState::opening(&tuning.wave),
            arcs: Vec::new(),
            frost_pulses: Vec::new(),
            minion_count: tuning.minion.count.min(tuning.minion.max_count),
            tuning,
        };
        engine.setup_session();
        Ok(engine)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();
        self.step();
        self.snapshot()
    }

    /// Feed one rendered frame's wall-clock duration through the fixed-step
    /// accumulator, run however many ticks it yields, and return the
    /// resulting snapshot.
    pub fn advance_frame(&mut self, frame_secs: f64) -> GameStateSnapshot {
        self.process_commands();
        let steps = self.clock.accumulate(frame_secs);
        for _ in 0..steps {
            self.step();
        }
        self.snapshot()
    }

    /// Run one fixed tick of the systems if the session is active.
    /// Queued commands are not consumed.
    pub fn step(&mut self) {
        if self.phase == SessionPhase::Active {
            self.run_systems();
            self.time.advance();
        }
    }

    /// Ask the sweep to keep a dead entity around while the renderer fades
    /// it out. Returns false if no such entity exists.
    pub fn hold_for_fade(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.find_entity(id) else {
            return false;
        };
        self.world.insert_one(entity, FadeHold).is_ok()
    }

    /// Release a fade hold; the entity is swept on the next tick if dead.
    pub fn release_fade(&mut self, id: EntityId) {
        if let Some(entity) = self.find_entity(id) {
            let _ = self.world.remove_one::<FadeHold>(entity);
        }
    }

    /// Get the current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the active balance table.
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn tower(&self) -> &TowerState {
        &self.tower
    }

    pub fn wave(&self) -> &WaveState {
        &self.wave
    }

    /// Desired minion roster size.
    pub fn minion_count(&self) -> usize {
        self.minion_count
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the physics world.
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Spawn a stationary-stat enemy at a fixed spot (for testing).
    #[cfg(test)]
    pub fn spawn_test_enemy(&mut self, position: glam::DVec3, hp: f64) -> EntityId {
        let id = world_setup::spawn_enemy_at(
            &mut self.world,
            &mut self.physics,
            &mut self.ids,
            &self.tuning.enemy,
            position,
            hp,
            self.tuning.enemy.speed_min,
            0.0,
        );
        self.wave.enemies_remaining += 1;
        id
    }

    /// Mutable access to session internals (for tests that poke at state).
    #[cfg(test)]
    pub fn test_parts(
        &mut self,
    ) -> (
        &mut World,
        &mut PhysicsWorld,
        &mut ChaCha8Rng,
        &mut TowerState,
        &mut WaveState,
    ) {
        (
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.tower,
            &mut self.wave,
        )
    }

    /// Build the world content for a fresh session.
    fn setup_session(&mut self) {
        self.tower.body = Some(world_setup::setup_arena(&mut self.physics, &self.tuning));
        if self.tower.is_enabled(AttackKind::Minions) {
            systems::minions::spawn_roster(
                &mut self.world,
                &mut self.physics,
                &mut self.rng,
                &mut self.ids,
                &self.tuning.minion,
                self.minion_count,
            );
        }
        info!(
            seed = self.seed,
            enemies = self.wave.enemies_total,
            "session started"
        );
        self.events.push(SimEvent::WaveStarted {
            number: self.wave.number,
            enemies_total: self.wave.enemies_total,
        });
    }

    /// Throw everything away and start again from wave 1 with the same seed.
    fn reset(&mut self) {
        self.world.clear();
        self.physics = world_setup::physics_world(&self.tuning);
        self.time = SimTime::default();
        self.phase = SessionPhase::Active;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.ids = IdAllocator::new();
        self.clock.reset();
        self.despawn_buffer.clear();
        self.events.clear();
        self.arcs.clear();
        self.frost_pulses.clear();

        // Loadout survives a reset.
        let loadout: Vec<(AttackKind, bool)> = self
            .tower
            .attacks
            .iter()
            .map(|(kind, attack)| (*kind, attack.enabled))
            .collect();
        self.tower = TowerState::new(&self.tuning);
        for (kind, enabled) in loadout {
            self.tower.set_enabled(kind, enabled);
        }
        self.wave = WaveState::opening(&self.tuning.wave);

        info!("session reset");
        self.setup_session();
    }

    /// Entity carrying the given id, if any.
    fn find_entity(&self, id: EntityId) -> Option<Entity> {
        self.world
            .query::<&EntityId>()
            .iter()
            .find(|(_, entity_id)| **entity_id == id)
            .map(|(entity, _)| entity)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetAttackEnabled { kind, enabled } => {
                let was_enabled = self.tower.is_enabled(kind);
                self.tower.set_enabled(kind, enabled);
                debug!(?kind, enabled, "attack toggled");

                if kind == AttackKind::Minions && was_enabled != enabled {
                    if enabled {
                        self.sync_minions();
                    } else {
                        systems::minions::despawn_all(&mut self.world, &mut self.physics);
                        debug!("minions despawned");
                    }
                }
            }
            PlayerCommand::SetMinionCount { count } => {
                self.minion_count = count.min(self.tuning.minion.max_count);
                if self.tower.is_enabled(AttackKind::Minions) {
                    self.sync_minions();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == SessionPhase::Active {
                    self.phase = SessionPhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == SessionPhase::Paused {
                    self.phase = SessionPhase::Active;
                }
            }
            PlayerCommand::Reset => self.reset(),
        }
    }

    /// Bring the minion roster up or down to `minion_count`.
    fn sync_minions(&mut self) {
        let current = systems::minions::count(&self.world);
        if current < self.minion_count {
            systems::minions::spawn_roster(
                &mut self.world,
                &mut self.physics,
                &mut self.rng,
                &mut self.ids,
                &self.tuning.minion,
                self.minion_count - current,
            );
        } else if current > self.minion_count {
            systems::minions::despawn_newest(
                &mut self.world,
                &mut self.physics,
                current - self.minion_count,
            );
        }
    }

    /// Drain pending events into a fresh snapshot.
    fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.physics,
            &self.time,
            self.phase,
            &self.tower,
            &self.wave,
            &self.arcs,
            &self.frost_pulses,
            events,
        )
    }

    /// Run all systems in order for one tick.
    fn run_systems(&mut self) {
        let dt = self.time.dt();

        // 1. Wave director
        systems::wave_director::run(
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.ids,
            &mut self.wave,
            &self.tuning,
            &mut self.events,
            dt,
        );

        // 2. Enemy AI (locomotion, melee on the tower)
        systems::enemy_ai::run(
            &mut self.world,
            &mut self.physics,
            &mut self.tower,
            &self.tuning.enemy,
            &mut self.events,
            dt,
        );
        if self.tower.is_destroyed() {
            self.phase = SessionPhase::Defeated;
            info!(
                wave = self.wave.number,
                kills = self.wave.kills,
                tick = self.time.tick,
                "tower destroyed"
            );
            self.events.push(SimEvent::TowerDestroyed);
            return;
        }

        // 3. Fire control (projectile spawns, lightning, frost)
        systems::fire_control::run(
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.ids,
            &mut self.tower,
            &mut self.wave,
            &mut self.arcs,
            &mut self.frost_pulses,
            &self.tuning,
            &mut self.events,
            dt,
        );

        // 4. Minions
        systems::minions::run(
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.wave,
            &self.tuning.minion,
            &self.tuning.death,
            &self.minion_profile,
            &mut self.events,
            dt,
        );

        // 5. Homing steering
        systems::projectiles::steer_homing(
            &mut self.world,
            &mut self.physics,
            &self.tuning.arcane,
            self.tuning.physics.gravity,
        );

        // 6. Projectile aging
        systems::projectiles::age(&mut self.world, dt);

        // 7. Hit resolution (integrated projectiles only)
        systems::damage::resolve_projectile_hits(
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.wave,
            &self.tuning,
            &mut self.events,
        );

        // 8. Physics step
        self.physics.step(dt);
        systems::projectiles::mark_integrated(&mut self.world);

        // 9. Visual effect aging
        systems::lightning::age_arcs(&mut self.arcs, dt);
        systems::frost::age_pulses(&mut self.frost_pulses, dt);

        // 10. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.physics, &mut self.despawn_buffer);
    }
}
