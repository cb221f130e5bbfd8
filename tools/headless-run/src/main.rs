//! headless-run: drive a tower-defense session without a renderer.
//!
//! Usage:
//!   headless-run --seed 7 --secs 120
//!   headless-run --tuning tuning.json --minions 4 --snapshot final.json

use std::path::{Path, PathBuf};
use std::process;

use spire_sim::core::commands::PlayerCommand;
use spire_sim::core::enums::SessionPhase;
use spire_sim::core::events::SimEvent;
use spire_sim::core::tuning::Tuning;
use spire_sim::{SimConfig, SimulationEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Frame lengths the driver cycles through, so the fixed-step
/// accumulator sees both short and long frames.
const FRAME_PATTERN: [f64; 5] = [1.0 / 60.0, 1.0 / 144.0, 1.0 / 30.0, 1.0 / 60.0, 0.05];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let seed = parse_value::<u64>(&args, "--seed").unwrap_or(42);
    let secs = parse_value::<f64>(&args, "--secs").unwrap_or(60.0);
    let minions = parse_value::<usize>(&args, "--minions");
    let snapshot_path = parse_value::<PathBuf>(&args, "--snapshot");

    let tuning = match parse_value::<PathBuf>(&args, "--tuning") {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };

    let mut engine = match SimulationEngine::new(SimConfig { seed, tuning }) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if let Some(count) = minions {
        engine.queue_command(PlayerCommand::SetMinionCount { count });
    }

    info!(seed, secs, "headless run starting");

    let mut wall = 0.0;
    let mut frame = 0usize;
    let mut kills = 0u32;
    let mut shots = 0usize;
    // Zero-length frame: applies queued commands without stepping.
    let mut snapshot = engine.advance_frame(0.0);
    while wall < secs {
        let frame_secs = FRAME_PATTERN[frame % FRAME_PATTERN.len()];
        snapshot = engine.advance_frame(frame_secs);
        wall += frame_secs;
        frame += 1;

        for event in &snapshot.events {
            match event {
                SimEvent::AttackFired { .. } => shots += 1,
                SimEvent::EnemyKilled { .. } => kills += 1,
                SimEvent::WaveCleared { number } => info!(number, "wave cleared"),
                SimEvent::TowerDestroyed => warn!(tick = snapshot.time.tick, "tower destroyed"),
                _ => {}
            }
        }
        if snapshot.phase == SessionPhase::Defeated {
            break;
        }
    }

    info!(
        ticks = snapshot.time.tick,
        frames = frame,
        wave = snapshot.wave.number,
        kills = snapshot.wave.kills,
        kill_events = kills,
        shots,
        tower_hp = snapshot.tower.hp,
        phase = ?snapshot.phase,
        "headless run finished"
    );

    if let Some(path) = snapshot_path {
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            eprintln!("Error writing {}: {e}", path.display());
            process::exit(1);
        }
        info!(path = %path.display(), "final snapshot written");
    }
}

fn print_usage() {
    eprintln!(
        "headless-run: run a tower-defense session with no renderer\n\
         \n\
           --seed <N>         RNG seed (default: 42)\n\
           --secs <S>         Wall-clock seconds to simulate (default: 60)\n\
           --tuning <path>    JSON tuning table (default: built-in)\n\
           --minions <N>      Minion roster size\n\
           --snapshot <path>  Write the final snapshot as JSON\n\
         \n\
         Log level follows RUST_LOG (default: info).\n"
    );
}

fn parse_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn load_tuning(path: &Path) -> Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => tuning,
        Err(e) => {
            eprintln!("Error in {}: {e}", path.display());
            process::exit(1);
        }
    }
}
