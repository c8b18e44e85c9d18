//! Headless driver: runs a seeded run on the autopilot and logs its events

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use lane_runner::persistence::SaveGame;
use lane_runner::sim::{GameEvent, RunPhase, SimulationClock, TickInput, Viewport};
use lane_runner::{AchievementBook, Tuning};

/// A lane-based pseudo-3D runner, played by the autopilot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Scheduler wake-ups to run (logic runs on every other one)
    #[arg(long, default_value_t = 2000)]
    wakeups: u64,
    /// Viewport width in cells
    #[arg(long, default_value_t = 80)]
    width: u16,
    /// Viewport height in cells
    #[arg(long, default_value_t = 30)]
    height: u16,
    /// Balance file (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Resume from a save file
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Write a save file when the run stops
    #[arg(long)]
    save: Option<PathBuf>,
    /// Unlocked achievements file (read and updated)
    #[arg(long)]
    achievements: Option<PathBuf>,
    /// Sleep between wake-ups like an interactive host
    #[arg(long)]
    realtime: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_achievements(path: &Path) -> AchievementBook {
    let Ok(json) = std::fs::read_to_string(path) else {
        return AchievementBook::new();
    };
    match serde_json::from_str(&json) {
        Ok(book) => book,
        Err(e) => {
            log::warn!("Ignoring bad achievements file {}: {}", path.display(), e);
            AchievementBook::new()
        }
    }
}

fn store_achievements(path: &Path, book: &AchievementBook) {
    let mut merged = load_achievements(path);
    merged.merge(book);
    match serde_json::to_string_pretty(&merged) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::warn!("Cannot write {}: {}", path.display(), e);
            }
        }
        Err(e) => log::warn!("Cannot encode achievements: {}", e),
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::Hit { shielded: true } => log::info!("Shield took the hit"),
        GameEvent::Hit { shielded: false } => log::info!("Ouch!"),
        GameEvent::TurnSuccess => log::info!("Turn taken"),
        GameEvent::TurnFail { missed: true } => log::info!("Turn missed"),
        GameEvent::TurnFail { missed: false } => log::info!("Turned the wrong way"),
        GameEvent::ItemCollected(kind) => log::info!("Picked up {}", kind.name()),
        GameEvent::GameOver => log::info!("Caught!"),
        GameEvent::AchievementUnlocked(a) => log::info!("Achievement: {}", a.title()),
    }
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tuning = args
        .tuning
        .as_deref()
        .map(Tuning::load)
        .unwrap_or_default();

    let mut clock = match args.resume.as_deref().map(SaveGame::read) {
        Some(Ok(save)) => save.restore(tuning),
        Some(Err(e)) => {
            log::error!("Cannot resume: {}", e);
            std::process::exit(1);
        }
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            log::info!("Lane Runner starting with seed: {}", seed);
            SimulationClock::new(seed, tuning)
        }
    };

    let mut book = args
        .achievements
        .as_deref()
        .map(load_achievements)
        .unwrap_or_default();

    let vp = Viewport::new(args.width.max(8), args.height.max(8));
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let interval = Duration::from_millis(clock.tuning().wakeup_interval_ms);

    for _ in 0..args.wakeups {
        if let Some(events) = clock.wake(&input, vp, &mut book) {
            events.iter().for_each(report);
        }
        if clock.state.phase == RunPhase::GameOver {
            break;
        }
        if args.realtime {
            std::thread::sleep(interval);
        }
    }

    let snap = clock.snapshot();
    println!(
        "distance {}  score {}  speed {}  health {}  hits {}  biome {:?}",
        snap.distance,
        snap.score,
        snap.speed,
        snap.player.health,
        clock.state.hit_count,
        snap.biome
    );

    if let Some(path) = args.save.as_deref() {
        if let Err(e) = SaveGame::capture(&clock).write(path) {
            log::error!("Cannot save: {}", e);
        }
    }
    if let Some(path) = args.achievements.as_deref() {
        store_achievements(path, &book);
    }
}
