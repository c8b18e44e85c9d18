//! Run state and core simulation types
//!
//! Everything that must survive a save/restore for deterministic replay
//! lives in [`RunState`].

use serde::{Deserialize, Serialize};

use super::motion::{Item, ItemKind, Obstacle, Player, Pose, Pursuer, Scenery};
use super::projection::Viewport;
use super::road::{RoadTrack, SegmentKind};
use crate::achievements::Achievement;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    Paused,
    /// Caught by the pursuer
    GameOver,
}

/// Discrete outcomes of a logic tick, for presentation collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Obstacle collision or turn penalty; `shielded` when the shield took it
    Hit { shielded: bool },
    TurnSuccess,
    /// Wrong direction inside the window, or `missed` when the window closed
    TurnFail { missed: bool },
    ItemCollected(ItemKind),
    GameOver,
    AchievementUnlocked(Achievement),
}

/// Distance, bonus points and obstacle combo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Total distance travelled; never decreases during a run
    pub distance: u32,
    pub bonus: u32,
    /// Obstacles passed since the last hit
    pub combo: u32,
}

impl Score {
    pub fn advance(&mut self, speed: i32) {
        self.distance = self.distance.saturating_add(speed.max(0) as u32);
    }

    /// An obstacle scrolled past without hitting the player
    pub fn obstacle_cleared(&mut self) {
        self.combo = self.combo.saturating_add(1);
        let streak = if self.combo > 5 { self.combo / 5 } else { 0 };
        self.add_bonus(SCORE_PER_OBSTACLE + streak);
    }

    pub fn add_bonus(&mut self, points: u32) {
        self.bonus = self.bonus.saturating_add(points);
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    pub fn total(&self) -> u32 {
        (self.distance / SCORE_PER_DISTANCE).saturating_add(self.bonus)
    }
}

/// Visual theme, driven by distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Forest,
    Desert,
    Neon,
}

impl Biome {
    pub fn from_distance(distance: u32) -> Self {
        if distance < 1000 {
            Biome::Forest
        } else if distance < 2000 {
            Biome::Desert
        } else {
            Biome::Neon
        }
    }
}

/// Splits scheduler wake-ups into animation and logic phases
///
/// Animation runs on every wake-up; logic runs on every
/// `LOGIC_DIVISOR`-th wake-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub wakeups: u64,
}

impl Cadence {
    /// Count a wake-up; returns true when logic is due
    pub fn wake(&mut self) -> bool {
        self.wakeups = self.wakeups.wrapping_add(1);
        self.wakeups % LOGIC_DIVISOR == 0
    }
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: RunPhase,
    pub player: Player,
    pub pose: Pose,
    pub pursuer: Pursuer,
    /// Spawn order is kept; collision checks scan in this order
    pub obstacles: Vec<Obstacle>,
    pub items: Vec<Item>,
    pub scenery: Vec<Scenery>,
    pub road: RoadTrack,
    pub score: Score,
    pub speed: i32,
    pub hit_count: u32,
    /// Logic ticks the pursuer remains on screen
    pub pursuer_visible_ticks: u32,
    /// Set by the first hit; the pursuer closes in from then on
    pub pursuer_awakened: bool,
    pub caught: bool,
    /// Logic ticks survived since the pursuer woke up
    pub ticks_since_awakened: u32,
    /// Logic tick counter
    pub logic_ticks: u64,
    pub cadence: Cadence,
    /// Viewport seen by the last logic tick
    pub viewport: Viewport,
}

impl RunState {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            phase: RunPhase::Playing,
            player: Player::new(),
            pose: Pose::default(),
            pursuer: Pursuer::new(),
            obstacles: Vec::new(),
            items: Vec::new(),
            scenery: Vec::new(),
            road: RoadTrack::new(),
            score: Score::default(),
            speed: tuning.base_speed,
            hit_count: 0,
            pursuer_visible_ticks: 0,
            pursuer_awakened: false,
            caught: false,
            ticks_since_awakened: 0,
            logic_ticks: 0,
            cadence: Cadence::default(),
            viewport: Viewport::default(),
        }
    }

    pub fn pursuer_visible(&self) -> bool {
        self.pursuer_visible_ticks > 0
    }

    /// Book an unshielded hit the player already took
    pub fn record_hit(&mut self, fatal: bool, events: &mut Vec<GameEvent>) {
        self.hit_count = self.hit_count.saturating_add(1);
        self.score.reset_combo();
        self.pursuer_awakened = true;
        self.pursuer_visible_ticks = PURSUER_VISIBLE_TICKS;
        events.push(GameEvent::Hit { shielded: false });
        log::info!(
            "Hit #{} (health {})",
            self.hit_count,
            self.player.health
        );

        if fatal {
            self.caught = true;
            self.phase = RunPhase::GameOver;
            events.push(GameEvent::GameOver);
            log::info!(
                "Caught after {} distance, score {}",
                self.score.distance,
                self.score.total()
            );
        }
    }

    /// Damage that no shield can absorb (turn penalties)
    pub fn penalize(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.is_invincible() {
            return;
        }
        let fatal = self.player.take_hit();
        self.record_hit(fatal, events);
    }

    /// Read-only view for presentation collaborators
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            player: &self.player,
            player_offset: self.pose.offset,
            breathing_frame: self.pose.breathing_frame(),
            pursuer_depth: self.pursuer.depth,
            pursuer_frame: self.pursuer.frame,
            pursuer_visible: self.pursuer_visible(),
            obstacles: &self.obstacles,
            items: &self.items,
            scenery: &self.scenery,
            segment: self.road.kind(),
            remaining: self.road.remaining(),
            curvature: self.road.current_curvature(),
            distance: self.score.distance,
            speed: self.speed,
            score: self.score.total(),
            biome: Biome::from_distance(self.score.distance),
        }
    }
}

/// Per-tick view of a run
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: RunPhase,
    pub player: &'a Player,
    /// Smoothed vertical offset to draw the player at
    pub player_offset: f32,
    pub breathing_frame: u32,
    pub pursuer_depth: i32,
    pub pursuer_frame: u32,
    pub pursuer_visible: bool,
    pub obstacles: &'a [Obstacle],
    pub items: &'a [Item],
    pub scenery: &'a [Scenery],
    pub segment: SegmentKind,
    pub remaining: i32,
    pub curvature: f32,
    pub distance: u32,
    pub speed: i32,
    pub score: u32,
    pub biome: Biome,
}
