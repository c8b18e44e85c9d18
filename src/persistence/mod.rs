//! Save/restore of a run
//!
//! Features:
//! - Versioned JSON record with loosely typed fields
//! - Sanitizing on restore (bad lanes, unknown names, out-of-range timers)
//! - The random generator is saved with the run, so a restored run replays
//!   exactly like one that was never interrupted

use std::path::Path;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::motion::{
    Action, BREATH_CYCLE, HeightClass, Item, ItemKind, Obstacle, PURSUER_FRAMES, Player, Pose,
    Pursuer, Scenery,
};
use crate::sim::projection::Viewport;
use crate::sim::road::{Direction, RoadSegment, RoadTrack, SegmentKind};
use crate::sim::state::{Cadence, RunPhase, RunState, Score};
use crate::sim::tick::SimulationClock;
use crate::tuning::Tuning;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {0} (expected {})", SAVE_VERSION)]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub lane: i64,
    /// Drawn row including the jump offset (informational)
    pub y: i64,
    pub action: String,
    pub action_timer: i64,
    pub health: i64,
    pub invincibility: i64,
    pub shield: bool,
    #[serde(default)]
    pub breath: i64,
    #[serde(default)]
    pub drawn_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuerRecord {
    pub depth: i64,
    pub anim_tick: i64,
    #[serde(default)]
    pub frame: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub phase: String,
    pub speed: i64,
    pub hit_count: i64,
    pub pursuer_visible_ticks: i64,
    pub pursuer_awakened: bool,
    pub caught: bool,
    #[serde(default)]
    pub ticks_since_awakened: i64,
    #[serde(default)]
    pub logic_ticks: u64,
    #[serde(default)]
    pub wakeups: u64,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Total score at capture time (informational)
    pub score: i64,
    pub distance: i64,
    pub bonus: i64,
    pub combo: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRecord {
    pub segment: String,
    pub curvature_target: f32,
    pub remaining: i64,
    pub current_curvature: f32,
    pub turn_active: bool,
    pub turn_completed: bool,
}

/// Obstacle or item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub lane: i64,
    pub depth: i64,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneryRecord {
    /// Negative for the left side
    pub side: i64,
    pub depth: i64,
}

/// Everything needed to resume a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub seed: u64,
    pub player: PlayerRecord,
    pub pursuer: PursuerRecord,
    pub run: RunRecord,
    pub score: ScoreRecord,
    pub road: RoadRecord,
    pub obstacles: Vec<EntityRecord>,
    pub items: Vec<EntityRecord>,
    #[serde(default)]
    pub scenery: Vec<SceneryRecord>,
    pub rng: Pcg32,
}

fn phase_name(phase: RunPhase) -> &'static str {
    match phase {
        RunPhase::Playing => "PLAYING",
        RunPhase::Paused => "PAUSED",
        RunPhase::GameOver => "GAME_OVER",
    }
}

fn to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn to_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

/// Lane from a record, or `None` when out of range
fn valid_lane(lane: i64) -> Option<u8> {
    (0..i64::from(LANES)).contains(&lane).then_some(lane as u8)
}

fn clamped_lane(lane: i64) -> u8 {
    lane.clamp(0, i64::from(LANES) - 1) as u8
}

impl SaveGame {
    /// Record the full state of a running clock
    pub fn capture(clock: &SimulationClock<Pcg32>) -> Self {
        let state = &clock.state;
        let player = &state.player;
        let road = state.road.segment();

        let drawn_row = player.row(&state.viewport) - player.vertical_offset().round() as i32;

        SaveGame {
            version: SAVE_VERSION,
            seed: state.seed,
            player: PlayerRecord {
                lane: i64::from(player.lane),
                y: i64::from(drawn_row),
                action: player.action.name().to_string(),
                action_timer: i64::from(player.action.timer()),
                health: i64::from(player.health),
                invincibility: i64::from(player.invincibility),
                shield: player.shield,
                breath: i64::from(state.pose.breath),
                drawn_offset: state.pose.offset,
            },
            pursuer: PursuerRecord {
                depth: i64::from(state.pursuer.depth),
                anim_tick: i64::from(state.pursuer.anim_tick),
                frame: i64::from(state.pursuer.frame),
            },
            run: RunRecord {
                phase: phase_name(state.phase).to_string(),
                speed: i64::from(state.speed),
                hit_count: i64::from(state.hit_count),
                pursuer_visible_ticks: i64::from(state.pursuer_visible_ticks),
                pursuer_awakened: state.pursuer_awakened,
                caught: state.caught,
                ticks_since_awakened: i64::from(state.ticks_since_awakened),
                logic_ticks: state.logic_ticks,
                wakeups: state.cadence.wakeups,
                viewport: Some(state.viewport),
            },
            score: ScoreRecord {
                score: i64::from(state.score.total()),
                distance: i64::from(state.score.distance),
                bonus: i64::from(state.score.bonus),
                combo: i64::from(state.score.combo),
            },
            road: RoadRecord {
                segment: road.kind.name().to_string(),
                curvature_target: road.curvature_target,
                remaining: i64::from(road.remaining),
                current_curvature: state.road.current_curvature(),
                turn_active: state.road.is_turn_active(),
                turn_completed: state.road.is_turn_completed(),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| EntityRecord {
                    lane: i64::from(o.lane),
                    depth: i64::from(o.depth),
                    kind: o.height.name().to_string(),
                })
                .collect(),
            items: state
                .items
                .iter()
                .map(|i| EntityRecord {
                    lane: i64::from(i.lane),
                    depth: i64::from(i.depth),
                    kind: i.kind.name().to_string(),
                })
                .collect(),
            scenery: state
                .scenery
                .iter()
                .map(|s| SceneryRecord {
                    side: s.side.sign() as i64,
                    depth: i64::from(s.depth),
                })
                .collect(),
            rng: clock.rng().clone(),
        }
    }

    /// Rebuild a clock, replacing anything invalid with a safe default
    pub fn restore(self, tuning: Tuning) -> SimulationClock<Pcg32> {
        let tuning = tuning.sanitized();
        let caught = self.run.caught;

        let lane = valid_lane(self.player.lane).unwrap_or_else(|| {
            log::warn!("Saved lane {} out of range, using middle lane", self.player.lane);
            PLAYER_START_LANE
        });
        let timer = to_u32(self.player.action_timer);
        let action = Action::from_parts(&self.player.action, timer).unwrap_or_else(|| {
            log::warn!("Unknown saved action {:?}, using NORMAL", self.player.action);
            Action::Normal
        });
        let min_health = if caught { 0 } else { 1 };
        let player = Player {
            lane,
            action,
            health: self.player.health.clamp(min_health, i64::from(MAX_HEALTH)) as u8,
            invincibility: to_u32(self.player.invincibility).min(INVINCIBILITY_TICKS),
            shield: self.player.shield,
        };

        let viewport = self
            .run
            .viewport
            .filter(|vp| vp.width > 0 && vp.height > 0)
            .unwrap_or_default();
        // Anything deeper than this is swept on the next logic tick
        let max_depth = viewport.depth_bound() + 1;

        let pose = Pose {
            breath: to_u32(self.player.breath) % BREATH_CYCLE,
            offset: finite_or_zero(self.player.drawn_offset),
        };

        let pursuer = Pursuer {
            depth: to_i32(self.pursuer.depth).max(PURSUER_MIN_DEPTH),
            lag: PURSUER_LAG,
            anim_tick: to_u32(self.pursuer.anim_tick).min(PURSUER_FRAME_INTERVAL - 1),
            frame: to_u32(self.pursuer.frame) % PURSUER_FRAMES,
        };

        let max_target = MAX_CURVATURE * TURN_CURVATURE_FACTOR;
        let segment = match SegmentKind::from_name(&self.road.segment) {
            Some(kind) => RoadSegment {
                kind,
                curvature_target: finite_or_zero(self.road.curvature_target)
                    .clamp(-max_target, max_target),
                remaining: to_i32(self.road.remaining).min(ROAD_SEGMENT_LENGTH),
            },
            None => {
                log::warn!("Unknown saved segment {:?}, using STRAIGHT", self.road.segment);
                RoadSegment {
                    kind: SegmentKind::Straight,
                    curvature_target: 0.0,
                    remaining: ROAD_SEGMENT_LENGTH,
                }
            }
        };
        let road = RoadTrack::from_parts(
            segment,
            finite_or_zero(self.road.current_curvature).clamp(-max_target, max_target),
            self.road.turn_active,
            self.road.turn_completed,
        );

        let obstacles = self
            .obstacles
            .iter()
            .map(|o| Obstacle {
                lane: clamped_lane(o.lane),
                depth: to_i32(o.depth).clamp(0, max_depth),
                height: HeightClass::from_name(&o.kind).unwrap_or_else(|| {
                    log::warn!("Unknown saved obstacle kind {:?}, using LOW", o.kind);
                    HeightClass::Low
                }),
            })
            .collect();

        let items = self
            .items
            .iter()
            .map(|i| Item {
                lane: clamped_lane(i.lane),
                depth: to_i32(i.depth).clamp(0, max_depth),
                kind: ItemKind::from_name(&i.kind).unwrap_or_else(|| {
                    log::warn!("Unknown saved item kind {:?}, using CONSUMABLE", i.kind);
                    ItemKind::Consumable
                }),
            })
            .collect();

        let scenery = self
            .scenery
            .iter()
            .map(|s| Scenery {
                side: if s.side < 0 {
                    Direction::Left
                } else {
                    Direction::Right
                },
                depth: to_i32(s.depth).clamp(0, max_depth),
            })
            .collect();

        let phase = match self.run.phase.as_str() {
            _ if caught => RunPhase::GameOver,
            "PAUSED" => RunPhase::Paused,
            "PLAYING" => RunPhase::Playing,
            other => {
                log::warn!("Unknown saved phase {:?}, resuming play", other);
                RunPhase::Playing
            }
        };

        let state = RunState {
            seed: self.seed,
            phase,
            player,
            pose,
            pursuer,
            obstacles,
            items,
            scenery,
            road,
            score: Score {
                distance: to_u32(self.score.distance),
                bonus: to_u32(self.score.bonus),
                combo: to_u32(self.score.combo),
            },
            speed: tuning.clamp_speed(to_i32(self.run.speed)),
            hit_count: to_u32(self.run.hit_count),
            pursuer_visible_ticks: to_u32(self.run.pursuer_visible_ticks)
                .min(PURSUER_VISIBLE_TICKS),
            pursuer_awakened: self.run.pursuer_awakened,
            caught,
            ticks_since_awakened: to_u32(self.run.ticks_since_awakened),
            logic_ticks: self.run.logic_ticks,
            cadence: Cadence {
                wakeups: self.run.wakeups,
            },
            viewport,
        };

        log::info!(
            "Restored run (seed {}, distance {})",
            state.seed,
            state.score.distance
        );
        SimulationClock::from_parts(state, self.rng, tuning)
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let save: SaveGame = serde_json::from_str(json)?;
        if save.version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(save.version));
        }
        Ok(save)
    }

    pub fn write(&self, path: &Path) -> Result<(), SaveError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Run saved to {}", path.display());
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, SaveError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
