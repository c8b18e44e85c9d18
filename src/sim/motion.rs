//! Entity motion: player actions, scrolling entities and the pursuer
//!
//! Depth grows toward the viewer. The player stands on a fixed row derived
//! from the viewport; everything else scrolls toward it.

use serde::{Deserialize, Serialize};

use super::projection::Viewport;
use super::road::Direction;
use crate::consts::*;

/// Wake-ups per full breathing cycle
pub const BREATH_CYCLE: u32 = 8;
/// Fraction of the gap closed by the drawn offset each wake-up
const POSE_SMOOTHING: f32 = 0.5;
/// Frames in the pursuer run cycle
pub const PURSUER_FRAMES: u32 = 4;

/// Player action state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Normal,
    /// Airborne; `timer` logic ticks left
    Jumping { timer: u32 },
    /// Ducking; `timer` logic ticks left
    Sliding { timer: u32 },
}

impl Action {
    /// Stable name used in save files
    pub fn name(self) -> &'static str {
        match self {
            Action::Normal => "NORMAL",
            Action::Jumping { .. } => "JUMPING",
            Action::Sliding { .. } => "SLIDING",
        }
    }

    /// Rebuild from a persisted name and timer
    ///
    /// Unknown names or a zero timer give `Normal`.
    pub fn from_parts(name: &str, timer: u32) -> Option<Self> {
        match name {
            "NORMAL" => Some(Action::Normal),
            "JUMPING" if timer > 0 => Some(Action::Jumping {
                timer: timer.min(JUMP_DURATION),
            }),
            "SLIDING" if timer > 0 => Some(Action::Sliding {
                timer: timer.min(SLIDE_DURATION),
            }),
            "JUMPING" | "SLIDING" => Some(Action::Normal),
            _ => None,
        }
    }

    pub fn timer(self) -> u32 {
        match self {
            Action::Normal => 0,
            Action::Jumping { timer } | Action::Sliding { timer } => timer,
        }
    }
}

/// Height of a jump `elapsed` logic ticks after takeoff
///
/// A parabola that is 0 at both ends and peaks at half the duration.
pub fn jump_offset(elapsed: u32) -> f32 {
    let p = (elapsed as f32 / JUMP_DURATION as f32).clamp(0.0, 1.0);
    JUMP_AMPLITUDE * 4.0 * p * (1.0 - p)
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub lane: u8,
    pub action: Action,
    pub health: u8,
    /// Logic ticks of damage immunity left
    pub invincibility: u32,
    /// One-shot protection against an obstacle hit
    pub shield: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            lane: PLAYER_START_LANE,
            action: Action::Normal,
            health: MAX_HEALTH,
            invincibility: 0,
            shield: false,
        }
    }

    /// Move to a lane; out-of-range requests are ignored
    pub fn move_to_lane(&mut self, lane: i32) {
        if (0..i32::from(LANES)).contains(&lane) {
            self.lane = lane as u8;
        }
    }

    /// Move one lane left or right (stops at the road edge)
    pub fn shift_lane(&mut self, dir: Direction) {
        let delta = match dir {
            Direction::Left => -1,
            Direction::Right => 1,
        };
        self.move_to_lane(i32::from(self.lane) + delta);
    }

    /// Start a jump (only from `Normal`)
    pub fn jump(&mut self) {
        if self.action == Action::Normal {
            self.action = Action::Jumping {
                timer: JUMP_DURATION,
            };
        }
    }

    /// Start a slide (only from `Normal`)
    pub fn slide(&mut self) {
        if self.action == Action::Normal {
            self.action = Action::Sliding {
                timer: SLIDE_DURATION,
            };
        }
    }

    /// Advance action and invincibility timers by one logic tick
    pub fn update(&mut self) {
        let finished = match &mut self.action {
            Action::Normal => false,
            Action::Jumping { timer } | Action::Sliding { timer } => {
                *timer = timer.saturating_sub(1);
                *timer == 0
            }
        };
        if finished {
            self.action = Action::Normal;
        }
        self.invincibility = self.invincibility.saturating_sub(1);
    }

    /// Logic ticks since takeoff, if jumping
    pub fn jump_elapsed(&self) -> Option<u32> {
        match self.action {
            Action::Jumping { timer } => Some(JUMP_DURATION.saturating_sub(timer)),
            Action::Normal | Action::Sliding { .. } => None,
        }
    }

    /// Rows above the ground (non-zero only while jumping)
    pub fn vertical_offset(&self) -> f32 {
        self.jump_elapsed().map_or(0.0, jump_offset)
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.action, Action::Jumping { .. })
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self.action, Action::Sliding { .. })
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0
    }

    /// Top row the player occupies; a slide lowers it by one
    ///
    /// Jumping does not move the row, only the drawn offset.
    pub fn row(&self, vp: &Viewport) -> i32 {
        if self.is_sliding() {
            vp.player_row() + 1
        } else {
            vp.player_row()
        }
    }

    /// Inclusive range of rows the player occupies
    pub fn span(&self, vp: &Viewport) -> (i32, i32) {
        (self.row(vp), vp.player_row() + PLAYER_HEIGHT - 1)
    }

    /// Lose one health and start invincibility; returns true when out of health
    pub fn take_hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.invincibility = INVINCIBILITY_TICKS;
        self.health == 0
    }
}

/// Per-wake-up presentation state of the player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the breathing cycle
    pub breath: u32,
    /// Drawn vertical offset, eased toward the physical one
    pub offset: f32,
}

impl Pose {
    pub fn animate(&mut self, target_offset: f32) {
        self.breath = (self.breath + 1) % BREATH_CYCLE;
        let gap = target_offset - self.offset;
        if gap.abs() < 0.05 {
            self.offset = target_offset;
        } else {
            self.offset += gap * POSE_SMOOTHING;
        }
    }

    /// 0 = exhale, 1 = inhale
    pub fn breathing_frame(&self) -> u32 {
        self.breath / (BREATH_CYCLE / 2)
    }
}

/// Chaser that trails the player at a fixed lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pursuer {
    pub depth: i32,
    pub lag: i32,
    /// Wake-ups counted toward the next run frame
    pub anim_tick: u32,
    pub frame: u32,
}

impl Default for Pursuer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pursuer {
    pub fn new() -> Self {
        Self {
            depth: PURSUER_MIN_DEPTH,
            lag: PURSUER_LAG,
            anim_tick: 0,
            frame: 0,
        }
    }

    /// Depth the pursuer is heading for
    pub fn target(&self, player_depth: i32) -> i32 {
        (player_depth - self.lag).max(PURSUER_MIN_DEPTH)
    }

    /// Move toward the target by at most `speed` rows, from either side
    pub fn update(&mut self, player_depth: i32, speed: i32) {
        let target = self.target(player_depth);
        let step = speed.max(0);
        if self.depth < target {
            self.depth = self.depth.saturating_add(step).min(target);
        } else {
            self.depth = self.depth.saturating_sub(step).max(target);
        }
    }

    /// Advance the run cycle (called every wake-up)
    pub fn animate(&mut self) {
        self.anim_tick += 1;
        if self.anim_tick >= PURSUER_FRAME_INTERVAL {
            self.anim_tick = 0;
            self.frame = (self.frame + 1) % PURSUER_FRAMES;
        }
    }
}

/// Which action, if any, gets the player past an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightClass {
    /// Jump over it
    Low,
    /// Slide under it
    High,
    /// Only a lane change helps
    Full,
}

impl HeightClass {
    /// Classes produced by the spawn policy, indexed by the type roll
    pub const SPAWNED: [HeightClass; 2] = [HeightClass::Low, HeightClass::High];

    pub fn name(self) -> &'static str {
        match self {
            HeightClass::Low => "LOW",
            HeightClass::High => "HIGH",
            HeightClass::Full => "FULL",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LOW" => Some(HeightClass::Low),
            "HIGH" => Some(HeightClass::High),
            "FULL" => Some(HeightClass::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub lane: u8,
    pub depth: i32,
    pub height: HeightClass,
}

impl Obstacle {
    pub fn new(lane: u8, height: HeightClass) -> Self {
        Self {
            lane,
            depth: SPAWN_DEPTH,
            height,
        }
    }

    /// Inclusive range of rows the obstacle occupies
    pub fn span(&self) -> (i32, i32) {
        (self.depth, self.depth + OBSTACLE_HEIGHT - 1)
    }
}

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Score bonus
    Consumable,
    /// Absorbs the next obstacle hit
    Shield,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Consumable => "CONSUMABLE",
            ItemKind::Shield => "SHIELD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CONSUMABLE" => Some(ItemKind::Consumable),
            "SHIELD" => Some(ItemKind::Shield),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub lane: u8,
    pub depth: i32,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(lane: u8, kind: ItemKind) -> Self {
        Self {
            lane,
            depth: SPAWN_DEPTH,
            kind,
        }
    }
}

/// Roadside decoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub side: Direction,
    pub depth: i32,
}

impl Scenery {
    pub fn new(side: Direction) -> Self {
        Self {
            side,
            depth: SPAWN_DEPTH,
        }
    }
}

/// Entities that move toward the viewer at the run speed
pub trait Scrolling {
    fn depth(&self) -> i32;
    fn depth_mut(&mut self) -> &mut i32;

    fn advance(&mut self, speed: i32) {
        let depth = self.depth_mut();
        *depth = depth.saturating_add(speed);
    }

    fn off_screen(&self, bound: i32) -> bool {
        self.depth() > bound
    }
}

macro_rules! impl_scrolling {
    ($($ty:ty),*) => {
        $(impl Scrolling for $ty {
            fn depth(&self) -> i32 {
                self.depth
            }

            fn depth_mut(&mut self) -> &mut i32 {
                &mut self.depth
            }
        })*
    };
}

impl_scrolling!(Obstacle, Item, Scenery);

pub fn advance_all<T: Scrolling>(entities: &mut [T], speed: i32) {
    for entity in entities {
        entity.advance(speed);
    }
}

/// Drop entities past the depth bound; returns how many were removed
pub fn sweep<T: Scrolling>(entities: &mut Vec<T>, bound: i32) -> usize {
    let before = entities.len();
    entities.retain(|e| !e.off_screen(bound));
    before - entities.len()
}
