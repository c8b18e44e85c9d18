//! Lane Runner - a lane-based pseudo-3D runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (projection, track, motion, collisions, clock)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Capture/restore of a run with sanitizing on load
//! - `achievements`: Unlock rules and an injectable store

pub mod achievements;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use achievements::{Achievement, AchievementBook, AchievementStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Number of lanes on the road
    pub const LANES: u8 = 3;
    /// Lane the player starts in (middle)
    pub const PLAYER_START_LANE: u8 = 1;

    /// Rows occupied by the player sprite
    pub const PLAYER_HEIGHT: i32 = 3;
    /// Rows occupied by an obstacle sprite
    pub const OBSTACLE_HEIGHT: i32 = 3;

    /// Row of the horizon line; depth 0..=HORIZON_ROW is sky
    pub const HORIZON_ROW: i32 = 4;
    /// Depth new obstacles, items and scenery appear at
    pub const SPAWN_DEPTH: i32 = HORIZON_ROW + 1;

    /// Road width in columns at the horizon
    pub const ROAD_FAR_WIDTH: f32 = 9.0;
    /// Road width in columns at the bottom row
    pub const ROAD_NEAR_WIDTH: f32 = 54.0;
    /// Columns of horizontal shift at the horizon for curvature 1.0
    pub const CURVE_SCALE: f32 = 18.0;

    /// Jump length in logic ticks
    pub const JUMP_DURATION: u32 = 12;
    /// Slide length in logic ticks
    pub const SLIDE_DURATION: u32 = 10;
    /// Peak jump height in rows
    pub const JUMP_AMPLITUDE: f32 = 4.0;

    /// Hits the player can take
    pub const MAX_HEALTH: u8 = 3;
    /// Logic ticks of damage immunity after a hit
    pub const INVINCIBILITY_TICKS: u32 = 8;
    /// Max depth difference for an item pickup
    pub const ITEM_PICKUP_RANGE: i32 = 1;

    /// Rows the pursuer trails behind the player
    pub const PURSUER_LAG: i32 = 5;
    /// Shallowest depth the pursuer is ever placed at
    pub const PURSUER_MIN_DEPTH: i32 = HORIZON_ROW + 1;
    /// Logic ticks the pursuer stays on screen after a hit
    pub const PURSUER_VISIBLE_TICKS: u32 = 40;
    /// Wake-ups per pursuer animation frame
    pub const PURSUER_FRAME_INTERVAL: u32 = 3;

    /// Distance budget of a freshly generated segment
    pub const ROAD_SEGMENT_LENGTH: i32 = 300;
    /// Trailing part of a turn segment where turn input is evaluated
    pub const TURN_WINDOW_TOLERANCE: i32 = 60;
    /// Curvature target of a full curve
    pub const MAX_CURVATURE: f32 = 1.0;
    /// Turn segments bend harder than curves
    pub const TURN_CURVATURE_FACTOR: f32 = 1.5;
    /// Fraction of the remaining gap closed each logic tick
    pub const CURVATURE_SMOOTHING: f32 = 0.1;
    /// Gap under which curvature snaps to its target
    pub const CURVATURE_EPSILON: f32 = 0.01;

    /// Distance where the medium tier starts
    pub const MEDIUM_TIER_START: u32 = 2000;
    /// Distance where the hard tier starts
    pub const HARD_TIER_START: u32 = 5000;

    /// Distance units per score point
    pub const SCORE_PER_DISTANCE: u32 = 10;
    /// Bonus for an obstacle leaving the screen
    pub const SCORE_PER_OBSTACLE: u32 = 5;
    /// Bonus for a consumable item
    pub const SCORE_PER_ITEM: u32 = 20;
    /// Bonus for a completed turn
    pub const SCORE_PER_TURN: u32 = 25;

    /// Fastest scroll speed that can never skip an entity past the player
    pub const SPEED_LIMIT: i32 = 3;

    /// Wake-ups per logic tick (animation runs on every wake-up)
    pub const LOGIC_DIVISOR: u64 = 2;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
