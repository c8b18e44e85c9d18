//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logic advances in whole ticks only
//! - Every random draw goes through an injected `RandomSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod projection;
pub mod random;
pub mod road;
pub mod state;
pub mod tick;

pub use collision::{Impact, apply_impact, resolve, resolve_items};
pub use motion::{
    Action, HeightClass, Item, ItemKind, Obstacle, Player, Pose, Pursuer, Scenery, Scrolling,
    jump_offset,
};
pub use projection::Viewport;
pub use random::{RandomSource, seeded};
pub use road::{Direction, RoadSegment, RoadTrack, SegmentKind, Tier, TurnResult};
pub use state::{Biome, Cadence, GameEvent, RunPhase, RunState, Score, Snapshot};
pub use tick::{Command, SimulationClock, TickInput, autopilot};
