//! Procedural track generation
//!
//! The track is a sequence of segments, each with a curvature target and a
//! distance budget. Curvature eases toward the target every logic tick.
//! Turn segments additionally open a window near their end in which the
//! player has to steer in the right direction.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::consts::*;

/// Horizontal direction of a bend or a steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right (matches curvature sign)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// Map a raw steering input; anything but -1/1 means no input
    pub fn from_input(input: i32) -> Option<Self> {
        match input {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Segment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Straight,
    /// Gentle bend, no input required
    Curve(Direction),
    /// Hard turn the player must take inside the turn window
    Turn(Direction),
}

impl SegmentKind {
    pub fn is_turn(self) -> bool {
        matches!(self, SegmentKind::Turn(_))
    }

    /// Stable name used in save files
    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Straight => "STRAIGHT",
            SegmentKind::Curve(Direction::Left) => "CURVE_LEFT",
            SegmentKind::Curve(Direction::Right) => "CURVE_RIGHT",
            SegmentKind::Turn(Direction::Left) => "TURN_LEFT",
            SegmentKind::Turn(Direction::Right) => "TURN_RIGHT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "STRAIGHT" => Some(SegmentKind::Straight),
            "CURVE_LEFT" => Some(SegmentKind::Curve(Direction::Left)),
            "CURVE_RIGHT" => Some(SegmentKind::Curve(Direction::Right)),
            "TURN_LEFT" => Some(SegmentKind::Turn(Direction::Left)),
            "TURN_RIGHT" => Some(SegmentKind::Turn(Direction::Right)),
            _ => None,
        }
    }
}

/// Difficulty tier, driven by total distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    pub fn from_distance(distance: u32) -> Self {
        if distance < MEDIUM_TIER_START {
            Tier::Easy
        } else if distance < HARD_TIER_START {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }

    /// Segment weights out of 100, in roll order
    fn weights(self) -> &'static [(SegmentKind, u32)] {
        use Direction::*;
        use SegmentKind::*;
        match self {
            Tier::Easy => &[(Straight, 70), (Curve(Left), 15), (Curve(Right), 15)],
            Tier::Medium => &[
                (Straight, 50),
                (Curve(Left), 20),
                (Curve(Right), 20),
                (Turn(Left), 5),
                (Turn(Right), 5),
            ],
            Tier::Hard => &[
                (Straight, 30),
                (Curve(Left), 30),
                (Curve(Right), 30),
                (Turn(Left), 5),
                (Turn(Right), 5),
            ],
        }
    }

    /// Pick a segment kind for a roll in 0..100
    pub fn pick(self, roll: u32) -> SegmentKind {
        let mut acc = 0;
        for &(kind, weight) in self.weights() {
            acc += weight;
            if roll < acc {
                return kind;
            }
        }
        SegmentKind::Straight
    }
}

/// Outcome of a steering input against the active turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnResult {
    /// No active turn, outside the window, or no input
    None,
    /// Correct direction inside the window
    Success,
    /// Opposite direction inside the window (the turn stays open)
    WrongDirection,
}

/// A stretch of track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub kind: SegmentKind,
    pub curvature_target: f32,
    /// Distance left before the next segment is generated
    pub remaining: i32,
}

/// Track generator state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadTrack {
    segment: RoadSegment,
    current_curvature: f32,
    turn_active: bool,
    turn_completed: bool,
}

impl Default for RoadTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadTrack {
    pub fn new() -> Self {
        Self {
            segment: RoadSegment {
                kind: SegmentKind::Straight,
                curvature_target: 0.0,
                remaining: ROAD_SEGMENT_LENGTH,
            },
            current_curvature: 0.0,
            turn_active: false,
            turn_completed: false,
        }
    }

    /// Rebuild a track from persisted parts
    ///
    /// Turn flags are dropped for non-turn segments.
    pub fn from_parts(
        segment: RoadSegment,
        current_curvature: f32,
        turn_active: bool,
        turn_completed: bool,
    ) -> Self {
        let is_turn = segment.kind.is_turn();
        Self {
            segment,
            current_curvature,
            turn_active: turn_active && is_turn,
            turn_completed: turn_completed && is_turn,
        }
    }

    /// Advance the track by one logic tick
    ///
    /// Returns true when the segment that just ran out was a turn the
    /// player never took.
    pub fn update(
        &mut self,
        speed: i32,
        total_distance: u32,
        rng: &mut impl RandomSource,
    ) -> bool {
        self.segment.remaining -= speed;

        let gap = self.segment.curvature_target - self.current_curvature;
        if gap.abs() > CURVATURE_EPSILON {
            self.current_curvature += gap * CURVATURE_SMOOTHING;
        } else {
            self.current_curvature = self.segment.curvature_target;
        }

        if self.segment.remaining <= 0 {
            let missed = self.check_missed_turn();
            if missed {
                log::info!("Turn {:?} missed", self.segment.kind);
            }
            self.generate_next(total_distance, rng);
            return missed;
        }
        false
    }

    fn generate_next(&mut self, total_distance: u32, rng: &mut impl RandomSource) {
        let next = if self.segment.kind.is_turn() {
            SegmentKind::Straight
        } else {
            Tier::from_distance(total_distance).pick(rng.roll(100))
        };
        self.set_segment(next, total_distance);
        log::debug!(
            "Next segment {:?} (distance {}, length {})",
            next,
            total_distance,
            self.segment.remaining
        );
    }

    fn set_segment(&mut self, kind: SegmentKind, total_distance: u32) {
        let easy = Tier::from_distance(total_distance) == Tier::Easy;

        let (curvature_target, remaining) = match kind {
            SegmentKind::Straight => (0.0, ROAD_SEGMENT_LENGTH),
            SegmentKind::Curve(dir) if easy => {
                (dir.sign() * MAX_CURVATURE * 0.5, ROAD_SEGMENT_LENGTH / 2)
            }
            SegmentKind::Curve(dir) => (dir.sign() * MAX_CURVATURE, ROAD_SEGMENT_LENGTH),
            SegmentKind::Turn(dir) => (
                dir.sign() * MAX_CURVATURE * TURN_CURVATURE_FACTOR,
                ROAD_SEGMENT_LENGTH,
            ),
        };

        self.segment = RoadSegment {
            kind,
            curvature_target,
            remaining,
        };
        self.turn_active = kind.is_turn();
        self.turn_completed = false;
    }

    /// Evaluate a steering input (-1 left, 1 right, anything else none)
    pub fn check_turn(&mut self, input: i32) -> TurnResult {
        if !self.turn_active || self.turn_completed || !self.in_turn_window() {
            return TurnResult::None;
        }
        let Some(input) = Direction::from_input(input) else {
            return TurnResult::None;
        };

        match self.segment.kind {
            SegmentKind::Turn(required) if required == input => {
                self.complete_turn();
                TurnResult::Success
            }
            SegmentKind::Turn(_) => TurnResult::WrongDirection,
            SegmentKind::Straight | SegmentKind::Curve(_) => TurnResult::None,
        }
    }

    /// True when a turn is pending and its segment has run out
    pub fn check_missed_turn(&self) -> bool {
        self.turn_active && !self.turn_completed && self.segment.remaining <= 0
    }

    fn complete_turn(&mut self) {
        self.turn_completed = true;
        self.turn_active = false;
        self.current_curvature = 0.0;
        self.segment.curvature_target = 0.0;
        log::info!("Turn {:?} completed", self.segment.kind);
    }

    /// Replace the current segment as if in the hard tier (debug/testing)
    pub fn force_segment(&mut self, kind: SegmentKind) {
        self.set_segment(kind, HARD_TIER_START);
    }

    pub fn set_remaining(&mut self, remaining: i32) {
        self.segment.remaining = remaining;
    }

    /// Inside the trailing part of the segment where turns are evaluated
    pub fn in_turn_window(&self) -> bool {
        self.segment.remaining <= TURN_WINDOW_TOLERANCE
    }

    /// Direction of the turn currently waiting for input
    pub fn pending_turn(&self) -> Option<Direction> {
        match self.segment.kind {
            SegmentKind::Turn(dir) if self.turn_active && !self.turn_completed => Some(dir),
            _ => None,
        }
    }

    pub fn segment(&self) -> &RoadSegment {
        &self.segment
    }

    pub fn kind(&self) -> SegmentKind {
        self.segment.kind
    }

    pub fn remaining(&self) -> i32 {
        self.segment.remaining
    }

    pub fn current_curvature(&self) -> f32 {
        self.current_curvature
    }

    pub fn target_curvature(&self) -> f32 {
        self.segment.curvature_target
    }

    pub fn is_turn_active(&self) -> bool {
        self.turn_active
    }

    pub fn is_turn_completed(&self) -> bool {
        self.turn_completed
    }
}
