//! Achievements
//!
//! The simulation only decides *when* an achievement is earned. Where the
//! unlocked set lives is up to the injected [`AchievementStore`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sim::state::{GameEvent, RunState};

/// Logic ticks to survive after the pursuer wakes up
pub const SURVIVOR_TICKS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstStep,
    Sprinter,
    Marathon,
    Ouch,
    Survivor,
    Master,
}

impl Achievement {
    pub const ALL: [Achievement; 6] = [
        Achievement::FirstStep,
        Achievement::Sprinter,
        Achievement::Marathon,
        Achievement::Ouch,
        Achievement::Survivor,
        Achievement::Master,
    ];

    /// Stable identifier
    pub fn id(self) -> &'static str {
        match self {
            Achievement::FirstStep => "first_step",
            Achievement::Sprinter => "sprinter",
            Achievement::Marathon => "marathon",
            Achievement::Ouch => "ouch",
            Achievement::Survivor => "survivor",
            Achievement::Master => "master",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstStep => "First Step",
            Achievement::Sprinter => "Sprinter",
            Achievement::Marathon => "Marathon",
            Achievement::Ouch => "Ouch!",
            Achievement::Survivor => "Survivor",
            Achievement::Master => "Master Runner",
        }
    }

    /// Whether the run (and this tick's events) meets the unlock condition
    pub fn is_met(self, state: &RunState, events: &[GameEvent]) -> bool {
        match self {
            Achievement::FirstStep => state.score.distance > 0,
            Achievement::Sprinter => state.score.distance >= 100,
            Achievement::Marathon => state.score.distance >= 1000,
            Achievement::Ouch => events.contains(&GameEvent::Hit { shielded: false }),
            Achievement::Survivor => {
                !state.caught && state.ticks_since_awakened >= SURVIVOR_TICKS
            }
            Achievement::Master => state.score.total() > 5000,
        }
    }
}

/// Where unlocked achievements are kept
pub trait AchievementStore {
    fn is_unlocked(&self, achievement: Achievement) -> bool;

    /// Record an unlock; returns true if it was new
    fn unlock(&mut self, achievement: Achievement) -> bool;
}

/// In-memory, serializable achievement set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementBook {
    pub unlocked: BTreeSet<Achievement>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every unlock from another book
    pub fn merge(&mut self, other: &AchievementBook) {
        self.unlocked.extend(other.unlocked.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

impl AchievementStore for AchievementBook {
    fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    fn unlock(&mut self, achievement: Achievement) -> bool {
        let new = self.unlocked.insert(achievement);
        if new {
            log::info!("Achievement unlocked: {}", achievement.title());
        }
        new
    }
}

/// Store that keeps nothing (tests, replays)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAchievements;

impl AchievementStore for NoAchievements {
    fn is_unlocked(&self, _achievement: Achievement) -> bool {
        true
    }

    fn unlock(&mut self, _achievement: Achievement) -> bool {
        false
    }
}

/// Unlock everything newly earned this tick, in declaration order
pub fn evaluate(
    state: &RunState,
    events: &[GameEvent],
    store: &mut dyn AchievementStore,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    for achievement in Achievement::ALL {
        if store.is_unlocked(achievement) || !achievement.is_met(state, events) {
            continue;
        }
        if store.unlock(achievement) {
            unlocked.push(achievement);
        }
    }
    unlocked
}
