//! Game balance values
//!
//! Loaded from JSON so balance can change without a rebuild. Missing fields
//! fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SPEED_LIMIT;

/// Data-driven balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    /// Scroll speed at the start of a run
    pub base_speed: i32,
    /// Scroll speed ceiling
    pub max_speed: i32,
    /// Score needed per +1 speed
    pub speed_increase_interval: u32,

    // === Spawning ===
    /// An obstacle spawns when `roll(rate) < speed` (0 disables obstacles)
    pub obstacle_spawn_rate: u32,
    /// Chance per logic tick of an item, in percent
    pub item_spawn_percent: u32,
    /// Share of items that are shields, in percent
    pub shield_percent: u32,
    /// Chance per logic tick of a scenery piece, in percent
    pub scenery_spawn_percent: u32,

    // === Timing ===
    /// Delay between scheduler wake-ups
    pub wakeup_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 1,
            max_speed: 3,
            speed_increase_interval: 50,

            obstacle_spawn_rate: 10,
            item_spawn_percent: 4,
            shield_percent: 25,
            scenery_spawn_percent: 30,

            wakeup_interval_ms: 100,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (partial documents are fine)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Self::sanitized)
    }

    /// Load tuning from a file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning in {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp every value into its playable range
    pub fn sanitized(mut self) -> Self {
        self.base_speed = self.base_speed.clamp(1, SPEED_LIMIT);
        self.max_speed = self.max_speed.clamp(self.base_speed, SPEED_LIMIT);
        self.speed_increase_interval = self.speed_increase_interval.max(1);
        self.item_spawn_percent = self.item_spawn_percent.min(100);
        self.shield_percent = self.shield_percent.min(100);
        self.scenery_spawn_percent = self.scenery_spawn_percent.min(100);
        self
    }

    /// Scroll speed for a score
    pub fn speed_for_score(&self, score: u32) -> i32 {
        let steps = score / self.speed_increase_interval.max(1);
        let steps = steps.min(SPEED_LIMIT as u32) as i32;
        (self.base_speed + steps).min(self.max_speed)
    }

    /// Keep a persisted speed inside the configured range
    pub fn clamp_speed(&self, speed: i32) -> i32 {
        speed.clamp(self.base_speed, self.max_speed.max(self.base_speed))
    }
}
