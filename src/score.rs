//! Scoring, leveling and fall speed
//!
//! A lock that clears at least one row earns a single flat bonus scaled by
//! the level at the time of the lock, however many rows went. Soft drops
//! earn a point per row.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable progression constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Fall interval at level 1
    pub base_interval_ms: u64,
    /// Floor for the fall interval
    pub min_interval_ms: u64,
    /// Interval removed per level above 1
    pub step_ms: u64,
    /// Points per clearing lock, multiplied by the level
    pub clear_bonus: u64,
    /// Points per row of soft drop
    pub soft_drop_points: u64,
    /// Lines needed for each level
    pub lines_per_level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            base_interval_ms: 500,
            min_interval_ms: 100,
            step_ms: 40,
            clear_bonus: 100,
            soft_drop_points: 1,
            lines_per_level: 10,
        }
    }
}

impl Progression {
    /// `floor(lines / lines_per_level) + 1`
    pub fn level_for(&self, lines: u32) -> u32 {
        lines / self.lines_per_level.max(1) + 1
    }

    /// Fall interval for a level, never below the floor
    pub fn fall_interval_ms(&self, level: u32) -> u64 {
        let reduction = self.step_ms.saturating_mul(level.saturating_sub(1) as u64);
        self.base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms)
    }

    pub fn fall_interval(&self, level: u32) -> Duration {
        Duration::from_millis(self.fall_interval_ms(level))
    }
}

/// Running score state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Account for a lock that cleared `cleared` rows.
    /// Returns the points awarded.
    pub fn add_lock(&mut self, cleared: u32, rules: &Progression) -> u64 {
        let awarded = if cleared > 0 {
            rules.clear_bonus.saturating_mul(self.level as u64)
        } else {
            0
        };
        self.points = self.points.saturating_add(awarded);
        self.lines = self.lines.saturating_add(cleared);
        self.level = rules.level_for(self.lines);
        awarded
    }

    /// Add score for one row of soft drop
    pub fn add_soft_drop(&mut self, rules: &Progression) {
        self.points = self.points.saturating_add(rules.soft_drop_points);
    }
}
