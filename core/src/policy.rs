//! Coaching thresholds.
//!
//! These values are policy, not mechanism: the aggregation functions take
//! them as arguments and [`InsightPolicy`] carries the tunable set.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

pub const DEFAULT_DAILY_PROTEIN_G: u32 = 150;
pub const DEFAULT_DAILY_CALORIES: u32 = 2000;

/// Days subtracted from today to open the trailing window. The window is
/// inclusive on both ends, so 7 covers 8 calendar days.
pub const TRAILING_WINDOW_DAYS: u32 = 7;

/// Upper bound for `window_days` and for listing ranges (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Most per-day summaries a history request produces.
pub const MAX_HISTORY_DAYS: u32 = 366;

/// Average daily protein below `goal * ratio` counts as below goal.
pub const PROTEIN_BELOW_GOAL_RATIO: f64 = 0.8;

/// Workouts in the window below this count are `Low` consistency.
pub const WORKOUTS_MODERATE_FROM: usize = 3;

/// Workouts in the window at or above this count are `High` consistency.
pub const WORKOUTS_HIGH_FROM: usize = 5;

/// Suggested shake size when protein is below goal.
pub const PROTEIN_SHAKE_G: f64 = 30.0;

/// A meal logged before this hour counts as breakfast.
pub const BREAKFAST_CUTOFF_HOUR: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightPolicy {
    pub window_days: u32,
    pub protein_below_goal_ratio: f64,
    pub workouts_moderate_from: usize,
    pub workouts_high_from: usize,
    pub protein_shake_g: f64,
    pub breakfast_cutoff_hour: u32,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            window_days: TRAILING_WINDOW_DAYS,
            protein_below_goal_ratio: PROTEIN_BELOW_GOAL_RATIO,
            workouts_moderate_from: WORKOUTS_MODERATE_FROM,
            workouts_high_from: WORKOUTS_HIGH_FROM,
            protein_shake_g: PROTEIN_SHAKE_G,
            breakfast_cutoff_hour: BREAKFAST_CUTOFF_HOUR,
        }
    }
}

impl InsightPolicy {
    /// Reject values the aggregation functions cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(StoreError::validation(format!(
                "window_days must be at most {MAX_WINDOW_DAYS}, got {}",
                self.window_days
            )));
        }
        if !(0.0..=1.0).contains(&self.protein_below_goal_ratio) {
            return Err(StoreError::validation(format!(
                "protein_below_goal_ratio must be between 0 and 1, got {}",
                self.protein_below_goal_ratio
            )));
        }
        if self.workouts_moderate_from > self.workouts_high_from {
            return Err(StoreError::validation(
                "workouts_moderate_from must not exceed workouts_high_from",
            ));
        }
        if !self.protein_shake_g.is_finite() || self.protein_shake_g < 0.0 {
            return Err(StoreError::validation(
                "protein_shake_g must be a non-negative number",
            ));
        }
        if self.breakfast_cutoff_hour > 23 {
            return Err(StoreError::validation(format!(
                "breakfast_cutoff_hour must be 0-23, got {}",
                self.breakfast_cutoff_hour
            )));
        }
        Ok(())
    }
}
