//! Per-day occupancy aggregation used for capacity display.

use serde::Serialize;

use crate::types::Assignment;

/// Count assignments for `room_id` per day within `week_offset`.
///
/// The result always covers all seven days, Sunday first; days without
/// assignments count zero.
#[must_use]
pub fn compute_daily_occupancy(room_id: i64, week_offset: i64, schedules: &[Assignment]) -> [u32; 7] {
    let mut daily = [0u32; 7];
    for s in schedules {
        if s.room_id == room_id && s.week_offset == week_offset {
            daily[s.day_of_week.index()] += 1;
        }
    }
    daily
}

/// Peak occupancy across the week.
#[must_use]
pub fn max_occupancy(daily: &[u32; 7]) -> u32 {
    daily.iter().copied().max().unwrap_or(0)
}

/// Display policy for how close a room's peak occupancy is to its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPressure {
    /// Comfortably below capacity.
    Ok,
    /// Peak is at 70% of capacity or more, but still below it.
    Near,
    /// Peak has reached or exceeded capacity.
    AtRisk,
}

impl CapacityPressure {
    /// Classify a weekly peak against a room's capacity.
    #[must_use]
    pub fn assess(peak: u32, capacity: u32) -> Self {
        if peak >= capacity {
            CapacityPressure::AtRisk
        } else if f64::from(peak) >= f64::from(capacity) * 0.7 {
            CapacityPressure::Near
        } else {
            CapacityPressure::Ok
        }
    }
}
