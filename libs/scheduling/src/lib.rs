//! # haven-scheduling
//!
//! Pure scheduling rules for the haven admin service: given a snapshot of
//! current room assignments and room capacities, decide whether a candidate
//! assignment may be admitted, and aggregate per-day occupancy for capacity
//! display.
//!
//! ## Design Principles
//!
//! - Everything in this crate is a pure function over snapshot arguments:
//!   no I/O, no mutation, no clocks except where a date is passed in
//! - Rejections are values, not errors; a full room is a routine outcome
//! - Checks run in a fixed order and the first failure wins, so callers
//!   always surface the most actionable message
//! - The engine filters snapshots by week offset itself; callers never need
//!   to pre-filter and can pass everything they have

mod availability;
mod capacity;
mod occupancy;
mod types;
mod week;

pub use availability::{check_availability, Rejection};
pub use capacity::normalize_capacity;
pub use occupancy::{compute_daily_occupancy, max_occupancy, CapacityPressure};
pub use types::{Assignment, InvalidDayOfWeek, RoomInfo, Weekday};
pub use week::week_start;
