//! Snapshot types consumed by the availability and occupancy rules.

use thiserror::Error;

/// A day of the week, numbered 0 = Sunday through 6 = Saturday.
///
/// The numbering matches the wire format and the `schedules.day_of_week`
/// column, so conversions at the store boundary are index-preserving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Weekday(u8);

/// Day index outside 0..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("day_of_week must be between 0 and 6, got {0}")]
pub struct InvalidDayOfWeek(pub i64);

impl Weekday {
    /// All seven days, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday(0),
        Weekday(1),
        Weekday(2),
        Weekday(3),
        Weekday(4),
        Weekday(5),
        Weekday(6),
    ];

    /// Parse a raw day index as stored or received over the wire.
    pub fn new(index: i64) -> Result<Self, InvalidDayOfWeek> {
        if (0..=6).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(InvalidDayOfWeek(index))
        }
    }

    /// The 0..=6 index, Sunday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw value as stored in the schedules table.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [&str; 7] = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];
        f.write_str(NAMES[self.index()])
    }
}

impl TryFrom<i64> for Weekday {
    type Error = InvalidDayOfWeek;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

/// One existing room assignment, as read from the store.
///
/// This is the minimal slice of a schedule row the rules need; joined
/// display columns stay at the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub id: i64,
    pub person_id: i64,
    pub room_id: i64,
    pub day_of_week: Weekday,
    pub week_offset: i64,
}

/// A room's identity and normalized capacity.
///
/// Capacity is already normalized (always >= 1) by the time it reaches the
/// engine; see [`crate::normalize_capacity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomInfo {
    pub id: i64,
    pub capacity: u32,
}
