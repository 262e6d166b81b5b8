//! The availability check: may this person take this room on this day?

use thiserror::Error;

use crate::types::{Assignment, RoomInfo, Weekday};

/// Why a candidate assignment was not admitted.
///
/// Rejections are routine, user-correctable outcomes. They are returned as
/// values and rendered to users via `Display`; [`Rejection::code`] gives the
/// stable machine-readable identifier used in API error bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The person already has an assignment in a different room that day.
    #[error("this person is already scheduled for another room on this day; remove that schedule first")]
    DoubleBooked { day: Weekday },

    /// The candidate room does not exist in the snapshot.
    #[error("room {room_id} does not exist")]
    UnknownRoom { room_id: i64 },

    /// The room already holds `capacity` people on that day.
    #[error("this room has reached its capacity for this day ({capacity} people); current occupancy: {occupancy}/{capacity}")]
    AtCapacity { occupancy: u32, capacity: u32 },

    /// An identical assignment already exists.
    #[error("this person is already assigned to this room on this day")]
    Duplicate,
}

impl Rejection {
    /// Stable identifier for API error payloads.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::DoubleBooked { .. } => "double_booked",
            Rejection::UnknownRoom { .. } => "unknown_room",
            Rejection::AtCapacity { .. } => "room_at_capacity",
            Rejection::Duplicate => "duplicate_schedule",
        }
    }
}

/// Decide whether `person_id` may be assigned to `room_id` on `day` within
/// `week_offset`.
///
/// `schedules` may contain rows from any week; the check filters by
/// `week_offset` itself. `rooms` must carry normalized capacities.
///
/// Checks run in a fixed order and the first failure is returned:
///
/// 1. double-booking (independent of capacity),
/// 2. room existence,
/// 3. per-day capacity,
/// 4. exact duplicate.
///
/// The ordering is user-facing: someone who is already booked elsewhere
/// should hear that, even when the room is also full.
pub fn check_availability(
    person_id: i64,
    room_id: i64,
    day: Weekday,
    week_offset: i64,
    schedules: &[Assignment],
    rooms: &[RoomInfo],
) -> Result<(), Rejection> {
    let same_week_day = |s: &&Assignment| s.week_offset == week_offset && s.day_of_week == day;

    let double_booked = schedules
        .iter()
        .filter(same_week_day)
        .any(|s| s.person_id == person_id && s.room_id != room_id);
    if double_booked {
        return Err(Rejection::DoubleBooked { day });
    }

    let room = rooms
        .iter()
        .find(|r| r.id == room_id)
        .ok_or(Rejection::UnknownRoom { room_id })?;

    let occupancy = schedules
        .iter()
        .filter(same_week_day)
        .filter(|s| s.room_id == room_id)
        .count() as u32;
    if occupancy >= room.capacity {
        return Err(Rejection::AtCapacity {
            occupancy,
            capacity: room.capacity,
        });
    }

    let duplicate = schedules
        .iter()
        .filter(same_week_day)
        .any(|s| s.person_id == person_id && s.room_id == room_id);
    if duplicate {
        return Err(Rejection::Duplicate);
    }

    Ok(())
}
