//! Scheduling façade: admit-then-commit orchestration.
//!
//! The façade is responsible for:
//! - Loading snapshots of assignments and room capacities for the engine
//! - Running the availability check before any schedule write
//! - Re-validating the admit decision on a fresh snapshot immediately before
//!   the commit, serialized through a commit lock
//! - Keeping availability rejections, commit conflicts, and store faults as
//!   distinct outcomes
//!
//! Two callers can both read a snapshot with one seat left and both pass the
//! check; the commit lock plus re-check closes that window. The store's
//! unique constraint only covers exact duplicates, not capacity overruns
//! from different people, so the re-check is the load-bearing part.

use std::sync::Arc;

use haven_scheduling::{check_availability, Assignment, Rejection, RoomInfo, Weekday};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::db::{Database, DbError, NewSchedule, ScheduleRow};

/// Outcome of a façade operation that did not produce a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The availability engine rejected the candidate assignment.
    #[error("assignment rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The person no longer exists; a schedule cannot reference it.
    #[error("person {person_id} does not exist")]
    UnknownPerson { person_id: i64 },

    /// The schedule being moved or removed does not exist.
    #[error("schedule {schedule_id} not found")]
    NotFound { schedule_id: i64 },

    /// The store rejected a write the engine had admitted.
    #[error("commit failed: {0}")]
    CommitConflict(String),

    /// Underlying persistence failure. Never retried here.
    #[error(transparent)]
    Store(#[from] DbError),
}

/// A candidate assignment, validated at the API boundary.
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    pub person_id: i64,
    pub room_id: i64,
    pub day_of_week: Weekday,
    pub week_offset: i64,
    pub notes: Option<String>,
}

/// Orchestrates "propose assignment → check availability → commit or reject"
/// as one conceptual transaction.
#[derive(Clone)]
pub struct Scheduler {
    db: Database,
    commit_lock: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            commit_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Propose a new assignment and commit it if admitted.
    pub async fn propose(&self, req: AssignmentRequest) -> Result<ScheduleRow, ScheduleError> {
        let store = self.db.schedules();

        // Cheap pre-check without the lock; most rejections happen here.
        let (assignments, rooms) = self.snapshot().await?;
        check_candidate(&req, &assignments, &rooms, None)?;

        // Serialized commit path: re-validate on a fresh snapshot, then write.
        let _guard = self.commit_lock.lock().await;
        let (assignments, rooms) = self.snapshot().await?;
        check_candidate(&req, &assignments, &rooms, None)?;

        if !store.person_exists(req.person_id).await? {
            return Err(ScheduleError::UnknownPerson {
                person_id: req.person_id,
            });
        }

        let id = store
            .insert(&NewSchedule {
                person_id: req.person_id,
                room_id: req.room_id,
                day_of_week: req.day_of_week,
                week_offset: req.week_offset,
                notes: req.notes.clone(),
            })
            .await
            .map_err(Self::commit_error)?;

        debug!(schedule_id = id, person_id = req.person_id, room_id = req.room_id, "Assignment committed");

        store
            .get(id)
            .await?
            .ok_or_else(|| ScheduleError::CommitConflict("schedule vanished after insert".into()))
    }

    /// Move an existing schedule to a new slot (or person, or notes).
    ///
    /// The availability check runs against a snapshot that excludes the
    /// schedule being moved, so moving within the same slot does not count
    /// against itself.
    pub async fn relocate(
        &self,
        schedule_id: i64,
        req: AssignmentRequest,
    ) -> Result<ScheduleRow, ScheduleError> {
        let store = self.db.schedules();

        let _guard = self.commit_lock.lock().await;

        if store.get(schedule_id).await?.is_none() {
            return Err(ScheduleError::NotFound { schedule_id });
        }

        let (assignments, rooms) = self.snapshot().await?;
        check_candidate(&req, &assignments, &rooms, Some(schedule_id))?;

        if !store.person_exists(req.person_id).await? {
            return Err(ScheduleError::UnknownPerson {
                person_id: req.person_id,
            });
        }

        let updated = store
            .update(
                schedule_id,
                &NewSchedule {
                    person_id: req.person_id,
                    room_id: req.room_id,
                    day_of_week: req.day_of_week,
                    week_offset: req.week_offset,
                    notes: req.notes.clone(),
                },
            )
            .await
            .map_err(Self::commit_error)?;

        if !updated {
            // Deleted between the existence check and the write.
            return Err(ScheduleError::NotFound { schedule_id });
        }

        store
            .get(schedule_id)
            .await?
            .ok_or(ScheduleError::NotFound { schedule_id })
    }

    /// Remove a schedule. No availability check applies to removal.
    pub async fn remove(&self, schedule_id: i64) -> Result<bool, ScheduleError> {
        Ok(self.db.schedules().delete(schedule_id).await?)
    }

    async fn snapshot(&self) -> Result<(Vec<Assignment>, Vec<RoomInfo>), ScheduleError> {
        let store = self.db.schedules();
        let assignments = store.assignments().await?;
        let rooms = store.room_capacities().await?;
        Ok((assignments, rooms))
    }

    /// The engine admitted the write, so a constraint failure here is a
    /// race with a concurrent writer or an entity deleted mid-flight.
    fn commit_error(e: DbError) -> ScheduleError {
        match e {
            DbError::ConstraintViolation(msg) => ScheduleError::CommitConflict(msg),
            other => ScheduleError::Store(other),
        }
    }
}

fn check_candidate(
    req: &AssignmentRequest,
    assignments: &[Assignment],
    rooms: &[RoomInfo],
    exclude_id: Option<i64>,
) -> Result<(), Rejection> {
    let filtered: Vec<Assignment>;
    let snapshot = match exclude_id {
        Some(id) => {
            filtered = assignments.iter().copied().filter(|a| a.id != id).collect();
            filtered.as_slice()
        }
        None => assignments,
    };

    check_availability(
        req.person_id,
        req.room_id,
        req.day_of_week,
        req.week_offset,
        snapshot,
        rooms,
    )
}
