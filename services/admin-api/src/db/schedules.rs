//! Schedule store: the persistence side of the scheduling façade.
//!
//! The store owns the uniqueness constraint on
//! (person_id, room_id, day_of_week, week_offset); the availability engine
//! rejects duplicates before they get here, and the constraint stays as the
//! last line of defense.

use haven_scheduling::{Assignment, RoomInfo, Weekday};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use super::DbError;

/// A schedule row with the display names joined in.
#[derive(Debug, Clone)]
pub struct ScheduleRow {
    pub id: i64,
    pub person_id: i64,
    pub room_id: i64,
    pub day_of_week: i64,
    pub week_offset: i64,
    pub notes: Option<String>,
    pub person_name: Option<String>,
    pub room_name: Option<String>,
    pub building_name: Option<String>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for ScheduleRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            person_id: row.try_get("person_id")?,
            room_id: row.try_get("room_id")?,
            day_of_week: row.try_get("day_of_week")?,
            week_offset: row.try_get("week_offset")?,
            notes: row.try_get("notes")?,
            person_name: row.try_get("person_name")?,
            room_name: row.try_get("room_name")?,
            building_name: row.try_get("building_name")?,
        })
    }
}

/// Input for inserting or replacing a schedule.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub person_id: i64,
    pub room_id: i64,
    pub day_of_week: Weekday,
    pub week_offset: i64,
    pub notes: Option<String>,
}

const SELECT_JOINED: &str = r#"
    SELECT s.id, s.person_id, s.room_id, s.day_of_week, s.week_offset, s.notes,
           p.name AS person_name, r.name AS room_name, b.name AS building_name
    FROM schedules s
    LEFT JOIN people p ON s.person_id = p.id
    LEFT JOIN rooms r ON s.room_id = r.id
    LEFT JOIN buildings b ON r.building_id = b.id
"#;

/// Store handle for schedule rows.
#[derive(Clone)]
pub struct ScheduleStore {
    pool: SqlitePool,
}

impl ScheduleStore {
    /// Create a new schedule store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List schedules for one week, optionally restricted to one person.
    pub async fn list(
        &self,
        week_offset: i64,
        person_id: Option<i64>,
    ) -> Result<Vec<ScheduleRow>, DbError> {
        let sql = format!(
            "{SELECT_JOINED} WHERE s.week_offset = ? AND (? IS NULL OR s.person_id = ?) \
             ORDER BY p.name, s.day_of_week"
        );
        sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(week_offset)
            .bind(person_id)
            .bind(person_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    /// Load one schedule with joined names.
    pub async fn get(&self, id: i64) -> Result<Option<ScheduleRow>, DbError> {
        let sql = format!("{SELECT_JOINED} WHERE s.id = ?");
        sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    /// Load every assignment across all weeks, in engine form.
    ///
    /// The availability engine filters by week offset itself, so this
    /// deliberately does not.
    pub async fn assignments(&self) -> Result<Vec<Assignment>, DbError> {
        let rows = sqlx::query(
            "SELECT id, person_id, room_id, day_of_week, week_offset FROM schedules",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        rows.iter()
            .map(|row| {
                let day_raw: i64 = row.try_get("day_of_week").map_err(DbError::Query)?;
                let day_of_week =
                    Weekday::new(day_raw).map_err(|e| DbError::CorruptRow {
                        table: "schedules".to_string(),
                        detail: e.to_string(),
                    })?;
                Ok(Assignment {
                    id: row.try_get("id").map_err(DbError::Query)?,
                    person_id: row.try_get("person_id").map_err(DbError::Query)?,
                    room_id: row.try_get("room_id").map_err(DbError::Query)?,
                    day_of_week,
                    week_offset: row.try_get("week_offset").map_err(DbError::Query)?,
                })
            })
            .collect()
    }

    /// Load every room's id and normalized capacity, in engine form.
    pub async fn room_capacities(&self) -> Result<Vec<RoomInfo>, DbError> {
        let rows = sqlx::query_as::<_, (i64, i64)>("SELECT id, capacity FROM rooms")
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        Ok(rows
            .into_iter()
            .map(|(id, capacity)| RoomInfo {
                id,
                capacity: capacity.clamp(1, i64::from(u32::MAX)) as u32,
            })
            .collect())
    }

    /// Whether a person row exists.
    pub async fn person_exists(&self, person_id: i64) -> Result<bool, DbError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM people WHERE id = ?)")
            .bind(person_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    /// Insert a new schedule and return its id.
    pub async fn insert(&self, schedule: &NewSchedule) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO schedules (person_id, room_id, day_of_week, week_offset, notes) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(schedule.person_id)
        .bind(schedule.room_id)
        .bind(schedule.day_of_week.as_i64())
        .bind(schedule.week_offset)
        .bind(&schedule.notes)
        .execute(&self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(result.last_insert_rowid())
    }

    /// Replace an existing schedule's slot and notes.
    pub async fn update(&self, id: i64, schedule: &NewSchedule) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE schedules SET person_id = ?, room_id = ?, day_of_week = ?, \
             week_offset = ?, notes = ? WHERE id = ?",
        )
        .bind(schedule.person_id)
        .bind(schedule.room_id)
        .bind(schedule.day_of_week.as_i64())
        .bind(schedule.week_offset)
        .bind(&schedule.notes)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DbError::from_write)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a schedule. Returns false when the row did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
