//! Application state shared across request handlers.

use std::sync::Arc;

use crate::db::Database;
use crate::scheduler::Scheduler;

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Database,
    scheduler: Scheduler,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database) -> Self {
        let scheduler = Scheduler::new(db.clone());
        Self {
            inner: Arc::new(AppStateInner { db, scheduler }),
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the scheduling façade.
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }
}
