use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sea_orm::DatabaseConnection;

use crate::services::gemini::GradingBackend;

/// Shared application state passed to all route handlers.
///
/// Cheap to clone: the connection pool, the grading backend and the
/// collision counter are all reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    grader: Arc<dyn GradingBackend>,
    code_collisions: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, grader: Arc<dyn GradingBackend>) -> Self {
        Self {
            db,
            grader,
            code_collisions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn grader(&self) -> Arc<dyn GradingBackend> {
        self.grader.clone()
    }

    /// Running total of code candidates rejected because the value was
    /// already taken. Surfaced by the admin reconcile endpoint.
    pub fn record_code_collisions(&self, n: u32) {
        if n > 0 {
            self.code_collisions.fetch_add(u64::from(n), Ordering::Relaxed);
        }
    }

    pub fn code_collisions(&self) -> u64 {
        self.code_collisions.load(Ordering::Relaxed)
    }
}
