//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection and the attendance engine. The state is cheap
//! to clone and is passed into route handlers via Axum's `State<T>` extractor.

use db::attendance_engine::AttendanceEngine;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The [`AttendanceEngine`] owning the scan transition and its advisory gate.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    engine: AttendanceEngine,
}

impl AppState {
    /// Creates a new `AppState` around the given database connection.
    ///
    /// The attendance engine shares the same connection; all handlers created
    /// from one `AppState` therefore scan through the same advisory gate.
    pub fn new(db: DatabaseConnection) -> Self {
        let engine = AttendanceEngine::new(db.clone());
        Self { db, engine }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a shared reference to the attendance engine.
    pub fn engine(&self) -> &AttendanceEngine {
        &self.engine
    }
}
