pub mod attendance_engine;
pub mod models;
pub mod test_utils;


use sea_orm::{Database, DatabaseConnection};
use std::path::Path;

/// Connects to the configured database.
///
/// If `path_or_url` is already a DSN it is used as-is; otherwise it is treated
/// as a SQLite file path. Failure to connect is fatal.
pub async fn connect(path_or_url: &str) -> DatabaseConnection {
    let url = if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url.to_string()
    } else {
        // Ensure parent directory exists (SQLite won't create intermediate dirs).
        if let Some(parent) = Path::new(path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    Database::connect(&url)
        .await
        .expect("Failed to connect to database")
}
