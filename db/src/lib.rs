pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection};
use std::path::Path;
use util::config;

/// Opens the application database configured by `DATABASE_PATH`.
///
/// The value may be a full connection URL or a bare SQLite file path. Bare
/// paths get their parent directories created so a first run works from an
/// empty checkout.
pub async fn connect() -> DatabaseConnection {
    let url = resolve_url(&config::database_path());
    Database::connect(&url)
        .await
        .expect("database connection failed")
}

fn resolve_url(path_or_url: &str) -> String {
    let is_url = ["sqlite:", "postgres://", "mysql://"]
        .iter()
        .any(|scheme| path_or_url.starts_with(scheme));
    if is_url {
        return path_or_url.to_owned();
    }
    // SQLite will not create intermediate directories on its own.
    if let Some(parent) = Path::new(path_or_url).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    format!("sqlite://{path_or_url}")
}
