//! In-memory database helpers shared by the crate's integration tests.

use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Opens a fresh in-memory SQLite database with the full schema applied.
/// Each call returns an isolated database, so tests never share state.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");

    Migrator::up(&db, None)
        .await
        .expect("schema migrations should apply cleanly");

    db
}
