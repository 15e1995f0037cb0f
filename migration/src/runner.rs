use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const LABEL_WIDTH: usize = 72;

/// Applies every registered migration in order, printing one status line per
/// step. The process exits on the first failure so a half-migrated database
/// is never reported as success.
pub async fn apply_all(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("could not open the database for migration");

    let manager = SchemaManager::new(&db);
    let migrations = <migration::Migrator as MigratorTrait>::migrations();
    println!("Applying {} migration(s)", migrations.len());

    let started = Instant::now();
    for step in migrations {
        apply_one(&manager, step).await;
    }
    println!("Schema up to date in {:.2?}", started.elapsed());
}

async fn apply_one(manager: &SchemaManager<'_>, migration: Box<dyn MigrationTrait>) {
    let label = format!("  {}", migration.name());
    let pad = ".".repeat(LABEL_WIDTH.saturating_sub(label.len()));
    print!("{}{} ", label.bold(), pad);
    let _ = io::stdout().flush();

    let step = Instant::now();
    let outcome = std::panic::AssertUnwindSafe(migration.up(manager))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => {
            let elapsed = format!("({:.2?})", step.elapsed());
            println!("{} {}", "ok".green(), elapsed.dimmed());
        }
        Ok(Err(err)) => {
            println!("{}", "failed".red());
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
