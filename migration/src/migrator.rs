use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608200001_create_users::Migration),
            Box::new(migrations::m202608200002_create_classes::Migration),
            Box::new(migrations::m202608200003_create_attendance_codes::Migration),
            Box::new(migrations::m202608200004_create_attendance_events::Migration),
            Box::new(migrations::m202608200005_create_homework_submissions::Migration),
            Box::new(migrations::m202608200006_create_grading_results::Migration),
            Box::new(migrations::m202608200007_create_weak_concept_cache::Migration),
        ]
    }
}
