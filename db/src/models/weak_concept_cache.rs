use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection};

/// Derived per-student weak-concept summary.
///
/// Never authoritative: a missing row is recomputed from the grading
/// history, and any new grading result deletes the row outright.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "weak_concept_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub computed_at: DateTime<Utc>,
    /// JSON array of `{concept, occurrences}` entries.
    pub concepts: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn get(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(student_id).one(db).await
    }

    pub async fn put(
        db: &DatabaseConnection,
        student_id: i64,
        concepts_json: String,
        computed_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        let row = ActiveModel {
            student_id: Set(student_id),
            computed_at: Set(computed_at),
            concepts: Set(concepts_json),
        };
        Entity::insert(row)
            .on_conflict(
                OnConflict::column(Column::StudentId)
                    .update_columns([Column::ComputedAt, Column::Concepts])
                    .to_owned(),
            )
            .exec(db)
            .await?;
        Ok(())
    }

    /// Deletes the entry unconditionally. Deleting a missing row is fine.
    pub async fn invalidate<C>(db: &C, student_id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::delete_many()
            .filter(Column::StudentId.eq(student_id))
            .exec(db)
            .await?;
        Ok(())
    }
}
