use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder};

/// One homework photo, owned by its submission and ordered by `image_index`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "homework_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub submission_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub image_index: i32,

    /// Base64 image payload.
    pub image_data: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homework_submission::Entity",
        from = "Column::SubmissionId",
        to = "super::homework_submission::Column::Id"
    )]
    Submission,
}

impl Related<super::homework_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn for_submission(
        db: &DatabaseConnection,
        submission_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::ImageIndex)
            .all(db)
            .await
    }
}
