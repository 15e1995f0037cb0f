use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, Condition, DatabaseConnection, QueryOrder, TransactionTrait,
};

/// Lifecycle of a homework submission.
///
/// The only legal transitions are `Pending -> Graded` and
/// `Pending -> Failed`; a failed submission may be re-driven through
/// `Pending`-style dispatch by the reconciliation sweep, and a graded one
/// only changes again under an explicit forced re-grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "submission_status_enum"
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Stored, waiting for the grading dispatcher.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Grading completed; exactly one grading result row exists.
    #[sea_orm(string_value = "graded")]
    Graded,
    /// External grading failed; eligible for sweep retry.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status_str = match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Graded => "graded",
            SubmissionStatus::Failed => "failed",
        };
        write!(f, "{}", status_str)
    }
}

/// A student's homework submission, tied to one attendance event.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "homework_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub attendance_event_id: i64,
    pub image_count: i32,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    /// Number of grading attempts made so far (successful or not).
    pub attempts: i32,
    pub academy_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_event::Entity",
        from = "Column::AttendanceEventId",
        to = "super::attendance_event::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::homework_image::Entity")]
    Images,
    #[sea_orm(has_one = "super::grading_result::Entity")]
    Grading,
}

impl Related<super::attendance_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::homework_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::grading_result::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grading.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stores the submission row and its ordered images in one transaction.
    pub async fn create_with_images(
        db: &DatabaseConnection,
        student_id: i64,
        attendance_event_id: i64,
        academy_id: Option<i64>,
        images: &[String],
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let txn = db.begin().await?;

        let submission = ActiveModel {
            student_id: Set(student_id),
            attendance_event_id: Set(attendance_event_id),
            image_count: Set(images.len() as i32),
            submitted_at: Set(now),
            status: Set(SubmissionStatus::Pending),
            attempts: Set(0),
            academy_id: Set(academy_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (index, data) in images.iter().enumerate() {
            super::homework_image::ActiveModel {
                submission_id: Set(submission.id),
                image_index: Set(index as i32),
                image_data: Set(data.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(submission)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn history_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .all(db)
            .await
    }

    /// Submissions the reconciliation sweep should re-drive: `pending` rows
    /// older than the cutoff, plus `failed` rows under the retry budget.
    pub async fn find_stuck(
        db: &DatabaseConnection,
        older_than: Duration,
        max_retries: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Model>, DbErr> {
        let cutoff = now - older_than;
        Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(SubmissionStatus::Pending))
                            .add(Column::SubmittedAt.lt(cutoff)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::Status.eq(SubmissionStatus::Failed))
                            .add(Column::Attempts.lt(max_retries))
                            .add(Column::SubmittedAt.lt(cutoff)),
                    ),
            )
            .order_by_asc(Column::SubmittedAt)
            .all(db)
            .await
    }

    /// Conditionally moves a submission into `to`, but only while its current
    /// status is one of `allow_from`. Returns whether a row actually changed.
    ///
    /// This is the single coordination point between a foreground dispatch
    /// and a concurrently running sweep: both funnel their final writes
    /// through here, so a lost race shows up as `rows_affected == 0` instead
    /// of a stuck or double-written submission.
    pub async fn transition<C>(
        db: &C,
        id: i64,
        to: SubmissionStatus,
        allow_from: &[SubmissionStatus],
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let froms: Vec<SubmissionStatus> = allow_from.to_vec();
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(to))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in(froms))
            .exec(db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Increments the grading attempt counter.
    pub async fn bump_attempts<C>(db: &C, id: i64) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::update_many()
            .col_expr(Column::Attempts, Expr::col(Column::Attempts).add(1))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(())
    }
}
