use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection};

/// The structured outcome of one successful AI grading pass.
///
/// Exactly one row per graded submission; a re-grade overwrites the row
/// in place rather than appending.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "grading_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub submission_id: i64,
    pub score: f64,
    pub subject: Option<String>,
    pub feedback: String,
    /// JSON array of strength descriptions.
    pub strengths: String,
    /// JSON array of improvement suggestions.
    pub suggestions: String,
    pub correct_answers: Option<i32>,
    pub total_questions: Option<i32>,
    pub graded_by: String,
    pub graded_at: DateTime<Utc>,
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

/// Field bundle for [`Model::upsert`].
#[derive(Debug, Clone)]
pub struct NewGradingResult {
    pub submission_id: i64,
    pub score: f64,
    pub subject: Option<String>,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
    pub correct_answers: Option<i32>,
    pub total_questions: Option<i32>,
    pub graded_by: String,
}

impl Model {
    /// Writes the grading result, overwriting any row left by a prior
    /// attempt. Last writer wins by design.
    pub async fn upsert<C>(db: &C, result: NewGradingResult) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let row = ActiveModel {
            submission_id: Set(result.submission_id),
            score: Set(result.score),
            subject: Set(result.subject),
            feedback: Set(result.feedback),
            strengths: Set(serde_json::to_string(&result.strengths)
                .map_err(|e| DbErr::Custom(e.to_string()))?),
            suggestions: Set(serde_json::to_string(&result.suggestions)
                .map_err(|e| DbErr::Custom(e.to_string()))?),
            correct_answers: Set(result.correct_answers),
            total_questions: Set(result.total_questions),
            graded_by: Set(result.graded_by),
            graded_at: Set(Utc::now()),
        };

        Entity::insert(row)
            .on_conflict(
                OnConflict::column(Column::SubmissionId)
                    .update_columns([
                        Column::Score,
                        Column::Subject,
                        Column::Feedback,
                        Column::Strengths,
                        Column::Suggestions,
                        Column::CorrectAnswers,
                        Column::TotalQuestions,
                        Column::GradedBy,
                        Column::GradedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn for_submission(
        db: &DatabaseConnection,
        submission_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(submission_id).one(db).await
    }

    /// Full grading history for one student, oldest first.
    pub async fn history_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        use sea_orm::QueryOrder;

        let submissions = super::homework_submission::Entity::find()
            .filter(super::homework_submission::Column::StudentId.eq(student_id))
            .all(db)
            .await?;
        let ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::SubmissionId.is_in(ids))
            .order_by_asc(Column::GradedAt)
            .all(db)
            .await
    }

    /// Timestamp of the student's most recent grading result, if any.
    pub async fn latest_graded_at(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Option<DateTime<Utc>>, DbErr> {
        use sea_orm::QueryOrder;

        let submissions = super::homework_submission::Entity::find()
            .filter(super::homework_submission::Column::StudentId.eq(student_id))
            .all(db)
            .await?;
        let ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        if ids.is_empty() {
            return Ok(None);
        }
        Ok(Entity::find()
            .filter(Column::SubmissionId.is_in(ids))
            .order_by_desc(Column::GradedAt)
            .one(db)
            .await?
            .map(|r| r.graded_at))
    }

    pub fn strengths_list(&self) -> Vec<String> {
        serde_json::from_str(&self.strengths).unwrap_or_default()
    }

    pub fn suggestions_list(&self) -> Vec<String> {
        serde_json::from_str(&self.suggestions).unwrap_or_default()
    }
}
