use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, TransactionTrait};
use thiserror::Error;

/// Upper bound on candidate draws before issuance gives up. A student body
/// large enough to exhaust this is a sign the 6-digit code space is close to
/// saturation and needs operator attention.
pub const CODE_ATTEMPT_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("Attendance code not found")]
    NotFound,
    #[error("Attendance code is deactivated")]
    Inactive,
    #[error("Could not generate a unique attendance code within {0} attempts")]
    GenerationExhausted(u32),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Outcome of an issuance call. `collisions` counts candidate codes that were
/// already taken before a free one was found; callers surface it as an
/// observability signal for code-space saturation.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: Model,
    pub collisions: u32,
}

/// A persistent per-student attendance code.
///
/// One row per student; the 6-digit `code` value is globally unique across
/// all rows, active or not.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub code: String,
    pub is_active: bool,
    pub academy_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns the student's existing code, or mints a fresh one.
    ///
    /// Idempotent: a second call for the same student returns the same row.
    /// Candidate generation retries on collision up to [`CODE_ATTEMPT_LIMIT`]
    /// and fails with [`CodeError::GenerationExhausted`] past that.
    pub async fn issue_or_fetch(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<IssuedCode, CodeError> {
        if let Some(existing) = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await?
        {
            return Ok(IssuedCode {
                code: existing,
                collisions: 0,
            });
        }

        let academy_id = super::user::Model::find_by_id(db, student_id)
            .await?
            .and_then(|u| u.academy_id);

        let mut collisions = 0u32;
        for _ in 0..CODE_ATTEMPT_LIMIT {
            let candidate = {
                let mut rng = rand::thread_rng();
                rng.gen_range(100_000..=999_999).to_string()
            };

            // Check-then-insert inside one transaction so concurrent issuers
            // for different students cannot both claim the same candidate.
            let txn = db.begin().await.map_err(CodeError::Db)?;
            let taken = Entity::find()
                .filter(Column::Code.eq(candidate.as_str()))
                .one(&txn)
                .await
                .map_err(CodeError::Db)?
                .is_some();
            if taken {
                txn.rollback().await.map_err(CodeError::Db)?;
                collisions += 1;
                tracing::warn!(
                    student_id,
                    collisions,
                    "attendance code candidate collided; retrying"
                );
                continue;
            }

            let row = ActiveModel {
                student_id: Set(student_id),
                code: Set(candidate),
                is_active: Set(true),
                academy_id: Set(academy_id),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            match row.insert(&txn).await {
                Ok(model) => {
                    txn.commit().await.map_err(CodeError::Db)?;
                    return Ok(IssuedCode {
                        code: model,
                        collisions,
                    });
                }
                Err(_) => {
                    txn.rollback().await.ok();
                    // Two unique keys can reject the insert: the code value,
                    // or the student. A concurrent issuance for the same
                    // student means the code already exists; redrawing would
                    // never succeed, so return that row instead.
                    if let Some(existing) = Entity::find()
                        .filter(Column::StudentId.eq(student_id))
                        .one(db)
                        .await?
                    {
                        return Ok(IssuedCode {
                            code: existing,
                            collisions,
                        });
                    }
                    collisions += 1;
                    tracing::warn!(
                        student_id,
                        collisions,
                        "attendance code insert lost uniqueness race; retrying"
                    );
                }
            }
        }

        tracing::error!(
            student_id,
            attempts = CODE_ATTEMPT_LIMIT,
            "attendance code space exhausted"
        );
        Err(CodeError::GenerationExhausted(CODE_ATTEMPT_LIMIT))
    }

    /// Resolves a presented code. Read-only.
    pub async fn validate(db: &DatabaseConnection, code: &str) -> Result<Model, CodeError> {
        let row = Entity::find()
            .filter(Column::Code.eq(code.trim()))
            .one(db)
            .await?
            .ok_or(CodeError::NotFound)?;
        if !row.is_active {
            return Err(CodeError::Inactive);
        }
        Ok(row)
    }

    pub async fn find_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Code.eq(code.trim()))
            .one(db)
            .await
    }

    pub async fn find_by_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    pub async fn set_active_by_code(
        db: &DatabaseConnection,
        code: &str,
        is_active: bool,
    ) -> Result<Model, CodeError> {
        let row = Self::find_by_code(db, code).await?.ok_or(CodeError::NotFound)?;
        let mut active: ActiveModel = row.into();
        active.is_active = Set(is_active);
        Ok(active.update(db).await?)
    }

    pub async fn set_active_by_student(
        db: &DatabaseConnection,
        student_id: i64,
        is_active: bool,
    ) -> Result<Model, CodeError> {
        let row = Self::find_by_student(db, student_id)
            .await?
            .ok_or(CodeError::NotFound)?;
        let mut active: ActiveModel = row.into();
        active.is_active = Set(is_active);
        Ok(active.update(db).await?)
    }

    /// Deactivates every active code whose owning student no longer resolves
    /// in the registry. Returns how many codes were deactivated.
    pub async fn deactivate_orphans(db: &DatabaseConnection) -> Result<u64, DbErr> {
        let active_codes = Entity::find()
            .filter(Column::IsActive.eq(true))
            .all(db)
            .await?;

        let mut deactivated = 0u64;
        for row in active_codes {
            if super::user::Model::exists(db, row.student_id).await? {
                continue;
            }
            let student_id = row.student_id;
            let code = row.code.clone();
            let mut active: ActiveModel = row.into();
            active.is_active = Set(false);
            active.update(db).await?;
            deactivated += 1;
            tracing::info!(student_id, %code, "deactivated orphaned attendance code");
        }
        Ok(deactivated)
    }
}
