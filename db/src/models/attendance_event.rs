use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection, QueryOrder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Student {0} not found in registry")]
    StudentNotFound(i64),
    #[error("Already checked in within the last {0} seconds")]
    DuplicateWindow(i64),
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status_enum")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Checked in at or before the class start time.
    #[sea_orm(string_value = "present")]
    Present,
    /// Checked in after the class start time.
    #[sea_orm(string_value = "late")]
    Late,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Present => write!(f, "present"),
            EventStatus::Late => write!(f, "late"),
        }
    }
}

/// One successful code presentation. Append-only: rows are never updated or
/// deleted; a repeat check-in appends a new event.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub code: String,
    pub check_in_time: DateTime<Utc>,
    pub academy_id: Option<i64>,
    pub class_id: Option<i64>,
    pub status: EventStatus,
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
    #[sea_orm(has_many = "super::homework_submission::Entity")]
    Submissions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::homework_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Appends an attendance event for a validated code presentation.
    ///
    /// Late/present is derived from the student's class start time when one
    /// is configured. `cooldown_seconds` > 0 rejects a second check-in inside
    /// the window; 0 disables the check.
    pub async fn record(
        db: &DatabaseConnection,
        code: &super::attendance_code::Model,
        now: DateTime<Utc>,
        cooldown_seconds: i64,
    ) -> Result<Model, EventError> {
        let student = super::user::Model::find_by_id(db, code.student_id)
            .await?
            .ok_or(EventError::StudentNotFound(code.student_id))?;

        if cooldown_seconds > 0 {
            let latest = Entity::find()
                .filter(Column::StudentId.eq(student.id))
                .order_by_desc(Column::CheckInTime)
                .one(db)
                .await?;
            if let Some(prev) = latest {
                if now - prev.check_in_time < Duration::seconds(cooldown_seconds) {
                    return Err(EventError::DuplicateWindow(cooldown_seconds));
                }
            }
        }

        let status = Self::status_for(db, &student, now).await?;

        let event = ActiveModel {
            student_id: Set(student.id),
            code: Set(code.code.clone()),
            check_in_time: Set(now),
            academy_id: Set(student.academy_id.or(code.academy_id)),
            class_id: Set(student.class_id),
            status: Set(status),
            created_at: Set(now),
            ..Default::default()
        };
        Ok(event.insert(db).await?)
    }

    async fn status_for(
        db: &DatabaseConnection,
        student: &super::user::Model,
        now: DateTime<Utc>,
    ) -> Result<EventStatus, DbErr> {
        let Some(class_id) = student.class_id else {
            return Ok(EventStatus::Present);
        };
        let Some(class) = super::class::Entity::find_by_id(class_id).one(db).await? else {
            return Ok(EventStatus::Present);
        };
        // Class start times are wall-clock in the academy's timezone.
        let offset_seconds = util::config::academy_utc_offset_minutes() * 60;
        let tz = FixedOffset::east_opt(offset_seconds as i32).unwrap_or_else(|| Utc.fix());
        // "HH:MM" strings compare correctly lexicographically.
        let hhmm = now.with_timezone(&tz).format("%H:%M").to_string();
        if hhmm > class.start_time {
            Ok(EventStatus::Late)
        } else {
            Ok(EventStatus::Present)
        }
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }
}
