use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub academy_id: Option<i64>,
    /// Wall-clock start of the class day, "HH:MM", in the academy's
    /// timezone (`ACADEMY_UTC_OFFSET_MINUTES`).
    pub start_time: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Students,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        academy_id: Option<i64>,
        start_time: &str,
    ) -> Result<Model, DbErr> {
        let class = ActiveModel {
            name: Set(name.to_owned()),
            academy_id: Set(academy_id),
            start_time: Set(start_time.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        class.insert(db).await
    }
}
