use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, DatabaseConnection};

/// Read model of the external student/teacher registry.
///
/// This service does not own user lifecycle; rows are written here only by
/// seeding and tests. Everything else treats the table as read-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub academy_id: Option<i64>,
    pub class_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
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
        email: &str,
        role: &str,
        academy_id: Option<i64>,
        class_id: Option<i64>,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            role: Set(role.to_owned()),
            academy_id: Set(academy_id),
            class_id: Set(class_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        user.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn exists(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id(id).one(db).await?.is_some())
    }
}
