use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// One completed teacher session, written exactly once when the session
/// closes and never updated afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Persists the historical row for a session that just closed.
    pub async fn close(
        db: &DatabaseConnection,
        teacher_id: i64,
        session_start: DateTime<Utc>,
        session_end: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let session = ActiveModel {
            teacher_id: Set(teacher_id),
            session_start: Set(session_start),
            session_end: Set(session_end),
            ..Default::default()
        };
        session.insert(db).await
    }

    /// Completed sessions for one teacher ending at or after `threshold`.
    pub async fn count_for_teacher_since(
        db: &DatabaseConnection,
        teacher_id: i64,
        threshold: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::SessionEnd.gte(threshold))
            .count(db)
            .await
    }

    /// Completed sessions system-wide ending at or after `threshold`,
    /// regardless of teacher or subject.
    pub async fn count_since(
        db: &DatabaseConnection,
        threshold: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::SessionEnd.gte(threshold))
            .count(db)
            .await
    }
}
