use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// An immutable fact: this student was present during one open-session
/// window. `session_handle` is the handle the teacher's row carried while the
/// session was open, not a foreign key into `sessions`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub session_handle: String,
    pub attended: bool,
    pub taken_at: DateTime<Utc>,
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
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Records a presence mark for `(student, handle)` unless one already
    /// exists for that pair. Returns whether a row was inserted.
    pub async fn mark_once(
        db: &DatabaseConnection,
        student_id: i64,
        session_handle: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DbErr> {
        let existing = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SessionHandle.eq(session_handle))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let record = ActiveModel {
            student_id: Set(student_id),
            session_handle: Set(session_handle.to_owned()),
            attended: Set(true),
            taken_at: Set(now),
            ..Default::default()
        };
        record.insert(db).await?;
        Ok(true)
    }

    /// Lifetime presence count for one student; not bounded by any period.
    pub async fn attended_count_for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Attended.eq(true))
            .count(db)
            .await
    }

    /// All marks taken during one open-session window.
    pub async fn find_for_handle(
        db: &DatabaseConnection,
        session_handle: &str,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SessionHandle.eq(session_handle))
            .all(db)
            .await
    }
}
