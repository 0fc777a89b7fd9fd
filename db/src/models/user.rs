use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Represents a person in the `users` table.
///
/// Teachers and students share the table: teacher-only columns (`subject`,
/// the session trio) stay `NULL`/false for students, and the student-only
/// attendance pair is never touched for teachers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login key: roll number for students, a unique name key for teachers.
    pub username: String,
    /// Display name used in reports.
    pub name: String,
    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    /// Opaque identifier the fingerprint sensor reports on a match.
    pub fingerprint_id: String,
    /// Subject taught (teachers only).
    pub subject: Option<String>,
    /// Current roster status (students only).
    pub attendance: AttendanceStatus,
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether this teacher currently holds the open session.
    pub session_open: bool,
    pub session_start: Option<DateTime<Utc>>,
    /// Handle minted at session open; attendance records reference it.
    pub active_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new user with an argon2-hashed password.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        name: &str,
        password: &str,
        role: Role,
        fingerprint_id: &str,
        subject: Option<&str>,
    ) -> Result<Model, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?
            .to_string();

        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.to_owned()),
            name: Set(name.to_owned()),
            password_hash: Set(password_hash),
            role: Set(role),
            fingerprint_id: Set(fingerprint_id.to_owned()),
            subject: Set(subject.map(|s| s.to_owned())),
            attendance: Set(AttendanceStatus::Absent),
            last_updated: Set(None),
            session_open: Set(false),
            session_start: Set(None),
            active_session_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    /// Verifies a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_fingerprint(
        db: &DatabaseConnection,
        fingerprint_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::FingerprintId.eq(fingerprint_id))
            .one(db)
            .await
    }

    pub async fn find_by_fingerprint_and_role(
        db: &DatabaseConnection,
        fingerprint_id: &str,
        role: Role,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::FingerprintId.eq(fingerprint_id))
            .filter(Column::Role.eq(role))
            .one(db)
            .await
    }

    pub async fn find_by_username_and_role(
        db: &DatabaseConnection,
        username: &str,
        role: Role,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .filter(Column::Role.eq(role))
            .one(db)
            .await
    }

    /// The teacher currently holding the open session, if any.
    ///
    /// The single-open-session invariant makes this unique outside the race
    /// window; `one` deliberately takes whichever row the store returns first.
    pub async fn find_teacher_with_open_session(
        db: &DatabaseConnection,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(Role::Teacher))
            .filter(Column::SessionOpen.eq(true))
            .one(db)
            .await
    }

    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().all(db).await
    }

    /// Students whose status changed at or after `threshold`, plus students
    /// that have never been updated (eligible, absent by default).
    pub async fn students_snapshot(
        db: &DatabaseConnection,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(Role::Student))
            .filter(
                Condition::any()
                    .add(Column::LastUpdated.gte(threshold))
                    .add(Column::LastUpdated.is_null()),
            )
            .all(db)
            .await
    }

    /// Full student roster ordered by roll number, as printed in reports.
    pub async fn students_sorted(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.eq(Role::Student))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    /// Session-wide reset: every student back to absent.
    pub async fn reset_all_students(db: &DatabaseConnection) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(Column::Attendance, Expr::value(AttendanceStatus::Absent))
            .filter(Column::Role.eq(Role::Student))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Post-report reset: only students currently present go back to absent.
    pub async fn reset_present_students(db: &DatabaseConnection) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(Column::Attendance, Expr::value(AttendanceStatus::Absent))
            .filter(Column::Role.eq(Role::Student))
            .filter(Column::Attendance.eq(AttendanceStatus::Present))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Post-report reset for a single student: back to absent. Stamps
    /// `last_updated`, unlike the roster-wide reset.
    pub async fn reset_attendance(
        self,
        db: &DatabaseConnection,
        now: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let mut student = self.into_active_model();
        student.attendance = Set(AttendanceStatus::Absent);
        student.last_updated = Set(Some(now));
        student.updated_at = Set(now);
        student.update(db).await
    }

    /// Hardware-integration override: force a teacher's session flag without
    /// consulting the engine. Overwrites all three session fields; the
    /// single-open-session invariant is NOT checked here.
    pub async fn set_session_state(
        db: &DatabaseConnection,
        fingerprint_id: &str,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        let Some(teacher) = Self::find_by_fingerprint_and_role(db, fingerprint_id, Role::Teacher).await?
        else {
            return Ok(None);
        };

        let mut teacher = teacher.into_active_model();
        teacher.session_open = Set(active);
        if active {
            teacher.session_start = Set(Some(now));
            teacher.active_session_id = Set(Some(Uuid::new_v4().to_string()));
        } else {
            teacher.session_start = Set(None);
            teacher.active_session_id = Set(None);
        }
        teacher.updated_at = Set(now);

        teacher.update(db).await.map(Some)
    }

    /// Hardware-integration override: mark one student present with no
    /// open-session guard and no attendance record.
    pub async fn mark_present(
        db: &DatabaseConnection,
        fingerprint_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        let Some(student) = Self::find_by_fingerprint_and_role(db, fingerprint_id, Role::Student).await?
        else {
            return Ok(None);
        };

        let mut student = student.into_active_model();
        student.attendance = Set(AttendanceStatus::Present);
        student.last_updated = Set(Some(now));
        student.updated_at = Set(now);

        student.update(db).await.map(Some)
    }
}
