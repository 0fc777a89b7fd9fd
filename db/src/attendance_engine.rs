//! Attendance Engine
//!
//! The one stateful transition in the system: a fingerprint scan either opens
//! or closes a teacher's session, or marks a student present inside the
//! currently open session. All other endpoints are read-only queries or
//! explicit hardware-override writes that bypass this engine.
//!
//! Invariant: at most one teacher holds an open session at a time. The check
//! is a re-query at scan time; to make open/close check-and-set instead of
//! read-then-write, every scan runs under a process-wide advisory mutex.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, IntoActiveModel, Set};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    attendance_record, session,
    user::{self, AttendanceStatus, Role},
};

/// Errors a scan can surface. Display strings double as the user-visible
/// response messages.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("No match found")]
    UnknownFingerprint,

    #[error("Another teacher's session is active. You cannot start or end a session.")]
    RivalSession,

    #[error("Attendance session not open. Please wait for a teacher to start a session.")]
    NoOpenSession,

    #[error("{0}")]
    Database(#[from] DbErr),
}

/// What a successful scan did.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// A teacher opened a session; the roster was reset to absent.
    SessionOpened { subject: String },
    /// The open session's teacher scanned again; one historical row was written.
    SessionClosed,
    /// A student was marked present inside the open session.
    Marked { student: user::Model },
}

#[derive(Clone)]
pub struct AttendanceEngine {
    db: DatabaseConnection,
    gate: Arc<Mutex<()>>,
}

impl AttendanceEngine {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Runs the scan transition for whoever owns `fingerprint_id`.
    ///
    /// `now` is stamped on every write the transition makes, so one scan is
    /// a single instant as far as the stored timestamps are concerned.
    pub async fn scan(
        &self,
        fingerprint_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        let _gate = self.gate.lock().await;

        let Some(user) = user::Model::find_by_fingerprint(&self.db, fingerprint_id).await? else {
            return Err(ScanError::UnknownFingerprint);
        };

        match user.role {
            Role::Teacher => self.scan_teacher(user, now).await,
            Role::Student => self.scan_student(user, now).await,
        }
    }

    async fn scan_teacher(
        &self,
        teacher: user::Model,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        if let Some(holder) = user::Model::find_teacher_with_open_session(&self.db).await? {
            if holder.id != teacher.id {
                return Err(ScanError::RivalSession);
            }
        }

        if !teacher.session_open {
            self.open_session(teacher, now).await
        } else {
            self.close_session(teacher, now).await
        }
    }

    /// Opens a session: roster-wide reset, then flag + start + fresh handle.
    async fn open_session(
        &self,
        teacher: user::Model,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        user::Model::reset_all_students(&self.db).await?;

        let subject = teacher.subject.clone().unwrap_or_default();
        let handle = Uuid::new_v4().to_string();

        let mut active = teacher.into_active_model();
        active.session_open = Set(true);
        active.session_start = Set(Some(now));
        active.active_session_id = Set(Some(handle.clone()));
        active.updated_at = Set(now);
        let teacher = active.update(&self.db).await?;

        info!(
            teacher = %teacher.username,
            subject = %subject,
            handle = %handle,
            "attendance session opened"
        );
        Ok(ScanOutcome::SessionOpened { subject })
    }

    /// Closes the session the scanning teacher holds: one historical row with
    /// the start captured at open time, then the three session fields cleared.
    async fn close_session(
        &self,
        teacher: user::Model,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        let started = teacher.session_start.unwrap_or(now);
        session::Model::close(&self.db, teacher.id, started, now).await?;

        let mut active = teacher.into_active_model();
        active.session_open = Set(false);
        active.session_start = Set(None);
        active.active_session_id = Set(None);
        active.updated_at = Set(now);
        let teacher = active.update(&self.db).await?;

        info!(teacher = %teacher.username, "attendance session closed");
        Ok(ScanOutcome::SessionClosed)
    }

    /// Marks a student present inside the currently open session, if any.
    async fn scan_student(
        &self,
        student: user::Model,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        let handle = user::Model::find_teacher_with_open_session(&self.db)
            .await?
            .and_then(|t| t.active_session_id)
            .filter(|h| !h.is_empty());
        let Some(handle) = handle else {
            return Err(ScanError::NoOpenSession);
        };

        let mut active = student.into_active_model();
        active.attendance = Set(AttendanceStatus::Present);
        active.last_updated = Set(Some(now));
        active.updated_at = Set(now);
        let student = active.update(&self.db).await?;

        let inserted =
            attendance_record::Model::mark_once(&self.db, student.id, &handle, now).await?;
        if inserted {
            info!(student = %student.username, handle = %handle, "attendance recorded");
        }

        Ok(ScanOutcome::Marked { student })
    }
}
