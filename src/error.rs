use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use strum_macros::IntoStaticStr;
use thiserror::Error;

use crate::model::overtime::OvertimeStatus;
use crate::rules::clock::Remaining;

/// Failures of the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique key was violated by a concurrent write.
    #[error("duplicate row")]
    Duplicate,

    /// The transaction lost a lock conflict and was rolled back.
    #[error("transaction rolled back by a lock conflict")]
    Contention,

    #[error("stored row is invalid: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Maps MySQL integrity violations (SQLSTATE 23000) to [`StoreError::Duplicate`]
    /// and deadlock victims (SQLSTATE 40001) to [`StoreError::Contention`].
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            match db_err.code().as_deref() {
                Some("23000") => return StoreError::Duplicate,
                Some("40001") => return StoreError::Contention,
                _ => {}
            }
        }
        StoreError::Database(e)
    }

    /// Lost a race against a concurrent writer of the same key.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Duplicate | StoreError::Contention)
    }
}

/// Everything an attendance or overtime operation can refuse with.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleError {
    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("No check-in found for today")]
    NotCheckedInYet,

    #[error("Already checked out today")]
    AlreadyCheckedOut,

    #[error("Minimum work hours ({required_hours} h) not met. Remaining: {remaining}")]
    MinimumHoursNotMet {
        required_hours: f64,
        remaining: Remaining,
    },

    #[error("Check in before starting overtime")]
    NotCheckedIn,

    #[error("Check out before starting overtime")]
    NotCheckedOut,

    #[error("An overtime session is already running")]
    OvertimeAlreadyRunning,

    #[error("A reason is required to start overtime")]
    ReasonRequired,

    #[error("No overtime is running")]
    NoActiveOvertime,

    #[error("Record not found")]
    NotFound,

    #[error("Overtime was already {0}")]
    AlreadyDecided(OvertimeStatus),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Work schedule misconfigured: {0}")]
    Configuration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RuleError {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Faults that point at the system rather than the caller.
    pub fn is_fault(&self) -> bool {
        match self {
            RuleError::Configuration(_) => true,
            RuleError::Store(e) => !e.is_conflict(),
            _ => false,
        }
    }
}

impl ResponseError for RuleError {
    fn status_code(&self) -> StatusCode {
        match self {
            RuleError::NotFound => StatusCode::NOT_FOUND,
            RuleError::AlreadyDecided(_) => StatusCode::CONFLICT,
            RuleError::Store(e) if e.is_conflict() => StatusCode::CONFLICT,
            RuleError::Configuration(_) | RuleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_fault() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
            return HttpResponse::build(self.status_code()).json(json!({
                "code": self.code(),
                "message": "Internal Server Error"
            }));
        }

        tracing::debug!(error = %self, code = self.code(), "Request refused");

        let mut body = json!({
            "code": self.code(),
            "message": self.to_string()
        });
        if let RuleError::MinimumHoursNotMet { remaining, .. } = self {
            body["remainingMinutes"] = json!(remaining.minutes);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
