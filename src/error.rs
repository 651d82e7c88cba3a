use once_cell::sync::Lazy;
use opentelemetry_semantic_conventions::{attribute::OTEL_STATUS_CODE, trace::ERROR_TYPE};
use regex::Regex;
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;
use tracing::{Span, error, warn};

use crate::config::ConfigError;

/// MySQL server error numbers we treat as "object already present".
const ER_DB_CREATE_EXISTS: u16 = 1007;
const ER_TABLE_EXISTS_ERROR: u16 = 1050;

static SQLITE_EXISTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(table|index)\s+\S+\s+already exists").expect("valid regex")
});

/// How a failed step is handled by the provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The session cannot continue: unreachable server, rejected login,
    /// database cannot be created or selected.
    Fatal,
    /// The target object is already present; success-equivalent.
    AlreadyExists,
    /// A single statement was rejected; the run continues.
    Statement,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Fatal => "fatal",
            FailureKind::AlreadyExists => "already_exists",
            FailureKind::Statement => "statement_error",
        }
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl ProvisionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProvisionError::Database(err) => classify(err),
            ProvisionError::Config(_) => FailureKind::Fatal,
            ProvisionError::Crypto(_) => FailureKind::Statement,
        }
    }

    pub fn log_and_record(&self, ctx: &str) {
        let current_span = Span::current();
        let kind = self.kind();
        let message = self.to_string();

        match kind {
            FailureKind::Fatal => error!(error = %message, context = %ctx, "Fatal provisioning error"),
            FailureKind::AlreadyExists => {
                warn!(error = %message, context = %ctx, "Object already exists")
            }
            FailureKind::Statement => {
                error!(error = %message, context = %ctx, "Statement rejected")
            }
        }

        if !current_span.is_none() && kind != FailureKind::AlreadyExists {
            current_span.record("error", tracing::field::display(true));
            current_span.record(ERROR_TYPE, tracing::field::display(kind.as_str()));
            current_span.record("error.message", tracing::field::display(&message));
            current_span.record(OTEL_STATUS_CODE, tracing::field::display("ERROR"));
        }
    }
}

impl From<bcrypt::BcryptError> for ProvisionError {
    fn from(error: bcrypt::BcryptError) -> Self {
        ProvisionError::Crypto(error.to_string())
    }
}

/// Sorts a driver error into the provisioner's recovery policy.
pub fn classify(err: &sqlx::Error) -> FailureKind {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => FailureKind::Fatal,
        sqlx::Error::Database(db_err) => {
            if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
                return match mysql_err.number() {
                    ER_DB_CREATE_EXISTS | ER_TABLE_EXISTS_ERROR => FailureKind::AlreadyExists,
                    _ => FailureKind::Statement,
                };
            }
            if SQLITE_EXISTS.is_match(db_err.message()) {
                FailureKind::AlreadyExists
            } else {
                FailureKind::Statement
            }
        }
        _ => FailureKind::Statement,
    }
}
