//! Application error types and result alias.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application result type alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Request input rejected before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced version does not exist
    #[error("Version not found: {0}")]
    VersionNotFound(Uuid),

    /// A version with the same (client, product, version, build) tuple exists
    #[error("Duplicate version: {0}")]
    DuplicateVersion(String),

    /// Operation not permitted in the version's current lifecycle status
    #[error("Invalid lifecycle state: {0}")]
    InvalidState(String),

    /// Validation requires at least one attached artifact
    #[error("Version {0} has no attached artifacts")]
    NoArtifacts(Uuid),

    /// Artifact set does not satisfy the release completeness rule
    #[error("Artifact rule violation: {0}")]
    ArtifactRule(String),

    /// Artifact kind outside the fixed vocabulary
    #[error("Invalid artifact kind: {0:?}")]
    InvalidKind(String),

    /// Artifact track outside the fixed vocabulary
    #[error("Invalid artifact track: {0:?}")]
    InvalidTrack(String),

    /// Publication notice files could not be materialized
    #[error("Outbox generation failed: {0}")]
    OutboxGeneration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::VersionNotFound(_) => "VERSION_NOT_FOUND",
            AppError::DuplicateVersion(_) => "DUPLICATE_VERSION",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::NoArtifacts(_) => "NO_ARTIFACTS",
            AppError::ArtifactRule(_) => "ARTIFACT_RULE_VIOLATION",
            AppError::InvalidKind(_) => "INVALID_TYPE",
            AppError::InvalidTrack(_) => "INVALID_TRACK",
            AppError::OutboxGeneration(_) => "OUTBOX_GENERATION_FAILED",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::VersionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateVersion(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_)
            | AppError::NoArtifacts(_)
            | AppError::ArtifactRule(_)
            | AppError::InvalidKind(_)
            | AppError::InvalidTrack(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::OutboxGeneration(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Infrastructure details stay out of response bodies.
            AppError::Database(_) => "Database operation failed".to_string(),
            AppError::Migration(_) => "Database migration failed".to_string(),
            AppError::Io(_) => "IO operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Log the error
        tracing::error!(error = %self, code = code, "Request error");

        let body = Json(json!({
            "code": code,
            "message": self.public_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_error_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            AppError::DuplicateVersion("x".into()).code(),
            "DUPLICATE_VERSION"
        );
        assert_eq!(AppError::VersionNotFound(id).code(), "VERSION_NOT_FOUND");
        assert_eq!(AppError::InvalidState("x".into()).code(), "INVALID_STATE");
        assert_eq!(AppError::NoArtifacts(id).code(), "NO_ARTIFACTS");
        assert_eq!(
            AppError::ArtifactRule("x".into()).code(),
            "ARTIFACT_RULE_VIOLATION"
        );
        assert_eq!(AppError::InvalidKind("exe".into()).code(), "INVALID_TYPE");
        assert_eq!(AppError::InvalidTrack("main".into()).code(), "INVALID_TRACK");
        assert_eq!(
            AppError::OutboxGeneration("disk full".into()).code(),
            "OUTBOX_GENERATION_FAILED"
        );
    }

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(
            AppError::DuplicateVersion("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::VersionNotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InvalidState("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::NoArtifacts(id).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::OutboxGeneration("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_database_message_not_leaked() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.public_message(), "Database operation failed");
    }
}
