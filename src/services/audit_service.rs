//! Audit trail service.
//!
//! Every state-changing lifecycle action appends exactly one event. Events
//! are written inside the caller's transaction so an aborted operation
//! leaves no trace, and replayed in `(created_at, seq)` order.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::audit_event::AuditEvent;

/// Lifecycle actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    VersionRegistered,
    ArtifactAttached,
    VersionValidated,
    VersionPublished,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::VersionRegistered => "version_registered",
            AuditAction::ArtifactAttached => "artifact_attached",
            AuditAction::VersionValidated => "version_validated",
            AuditAction::VersionPublished => "version_published",
        }
    }
}

/// Append one audit event within the caller's transaction.
pub async fn record(
    conn: &mut PgConnection,
    version_id: Uuid,
    action: AuditAction,
    actor: &str,
    detail: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_events (id, version_id, action, actor, detail)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(version_id)
    .bind(action.as_str())
    .bind(actor)
    .bind(detail)
    .execute(conn)
    .await?;

    Ok(())
}

/// Read side of the audit trail
pub struct AuditService {
    db: PgPool,
}

impl AuditService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Chronological audit trail for a version, oldest first.
    pub async fn list_for_version(&self, version_id: Uuid) -> Result<Vec<AuditEvent>> {
        let events = sqlx::query_as::<_, AuditEvent>(
            r#"
            SELECT id, seq, version_id, action, actor, origin_host, detail, created_at
            FROM audit_events
            WHERE version_id = $1
            ORDER BY created_at, seq
            "#,
        )
        .bind(version_id)
        .fetch_all(&self.db)
        .await?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_labels() {
        assert_eq!(AuditAction::VersionRegistered.as_str(), "version_registered");
        assert_eq!(AuditAction::ArtifactAttached.as_str(), "artifact_attached");
        assert_eq!(AuditAction::VersionValidated.as_str(), "version_validated");
        assert_eq!(AuditAction::VersionPublished.as_str(), "version_published");
    }
}
