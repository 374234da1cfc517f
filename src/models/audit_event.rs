//! Audit trail model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Append-only audit event for a lifecycle action.
///
/// Replay order is `(created_at, seq)`: `seq` is the insertion sequence and
/// breaks ties between rows stamped by a coarse clock.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct AuditEvent {
    pub id: Uuid,
    pub seq: i64,
    pub version_id: Uuid,
    pub action: String,
    pub actor: String,
    pub origin_host: Option<String>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
