//! Outbox draft model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Messaging channel a draft is prepared for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "draft_channel", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DraftChannel {
    Outbox,
    Outlook,
    Teams,
}

/// Draft dispatch status. No sender exists in this service, so rows stay
/// `Draft`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "draft_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Sent,
    Failed,
}

/// Synthesized publication notice awaiting dispatch.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct OutboxDraft {
    pub id: Uuid,
    pub version_id: Uuid,
    pub channel: DraftChannel,
    pub subject: String,
    pub body: String,
    pub thread_id: Option<String>,
    pub status: DraftStatus,
    pub evidence_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
