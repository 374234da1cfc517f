//! Job queue model.
//!
//! Jobs are inert rows in this service: publish enqueues them and nothing
//! in-process consumes them. A worker claiming and advancing status lives
//! outside this backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Job execution status. Only `Pending` is ever written by this service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Job scheduling priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "job_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Low,
    Normal,
    High,
}

/// Queued work item, deduplicated by `job_key`.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct QueuedJob {
    pub id: Uuid,
    pub version_id: Uuid,
    /// Free-form job type label, e.g. `COPY_ARTIFACTS`
    pub job_type: String,
    /// Idempotency key; globally unique at the storage layer
    pub job_key: String,
    #[schema(value_type = Option<Object>)]
    pub payload: Option<serde_json::Value>,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub attempt: i32,
    #[schema(value_type = Option<Object>)]
    pub output: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
