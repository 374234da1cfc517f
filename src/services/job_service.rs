//! Job queue service.
//!
//! Enqueue is idempotent: the `job_queue.job_key` unique constraint makes
//! an insert with an existing key a no-op, closing the check-then-insert
//! race. Jobs are created pending and never consumed by this service.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::job::QueuedJob;

/// Idempotently enqueue a job within the caller's transaction.
///
/// Returns `true` when a row was inserted, `false` when the key already
/// existed.
pub async fn enqueue(
    conn: &mut PgConnection,
    version_id: Uuid,
    job_type: &str,
    job_key: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO job_queue (id, version_id, job_type, job_key)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (job_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(version_id)
    .bind(job_type)
    .bind(job_key)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Read side of the job queue
pub struct JobService {
    db: PgPool,
}

impl JobService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Jobs enqueued for a version, oldest first.
    pub async fn list_for_version(&self, version_id: Uuid) -> Result<Vec<QueuedJob>> {
        let jobs = sqlx::query_as::<_, QueuedJob>(
            r#"
            SELECT id, version_id, job_type, job_key, payload, status, priority,
                   attempt, output, error_message, created_at, updated_at
            FROM job_queue
            WHERE version_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(version_id)
        .fetch_all(&self.db)
        .await?;

        Ok(jobs)
    }
}
