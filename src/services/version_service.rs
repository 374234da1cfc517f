//! Version lifecycle orchestrator.
//!
//! The only component with business logic: every mutating operation runs
//! inside one transaction that covers the status read, all rule checks,
//! every write, and the audit append. The version row is read `FOR UPDATE`
//! so racing callers serialize at the storage layer; of two concurrent
//! `validate` calls exactly one wins and the loser observes Ready.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::artifact::{Artifact, ArtifactKind, ArtifactTrack};
use crate::models::version::{Version, VersionStatus};
use crate::services::audit_service::{self, AuditAction};
use crate::services::{job_service, outbox_service};
use crate::storage::OutboxStore;

const VERSION_COLUMNS: &str = "id, client, product, version_number, build_date, status, \
                               responsible, branch, release_notes_path, created_at, updated_at";

/// Request to register a new version.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterVersionRequest {
    pub client: String,
    pub product: String,
    pub version_number: String,
    /// 8-digit `YYYYMMDD` build date
    pub build_date: String,
    pub responsible: String,
    pub branch: Option<String>,
}

/// Request to attach an artifact to a version.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachArtifactRequest {
    /// One of `binary`, `package`, `document`
    pub kind: String,
    /// One of `base`, `increment`
    pub track: String,
    pub original_name: String,
    pub final_name: Option<String>,
    pub dest_path: Option<String>,
    pub size_bytes: Option<i64>,
    pub checksum_md5: Option<String>,
    pub uploaded_url: Option<String>,
}

/// Version lifecycle service
pub struct VersionService {
    db: PgPool,
    outbox: Arc<dyn OutboxStore>,
}

impl VersionService {
    pub fn new(db: PgPool, outbox: Arc<dyn OutboxStore>) -> Self {
        Self { db, outbox }
    }

    /// Register a new version in Draft status.
    pub async fn register(&self, req: RegisterVersionRequest) -> Result<Version> {
        validate_register_input(&req)?;

        let identity = format!(
            "{}/{}/{} (build {})",
            req.client, req.product, req.version_number, req.build_date
        );

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM versions
            WHERE client = $1 AND product = $2 AND version_number = $3 AND build_date = $4
            "#,
        )
        .bind(&req.client)
        .bind(&req.product)
        .bind(&req.version_number)
        .bind(&req.build_date)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_some() {
            return Err(AppError::DuplicateVersion(identity));
        }

        let version = sqlx::query_as::<_, Version>(&format!(
            r#"
            INSERT INTO versions (id, client, product, version_number, build_date, responsible, branch)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VERSION_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&req.client)
        .bind(&req.product)
        .bind(&req.version_number)
        .bind(&req.build_date)
        .bind(&req.responsible)
        .bind(&req.branch)
        .fetch_one(&mut *tx)
        .await
        // The unique constraint closes the race the pre-check leaves open.
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateVersion(identity.clone())
            }
            _ => AppError::Database(e),
        })?;

        audit_service::record(
            &mut tx,
            version.id,
            AuditAction::VersionRegistered,
            &version.responsible,
            Some("registered in draft status"),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(version_id = %version.id, client = %version.client, "Version registered");
        Ok(version)
    }

    /// Attach an artifact to a version in Draft or Ready status.
    pub async fn attach_artifact(
        &self,
        version_id: Uuid,
        req: AttachArtifactRequest,
        actor: &str,
    ) -> Result<Artifact> {
        if req.original_name.trim().is_empty() {
            return Err(AppError::Validation(
                "original_name must not be empty".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let version = lock_version(&mut tx, version_id).await?;
        if !version.status.accepts_artifacts() {
            return Err(AppError::InvalidState(format!(
                "artifacts can only be attached in draft or ready status, version is {}",
                version.status.as_str()
            )));
        }

        let kind = ArtifactKind::parse(&req.kind)?;
        let track = ArtifactTrack::parse(&req.track)?;

        let artifact = sqlx::query_as::<_, Artifact>(
            r#"
            INSERT INTO artifacts (id, version_id, kind, track, original_name,
                                   final_name, dest_path, size_bytes, checksum_md5, uploaded_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, version_id, kind, track, original_name, final_name,
                      dest_path, size_bytes, checksum_md5, uploaded_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(version_id)
        .bind(kind)
        .bind(track)
        .bind(&req.original_name)
        .bind(&req.final_name)
        .bind(&req.dest_path)
        .bind(req.size_bytes)
        .bind(&req.checksum_md5)
        .bind(&req.uploaded_url)
        .fetch_one(&mut *tx)
        .await?;

        let detail = format!(
            "kind={}, track={}, name={}",
            kind.as_str(),
            track.as_str(),
            req.original_name
        );
        audit_service::record(
            &mut tx,
            version_id,
            AuditAction::ArtifactAttached,
            actor,
            Some(&detail),
        )
        .await?;

        tx.commit().await?;

        Ok(artifact)
    }

    /// Validate a Draft version, transitioning it to Ready.
    pub async fn validate(&self, version_id: Uuid, actor: &str) -> Result<Version> {
        let mut tx = self.db.begin().await?;

        let version = lock_version(&mut tx, version_id).await?;
        if version.status != VersionStatus::Draft {
            return Err(AppError::InvalidState(format!(
                "validation is only allowed from draft status, version is {}",
                version.status.as_str()
            )));
        }

        let artifacts = sqlx::query_as::<_, (ArtifactKind, ArtifactTrack)>(
            "SELECT kind, track FROM artifacts WHERE version_id = $1",
        )
        .bind(version_id)
        .fetch_all(&mut *tx)
        .await?;

        if artifacts.is_empty() {
            return Err(AppError::NoArtifacts(version_id));
        }
        if !release_complete(&artifacts) {
            return Err(AppError::ArtifactRule(
                "at least one binary artifact is required on each of the base and increment tracks"
                    .to_string(),
            ));
        }

        let version = transition(&mut tx, version_id, VersionStatus::Ready).await?;

        audit_service::record(
            &mut tx,
            version_id,
            AuditAction::VersionValidated,
            actor,
            Some("status -> ready"),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(version_id = %version_id, "Version validated");
        Ok(version)
    }

    /// Publish a Ready version.
    ///
    /// All-or-nothing: job enqueueing, draft synthesis, notice file
    /// materialization, the status transition, and the audit append commit
    /// together or not at all.
    pub async fn publish(&self, version_id: Uuid, actor: &str) -> Result<Version> {
        let mut tx = self.db.begin().await?;

        let version = lock_version(&mut tx, version_id).await?;
        if version.status != VersionStatus::Ready {
            return Err(AppError::InvalidState(format!(
                "publication is only allowed from ready status, version is {}",
                version.status.as_str()
            )));
        }

        job_service::enqueue(
            &mut tx,
            version_id,
            "COPY_ARTIFACTS",
            &format!("copy_{version_id}"),
        )
        .await?;
        job_service::enqueue(
            &mut tx,
            version_id,
            "COMPUTE_MD5",
            &format!("md5_{version_id}"),
        )
        .await?;
        job_service::enqueue(
            &mut tx,
            version_id,
            "GEN_OUTBOX",
            &format!("outbox_{version_id}"),
        )
        .await?;

        outbox_service::generate(&mut tx, self.outbox.as_ref(), &version).await?;

        let version = transition(&mut tx, version_id, VersionStatus::Published).await?;

        audit_service::record(
            &mut tx,
            version_id,
            AuditAction::VersionPublished,
            actor,
            Some("status -> published, outbox notice generated"),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(version_id = %version_id, "Version published");
        Ok(version)
    }

    /// Get a version by ID.
    pub async fn get(&self, version_id: Uuid) -> Result<Version> {
        sqlx::query_as::<_, Version>(&format!(
            "SELECT {VERSION_COLUMNS} FROM versions WHERE id = $1"
        ))
        .bind(version_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::VersionNotFound(version_id))
    }

    /// List versions with optional filters and pagination, newest first.
    pub async fn list(
        &self,
        client: Option<&str>,
        product: Option<&str>,
        status: Option<VersionStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Version>, i64)> {
        let versions = sqlx::query_as::<_, Version>(&format!(
            r#"
            SELECT {VERSION_COLUMNS}
            FROM versions
            WHERE ($1::text IS NULL OR client = $1)
              AND ($2::text IS NULL OR product = $2)
              AND ($3::version_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            OFFSET $4
            LIMIT $5
            "#,
        ))
        .bind(client)
        .bind(product)
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM versions
            WHERE ($1::text IS NULL OR client = $1)
              AND ($2::text IS NULL OR product = $2)
              AND ($3::version_status IS NULL OR status = $3)
            "#,
        )
        .bind(client)
        .bind(product)
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        Ok((versions, total))
    }

    /// Artifacts attached to a version, oldest first.
    pub async fn artifacts_for(&self, version_id: Uuid) -> Result<Vec<Artifact>> {
        // Resolve the version first so an unknown id is a 404, not [].
        self.get(version_id).await?;

        let artifacts = sqlx::query_as::<_, Artifact>(
            r#"
            SELECT id, version_id, kind, track, original_name, final_name,
                   dest_path, size_bytes, checksum_md5, uploaded_url, created_at
            FROM artifacts
            WHERE version_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(version_id)
        .fetch_all(&self.db)
        .await?;

        Ok(artifacts)
    }
}

/// Read the version row under a row lock, serializing concurrent callers.
async fn lock_version(conn: &mut PgConnection, version_id: Uuid) -> Result<Version> {
    sqlx::query_as::<_, Version>(&format!(
        "SELECT {VERSION_COLUMNS} FROM versions WHERE id = $1 FOR UPDATE"
    ))
    .bind(version_id)
    .fetch_optional(conn)
    .await?
    .ok_or(AppError::VersionNotFound(version_id))
}

/// Move a version to the next lifecycle status and bump `updated_at`.
async fn transition(
    conn: &mut PgConnection,
    version_id: Uuid,
    status: VersionStatus,
) -> Result<Version> {
    let version = sqlx::query_as::<_, Version>(&format!(
        r#"
        UPDATE versions SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {VERSION_COLUMNS}
        "#,
    ))
    .bind(version_id)
    .bind(status)
    .fetch_one(conn)
    .await?;

    Ok(version)
}

/// Release completeness gate: at least one binary on each track.
fn release_complete(artifacts: &[(ArtifactKind, ArtifactTrack)]) -> bool {
    let has_base_binary = artifacts
        .iter()
        .any(|(k, t)| *k == ArtifactKind::Binary && *t == ArtifactTrack::Base);
    let has_increment_binary = artifacts
        .iter()
        .any(|(k, t)| *k == ArtifactKind::Binary && *t == ArtifactTrack::Increment);
    has_base_binary && has_increment_binary
}

fn validate_register_input(req: &RegisterVersionRequest) -> Result<()> {
    for (field, value) in [
        ("client", &req.client),
        ("product", &req.product),
        ("version_number", &req.version_number),
        ("responsible", &req.responsible),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} must not be empty")));
        }
    }

    let is_eight_digits =
        req.build_date.len() == 8 && req.build_date.chars().all(|c| c.is_ascii_digit());
    if !is_eight_digits || NaiveDate::parse_from_str(&req.build_date, "%Y%m%d").is_err() {
        return Err(AppError::Validation(
            "build_date must be an 8-digit calendar date (YYYYMMDD)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterVersionRequest {
        RegisterVersionRequest {
            client: "Acme".to_string(),
            product: "Core".to_string(),
            version_number: "1.2.0".to_string(),
            build_date: "20240115".to_string(),
            responsible: "jdoe".to_string(),
            branch: None,
        }
    }

    #[test]
    fn test_register_input_accepts_valid_request() {
        assert!(validate_register_input(&register_request()).is_ok());
    }

    #[test]
    fn test_register_input_rejects_empty_fields() {
        for field in ["client", "product", "version_number", "responsible"] {
            let mut req = register_request();
            match field {
                "client" => req.client = "  ".to_string(),
                "product" => req.product = String::new(),
                "version_number" => req.version_number = String::new(),
                _ => req.responsible = "\t".to_string(),
            }
            let err = validate_register_input(&req).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "field: {field}");
        }
    }

    #[test]
    fn test_register_input_rejects_malformed_build_dates() {
        for build_date in ["2024011", "202401155", "2024-01-15", "abcdefgh", ""] {
            let mut req = register_request();
            req.build_date = build_date.to_string();
            assert!(
                validate_register_input(&req).is_err(),
                "build_date: {build_date:?}"
            );
        }
    }

    #[test]
    fn test_register_input_rejects_impossible_calendar_dates() {
        for build_date in ["20241301", "20240230", "20240000"] {
            let mut req = register_request();
            req.build_date = build_date.to_string();
            assert!(
                validate_register_input(&req).is_err(),
                "build_date: {build_date:?}"
            );
        }
        // Leap day is a real date.
        let mut req = register_request();
        req.build_date = "20240229".to_string();
        assert!(validate_register_input(&req).is_ok());
    }

    #[test]
    fn test_release_complete_requires_binary_on_both_tracks() {
        use ArtifactKind::*;
        use ArtifactTrack::*;

        assert!(release_complete(&[(Binary, Base), (Binary, Increment)]));
        assert!(release_complete(&[
            (Document, Base),
            (Binary, Increment),
            (Binary, Base),
            (Package, Increment),
        ]));

        assert!(!release_complete(&[]));
        assert!(!release_complete(&[(Binary, Base)]));
        assert!(!release_complete(&[(Binary, Increment)]));
        // Non-binary artifacts do not satisfy either side of the gate.
        assert!(!release_complete(&[(Package, Base), (Binary, Increment)]));
        assert!(!release_complete(&[(Binary, Base), (Document, Increment)]));
        assert!(!release_complete(&[(Package, Base), (Document, Increment)]));
    }
}
