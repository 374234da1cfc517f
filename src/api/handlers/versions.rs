//! Version lifecycle API handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::dto::{Pagination, PaginationQuery};
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::artifact::Artifact;
use crate::models::audit_event::AuditEvent;
use crate::models::job::QueuedJob;
use crate::models::version::{Version, VersionStatus};
use crate::services::version_service::{AttachArtifactRequest, RegisterVersionRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        register_version,
        list_versions,
        get_version,
        attach_artifact,
        list_artifacts,
        validate_version,
        publish_version,
        list_audit_events,
        list_jobs,
    ),
    components(schemas(
        Version,
        VersionStatus,
        Artifact,
        AuditEvent,
        QueuedJob,
        RegisterVersionRequest,
        AttachArtifactRequest,
        VersionListResponse,
    ))
)]
pub struct VersionsApiDoc;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(register_version).get(list_versions))
        .route("/:id", get(get_version))
        .route("/:id/artifacts", post(attach_artifact).get(list_artifacts))
        .route("/:id/validate", post(validate_version))
        .route("/:id/publish", post(publish_version))
        .route("/:id/audit", get(list_audit_events))
        .route("/:id/jobs", get(list_jobs))
}

/// Acting identity from the `X-Actor` header, defaulting to `system`.
fn actor_from(headers: &HeaderMap) -> String {
    headers
        .get("x-actor")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("system")
        .to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListVersionsQuery {
    /// Filter by client name
    pub client: Option<String>,
    /// Filter by product name
    pub product: Option<String>,
    /// Filter by lifecycle status (draft, ready, published)
    pub status: Option<String>,
    /// Page number, 1-indexed
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionListResponse {
    pub versions: Vec<Version>,
    pub pagination: Pagination,
}

/// POST /api/v1/versions
#[utoipa::path(
    post,
    path = "",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "register_version",
    request_body = RegisterVersionRequest,
    responses(
        (status = 201, description = "Version registered in draft status", body = Version),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Duplicate version"),
    ),
)]
pub async fn register_version(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterVersionRequest>,
) -> Result<(StatusCode, Json<Version>)> {
    let service = state.create_version_service();
    let version = service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// GET /api/v1/versions
#[utoipa::path(
    get,
    path = "",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "list_versions",
    params(ListVersionsQuery),
    responses(
        (status = 200, description = "List registered versions", body = VersionListResponse),
    ),
)]
pub async fn list_versions(
    State(state): State<SharedState>,
    Query(query): Query<ListVersionsQuery>,
) -> Result<Json<VersionListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            VersionStatus::parse(s).ok_or_else(|| {
                AppError::Validation(format!(
                    "status must be one of draft, ready, published (got {s:?})"
                ))
            })
        })
        .transpose()?;

    let pagination_query = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };

    let service = state.create_version_service();
    let (versions, total) = service
        .list(
            query.client.as_deref(),
            query.product.as_deref(),
            status,
            pagination_query.offset(),
            pagination_query.limit(),
        )
        .await?;

    Ok(Json(VersionListResponse {
        versions,
        pagination: Pagination::from_query_and_total(&pagination_query, total),
    }))
}

/// GET /api/v1/versions/:id
#[utoipa::path(
    get,
    path = "/{id}",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "get_version",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Version details", body = Version),
        (status = 404, description = "Version not found"),
    ),
)]
pub async fn get_version(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Version>> {
    let service = state.create_version_service();
    let version = service.get(id).await?;
    Ok(Json(version))
}

/// POST /api/v1/versions/:id/artifacts
#[utoipa::path(
    post,
    path = "/{id}/artifacts",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "attach_artifact",
    params(("id" = Uuid, Path, description = "Version ID")),
    request_body = AttachArtifactRequest,
    responses(
        (status = 201, description = "Artifact attached", body = Artifact),
        (status = 404, description = "Version not found"),
        (status = 422, description = "Invalid state, kind, or track"),
    ),
)]
pub async fn attach_artifact(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<AttachArtifactRequest>,
) -> Result<(StatusCode, Json<Artifact>)> {
    let actor = actor_from(&headers);
    let service = state.create_version_service();
    let artifact = service.attach_artifact(id, payload, &actor).await?;
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// GET /api/v1/versions/:id/artifacts
#[utoipa::path(
    get,
    path = "/{id}/artifacts",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "list_artifacts",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Artifacts attached to the version", body = Vec<Artifact>),
        (status = 404, description = "Version not found"),
    ),
)]
pub async fn list_artifacts(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Artifact>>> {
    let service = state.create_version_service();
    let artifacts = service.artifacts_for(id).await?;
    Ok(Json(artifacts))
}

/// POST /api/v1/versions/:id/validate
#[utoipa::path(
    post,
    path = "/{id}/validate",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "validate_version",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Version transitioned to ready", body = Version),
        (status = 404, description = "Version not found"),
        (status = 422, description = "Invalid state or incomplete artifact set"),
    ),
)]
pub async fn validate_version(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Version>> {
    let actor = actor_from(&headers);
    let service = state.create_version_service();
    let version = service.validate(id, &actor).await?;
    Ok(Json(version))
}

/// POST /api/v1/versions/:id/publish
#[utoipa::path(
    post,
    path = "/{id}/publish",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "publish_version",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Version published", body = Version),
        (status = 404, description = "Version not found"),
        (status = 422, description = "Version is not ready"),
        (status = 502, description = "Outbox generation failed"),
    ),
)]
pub async fn publish_version(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Version>> {
    let actor = actor_from(&headers);
    let service = state.create_version_service();
    let version = service.publish(id, &actor).await?;
    Ok(Json(version))
}

/// GET /api/v1/versions/:id/audit
#[utoipa::path(
    get,
    path = "/{id}/audit",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "list_audit_events",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Audit trail, oldest first", body = Vec<AuditEvent>),
        (status = 404, description = "Version not found"),
    ),
)]
pub async fn list_audit_events(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuditEvent>>> {
    // Resolve the version first so an unknown id is a 404.
    state.create_version_service().get(id).await?;
    let events = state.create_audit_service().list_for_version(id).await?;
    Ok(Json(events))
}

/// GET /api/v1/versions/:id/jobs
#[utoipa::path(
    get,
    path = "/{id}/jobs",
    context_path = "/api/v1/versions",
    tag = "versions",
    operation_id = "list_jobs",
    params(("id" = Uuid, Path, description = "Version ID")),
    responses(
        (status = 200, description = "Jobs enqueued for the version", body = Vec<QueuedJob>),
        (status = 404, description = "Version not found"),
    ),
)]
pub async fn list_jobs(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<QueuedJob>>> {
    state.create_version_service().get(id).await?;
    let jobs = state.create_job_service().list_for_version(id).await?;
    Ok(Json(jobs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_defaults_to_system() {
        let headers = HeaderMap::new();
        assert_eq!(actor_from(&headers), "system");
    }

    #[test]
    fn test_actor_read_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-actor", "jdoe".parse().unwrap());
        assert_eq!(actor_from(&headers), "jdoe");
    }

    #[test]
    fn test_blank_actor_header_falls_back_to_system() {
        let mut headers = HeaderMap::new();
        headers.insert("x-actor", "   ".parse().unwrap());
        assert_eq!(actor_from(&headers), "system");
    }
}
