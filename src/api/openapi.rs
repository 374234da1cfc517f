//! OpenAPI specification generated from handler annotations via utoipa.

use utoipa::OpenApi;

use super::handlers;

/// Top-level OpenAPI document for the Release Ledger API.
///
/// Each handler module contributes its own paths and schemas via a
/// per-module `#[derive(OpenApi)]` struct merged into this root document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Release Ledger API",
        description = "Version lifecycle tracking: registration, artifact attachment, validation, publication.",
        version = "0.1.0",
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "versions", description = "Version lifecycle operations"),
        (name = "health", description = "Health and readiness checks"),
    ),
    components(schemas(ErrorResponse))
)]
pub struct ApiDoc;

/// Standard error response body returned by all endpoints on failure.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "VERSION_NOT_FOUND", "INVALID_STATE")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Build the merged OpenAPI document.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(handlers::versions::VersionsApiDoc::openapi());
    doc.merge(handlers::health::HealthApiDoc::openapi());
    doc
}
