//! Artifact model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Artifact kind. Fixed vocabulary validated at attach time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "artifact_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Binary,
    Package,
    Document,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Binary => "binary",
            ArtifactKind::Package => "package",
            ArtifactKind::Document => "document",
        }
    }

    /// Parse an API label, rejecting anything outside the fixed set.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "binary" => Ok(ArtifactKind::Binary),
            "package" => Ok(ArtifactKind::Package),
            "document" => Ok(ArtifactKind::Document),
            other => Err(AppError::InvalidKind(other.to_string())),
        }
    }
}

/// Artifact track: one of the two parallel lineages a release supplies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "artifact_track", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArtifactTrack {
    Base,
    Increment,
}

impl ArtifactTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactTrack::Base => "base",
            ArtifactTrack::Increment => "increment",
        }
    }

    /// Parse an API label, rejecting anything outside the fixed set.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "base" => Ok(ArtifactTrack::Base),
            "increment" => Ok(ArtifactTrack::Increment),
            other => Err(AppError::InvalidTrack(other.to_string())),
        }
    }
}

/// Attached build artifact. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Artifact {
    pub id: Uuid,
    pub version_id: Uuid,
    pub kind: ArtifactKind,
    pub track: ArtifactTrack,
    pub original_name: String,
    pub final_name: Option<String>,
    pub dest_path: Option<String>,
    pub size_bytes: Option<i64>,
    pub checksum_md5: Option<String>,
    pub uploaded_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_accepts_fixed_set() {
        assert_eq!(ArtifactKind::parse("binary").unwrap(), ArtifactKind::Binary);
        assert_eq!(
            ArtifactKind::parse("package").unwrap(),
            ArtifactKind::Package
        );
        assert_eq!(
            ArtifactKind::parse("document").unwrap(),
            ArtifactKind::Document
        );
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        let err = ArtifactKind::parse("exe").unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");
        // Labels are case-sensitive at the boundary.
        assert!(ArtifactKind::parse("Binary").is_err());
    }

    #[test]
    fn test_track_parse_accepts_fixed_set() {
        assert_eq!(ArtifactTrack::parse("base").unwrap(), ArtifactTrack::Base);
        assert_eq!(
            ArtifactTrack::parse("increment").unwrap(),
            ArtifactTrack::Increment
        );
    }

    #[test]
    fn test_track_parse_rejects_unknown() {
        let err = ArtifactTrack::parse("main").unwrap_err();
        assert_eq!(err.code(), "INVALID_TRACK");
    }

    #[test]
    fn test_labels_round_trip() {
        for kind in [
            ArtifactKind::Binary,
            ArtifactKind::Package,
            ArtifactKind::Document,
        ] {
            assert_eq!(ArtifactKind::parse(kind.as_str()).unwrap(), kind);
        }
        for track in [ArtifactTrack::Base, ArtifactTrack::Increment] {
            assert_eq!(ArtifactTrack::parse(track.as_str()).unwrap(), track);
        }
    }
}
