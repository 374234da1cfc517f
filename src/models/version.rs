//! Version model and lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a version. Strictly forward-only:
/// `Draft -> Ready -> Published`, with no rollback path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "version_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Ready,
    Published,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::Ready => "ready",
            VersionStatus::Published => "published",
        }
    }

    /// Parse a storage/API label back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(VersionStatus::Draft),
            "ready" => Some(VersionStatus::Ready),
            "published" => Some(VersionStatus::Published),
            _ => None,
        }
    }

    /// Whether artifacts may still be attached in this status.
    pub fn accepts_artifacts(&self) -> bool {
        matches!(self, VersionStatus::Draft | VersionStatus::Ready)
    }
}

/// Registered version entity
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Version {
    pub id: Uuid,
    pub client: String,
    pub product: String,
    pub version_number: String,
    /// Build date as 8-digit `YYYYMMDD` text
    pub build_date: String,
    pub status: VersionStatus,
    pub responsible: String,
    pub branch: Option<String>,
    pub release_notes_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip() {
        for status in [
            VersionStatus::Draft,
            VersionStatus::Ready,
            VersionStatus::Published,
        ] {
            assert_eq!(VersionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VersionStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_accepts_artifacts_until_published() {
        assert!(VersionStatus::Draft.accepts_artifacts());
        assert!(VersionStatus::Ready.accepts_artifacts());
        assert!(!VersionStatus::Published.accepts_artifacts());
    }
}
