//! Publication outbox synthesis.
//!
//! On publish, a notification draft is synthesized from the version's data
//! and two files are materialized through the outbox store: an RFC-822
//! style notice and a markdown release-notes summary. Subject, body, and
//! file names are deterministic so retried publishes produce identical
//! output.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::draft::OutboxDraft;
use crate::models::version::Version;
use crate::storage::OutboxStore;

/// Subject line of the publication notice.
pub fn notice_subject(version: &Version) -> String {
    format!(
        "PUBLICATION REQUEST {}{} _ {}",
        version.product, version.version_number, version.build_date
    )
}

/// Body of the publication notice.
pub fn notice_body(version: &Version) -> String {
    format!(
        "Release {}{} (build {}) for {}",
        version.product, version.version_number, version.build_date, version.client
    )
}

/// Notice file name, derived from the version id.
pub fn notice_file_name(version_id: Uuid) -> String {
    format!("notice_{version_id}.eml")
}

/// Release-notes file name, derived from the version id.
pub fn release_notes_file_name(version_id: Uuid) -> String {
    format!("release-notes_{version_id}.md")
}

fn render_notice(subject: &str, body: &str) -> String {
    format!("Subject: {subject}\n\n{body}")
}

fn render_release_notes(version: &Version) -> String {
    format!(
        "# Release Notes\n\n- Client: {}\n- Version: {}\n- Build: {}\n",
        version.client, version.version_number, version.build_date
    )
}

/// Synthesize the publication draft for a version.
///
/// Persists one `outbox_drafts` row (channel `outbox`, status `draft`)
/// within the caller's transaction and writes the notice and release-notes
/// files. Any storage failure maps to `OutboxGeneration`, which the caller
/// turns into a full rollback of the publish.
pub async fn generate(
    conn: &mut PgConnection,
    store: &dyn OutboxStore,
    version: &Version,
) -> Result<OutboxDraft> {
    let subject = notice_subject(version);
    let body = notice_body(version);

    store
        .write_text(&notice_file_name(version.id), &render_notice(&subject, &body))
        .await
        .map_err(|e| AppError::OutboxGeneration(e.to_string()))?;
    store
        .write_text(
            &release_notes_file_name(version.id),
            &render_release_notes(version),
        )
        .await
        .map_err(|e| AppError::OutboxGeneration(e.to_string()))?;

    let draft = sqlx::query_as::<_, OutboxDraft>(
        r#"
        INSERT INTO outbox_drafts (id, version_id, subject, body)
        VALUES ($1, $2, $3, $4)
        RETURNING id, version_id, channel, subject, body, thread_id, status,
                  evidence_path, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(version.id)
    .bind(&subject)
    .bind(&body)
    .fetch_one(conn)
    .await?;

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::version::VersionStatus;
    use chrono::Utc;

    fn sample_version() -> Version {
        Version {
            id: Uuid::new_v4(),
            client: "Acme".to_string(),
            product: "Core".to_string(),
            version_number: "1.2.0".to_string(),
            build_date: "20240115".to_string(),
            status: VersionStatus::Ready,
            responsible: "jdoe".to_string(),
            branch: None,
            release_notes_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject_is_deterministic() {
        let version = sample_version();
        assert_eq!(
            notice_subject(&version),
            "PUBLICATION REQUEST Core1.2.0 _ 20240115"
        );
        assert_eq!(notice_subject(&version), notice_subject(&version));
    }

    #[test]
    fn test_body_mentions_client_and_build() {
        let version = sample_version();
        assert_eq!(
            notice_body(&version),
            "Release Core1.2.0 (build 20240115) for Acme"
        );
    }

    #[test]
    fn test_file_names_derive_from_version_id() {
        let id = Uuid::new_v4();
        assert_eq!(notice_file_name(id), format!("notice_{id}.eml"));
        assert_eq!(release_notes_file_name(id), format!("release-notes_{id}.md"));
    }

    #[test]
    fn test_notice_rendering() {
        let rendered = render_notice("SUBJ", "BODY");
        assert_eq!(rendered, "Subject: SUBJ\n\nBODY");
    }

    #[test]
    fn test_release_notes_rendering() {
        let version = sample_version();
        let notes = render_release_notes(&version);
        assert!(notes.starts_with("# Release Notes\n"));
        assert!(notes.contains("- Client: Acme"));
        assert!(notes.contains("- Version: 1.2.0"));
        assert!(notes.contains("- Build: 20240115"));
    }
}
