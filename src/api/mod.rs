//! API module - HTTP handlers and state.

pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::audit_service::AuditService;
use crate::services::job_service::JobService;
use crate::services::version_service::VersionService;
use crate::storage::OutboxStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: PgPool,
    pub outbox: Arc<dyn OutboxStore>,
}

impl AppState {
    pub fn new(config: Config, db: PgPool, outbox: Arc<dyn OutboxStore>) -> Self {
        Self { config, db, outbox }
    }

    /// Create a VersionService bound to the shared pool and outbox store.
    pub fn create_version_service(&self) -> VersionService {
        VersionService::new(self.db.clone(), self.outbox.clone())
    }

    /// Create an AuditService bound to the shared pool.
    pub fn create_audit_service(&self) -> AuditService {
        AuditService::new(self.db.clone())
    }

    /// Create a JobService bound to the shared pool.
    pub fn create_job_service(&self) -> JobService {
        JobService::new(self.db.clone())
    }
}

pub type SharedState = Arc<AppState>;
