//! Business logic services.

pub mod audit_service;
pub mod job_service;
pub mod outbox_service;
pub mod version_service;
