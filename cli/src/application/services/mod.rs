//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`: never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod cleanup_service;
pub mod images;
pub mod instances;
pub mod provision;
pub mod remote;
pub mod run_job;
pub mod transfer;
