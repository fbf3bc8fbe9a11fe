//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cleanup;
pub mod config;
pub mod ec2;
pub mod error;
pub mod image;
pub mod instances;
pub mod keypair;
pub mod security_group;
pub mod ssh;
pub mod transfer;

pub use config::{Credentials, RawSettings, Settings, ShutdownBehaviour, SpotMarket};
pub use error::{ConfigError, KeyLocation, LifecycleError};
