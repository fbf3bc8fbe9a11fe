//! Unit tests for the cjob CLI
//!
//! These tests use in-memory fakes for the provider, filesystem, object
//! store and process runner, and run fast without external I/O.

mod helpers;

mod architecture;
mod images_service;
mod instances_service;
mod transfer_service;
