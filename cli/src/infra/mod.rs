//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the AWS
//! CLI adapters, filesystem access and settings loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod aws_cli;
pub mod command_runner;
pub mod config;
pub mod ec2;
pub mod fs;
pub mod s3;
