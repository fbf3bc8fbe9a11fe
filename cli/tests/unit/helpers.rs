//! Shared test helpers: exit statuses, canned outputs, and record builders.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use chrono::{DateTime, Duration, TimeZone, Utc};
use cjob_cli::domain::config::{Credentials, Settings, ShutdownBehaviour};
use cjob_cli::domain::ec2::{
    Association, MachineImage, NetworkInterface, ProviderInstance, StateName, Tag, Volume,
};
use cjob_common::InstanceState;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

/// Fixed clock used across service tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A raw provider instance launched `hours` before [`now`]. `None` means no
/// `Name` tag.
pub fn instance(id: &str, name: Option<&str>, state: InstanceState, hours: i64) -> ProviderInstance {
    ProviderInstance {
        instance_id: id.to_string(),
        instance_type: "t3.small".to_string(),
        state: StateName { name: state },
        launch_time: now() - Duration::hours(hours),
        tags: name
            .map(|n| {
                vec![Tag {
                    key: "Name".to_string(),
                    value: n.to_string(),
                }]
            })
            .unwrap_or_default(),
        network_interfaces: vec![NetworkInterface {
            association: (state == InstanceState::Running).then(|| Association {
                public_ip: "203.0.113.10".to_string(),
            }),
        }],
    }
}

pub fn image(id: &str, created: &str) -> MachineImage {
    MachineImage {
        image_id: id.to_string(),
        name: Some(format!("ubuntu/images/{id}")),
        creation_date: created.to_string(),
    }
}

pub fn volume(id: &str, state: &str) -> Volume {
    Volume {
        volume_id: id.to_string(),
        state: state.to_string(),
    }
}

/// Minimal valid settings using a named profile and `key_file_path`.
pub fn settings(key_file_path: impl Into<PathBuf>) -> Settings {
    Settings {
        region: "eu-west-1".to_string(),
        credentials: Credentials::Profile("default".to_string()),
        instance_type: "t3.small".to_string(),
        key_file_path: key_file_path.into(),
        image_id: None,
        security_group: None,
        spot: None,
        iam_instance_profile: None,
        max_hours: 8,
        protected_instances: Vec::new(),
        shutdown_behaviour: ShutdownBehaviour::Terminate,
        bucket: Some("jobs-bucket".to_string()),
        boot_wait_secs: 0,
        ssh_user: "ubuntu".to_string(),
        transfer_attempts: 3,
    }
}
