//! Human-readable terminal renderer.

use chrono::{DateTime, Duration, Utc};
use cjob_common::JobInstance;
use owo_colors::OwoColorize as _;

use crate::domain::cleanup::CleanupDecision;
use crate::domain::config::{Credentials, Settings};
use crate::output::OutputContext;

const STATUS_HEADERS: [&str; 6] = ["NAME", "ID", "TYPE", "STATE", "IP", "LAUNCHED"];

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the managed instance table, then any duplicate-name warnings.
    pub fn render_status(
        &self,
        instances: &[JobInstance],
        duplicates: &[String],
        now: DateTime<Utc>,
    ) {
        if instances.is_empty() {
            self.ctx.info("No job instances running.");
            return;
        }

        let rows: Vec<[String; 6]> = instances.iter().map(|i| status_row(i, now)).collect();
        let widths = column_widths(&rows);

        let header = pad_row(&STATUS_HEADERS.map(String::from), &widths);
        println!("  {}", header.style(self.ctx.styles.header));
        for (row, instance) in rows.iter().zip(instances) {
            let state_style = self.ctx.styles.state(instance.state());
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(col, (cell, w))| {
                    let padded = format!("{cell:<w$}");
                    if col == 3 {
                        padded.style(state_style).to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            println!("  {}", cells.join("  ").trim_end());
        }

        for name in duplicates {
            self.ctx.warn(&format!(
                "More than one live instance is named {name}; commands act on the first one listed."
            ));
        }
    }

    /// Render validated settings with secrets redacted.
    pub fn render_settings(&self, settings: &Settings) {
        for (key, value) in settings_rows(settings) {
            self.ctx.kv(&format!("{key:<26}"), &value);
        }
    }

    /// Render what a cleanup pass selected, or that there was nothing to do.
    pub fn render_cleanup(&self, decision: &CleanupDecision, dry_run: bool) {
        let verb = if dry_run { "Would terminate" } else { "Terminated" };
        for expired in &decision.instances {
            self.ctx.success(&format!(
                "{verb} {} ({}) after {}h",
                expired.name, expired.id, expired.uptime_hours
            ));
        }
        let verb = if dry_run { "Would delete" } else { "Deleted" };
        for volume in &decision.volumes {
            self.ctx.success(&format!("{verb} volume {volume}"));
        }
        if decision.is_empty() {
            self.ctx.info("Nothing to clean up.");
        }
    }

    /// Print one key per line, unstyled so the output pipes cleanly.
    pub fn render_keys(&self, keys: &[String]) {
        for key in keys {
            println!("{key}");
        }
    }
}

/// One status table row.
#[must_use]
pub fn status_row(instance: &JobInstance, now: DateTime<Utc>) -> [String; 6] {
    [
        instance.job().to_string(),
        instance.id().to_string(),
        instance.instance_type().to_string(),
        instance.state().to_string(),
        instance.public_ip().unwrap_or("-").to_string(),
        format_age(instance.uptime(now)),
    ]
}

/// `"3h 12m ago"`, with whole hours and minutes.
#[must_use]
pub fn format_age(age: Duration) -> String {
    let minutes = age.num_minutes().max(0);
    format!("{}h {}m ago", minutes / 60, minutes % 60)
}

fn column_widths(rows: &[[String; 6]]) -> [usize; 6] {
    let mut widths = STATUS_HEADERS.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn pad_row(row: &[String; 6], widths: &[usize; 6]) -> String {
    row.iter()
        .zip(widths.iter().copied())
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Settings as display rows. Secrets never appear.
#[must_use]
pub fn settings_rows(settings: &Settings) -> Vec<(&'static str, String)> {
    let none = || "-".to_string();
    let mut rows = vec![("AWS_REGION", settings.region.clone())];
    match &settings.credentials {
        Credentials::Profile(profile) => rows.push(("AWS_PROFILE", profile.clone())),
        Credentials::Static { access_key_id, .. } => {
            rows.push(("AWS_ACCESS_KEY_ID", access_key_id.clone()));
            rows.push(("AWS_SECRET_ACCESS_KEY", "********".to_string()));
        }
    }
    rows.extend([
        ("EC2_INSTANCE_TYPE", settings.instance_type.clone()),
        ("EC2_KEY_FILE_PATH", settings.key_file_path.display().to_string()),
        ("EC2_AMI", settings.image_id.clone().unwrap_or_else(|| "latest".to_string())),
        ("EC2_SECURITY_GROUP", settings.security_group.clone().unwrap_or_else(none)),
        ("EC2_USE_SPOT", settings.spot.is_some().to_string()),
        (
            "EC2_SPOT_MAX_PRICE",
            settings.spot.map_or_else(none, |s| s.max_price.to_string()),
        ),
        (
            "EC2_IAM_INSTANCE_PROFILE",
            settings.iam_instance_profile.clone().unwrap_or_else(none),
        ),
        ("EC2_MAX_HOURS", settings.max_hours.to_string()),
        (
            "EC2_PROTECTED_INSTANCES",
            if settings.protected_instances.is_empty() {
                none()
            } else {
                settings.protected_instances.join(", ")
            },
        ),
        ("EC2_SHUTDOWN_BEHAVIOUR", settings.shutdown_behaviour.as_str().to_string()),
        ("EC2_BOOT_WAIT_SECS", settings.boot_wait_secs.to_string()),
        ("EC2_SSH_USER", settings.ssh_user.clone()),
        ("S3_BUCKET_NAME", settings.bucket.clone().unwrap_or_else(none)),
        ("S3_TRANSFER_ATTEMPTS", settings.transfer_attempts.to_string()),
    ]);
    rows
}
