//! Domain types and validators for cjob settings.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The file
//! loader in `crate::infra::config` reads YAML into [`RawSettings`] and this
//! module turns it into a validated [`Settings`] value.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const CONFIG_FILE_NAMES: &[&str] = &["cjob.yml", "cjob.yaml"];
pub const VALID_SHUTDOWN_BEHAVIOURS: &str = "terminate, stop";

const DEFAULT_MAX_HOURS: u32 = 8;
const DEFAULT_BOOT_WAIT_SECS: u64 = 60;
const DEFAULT_SSH_USER: &str = "ubuntu";
const DEFAULT_TRANSFER_ATTEMPTS: u32 = 5;

// ── File schema ──────────────────────────────────────────────────────────────

/// Settings as written in `cjob.yml`, before validation.
///
/// Keys keep the upper-case names users already have in their config files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    #[serde(rename = "AWS_REGION")]
    pub region: Option<String>,
    #[serde(rename = "AWS_PROFILE")]
    pub profile: Option<String>,
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,
    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: Option<String>,

    #[serde(rename = "EC2_INSTANCE_TYPE")]
    pub instance_type: Option<String>,
    #[serde(rename = "EC2_KEY_FILE_PATH")]
    pub key_file_path: Option<String>,
    #[serde(rename = "EC2_USE_SPOT")]
    pub use_spot: bool,
    #[serde(rename = "EC2_SPOT_MAX_PRICE")]
    pub spot_max_price: Option<f64>,
    #[serde(rename = "EC2_IAM_INSTANCE_PROFILE")]
    pub iam_instance_profile: Option<String>,
    #[serde(rename = "EC2_AMI")]
    pub image_id: Option<String>,
    #[serde(rename = "EC2_SECURITY_GROUP")]
    pub security_group: Option<String>,
    #[serde(rename = "EC2_MAX_HOURS")]
    pub max_hours: Option<u32>,
    #[serde(rename = "EC2_PROTECTED_INSTANCES")]
    pub protected_instances: Vec<String>,
    #[serde(rename = "EC2_SHUTDOWN_BEHAVIOUR")]
    pub shutdown_behaviour: Option<String>,
    #[serde(rename = "EC2_BOOT_WAIT_SECS")]
    pub boot_wait_secs: Option<u64>,
    #[serde(rename = "EC2_SSH_USER")]
    pub ssh_user: Option<String>,

    #[serde(rename = "S3_BUCKET_NAME")]
    pub bucket: Option<String>,
    #[serde(rename = "S3_TRANSFER_ATTEMPTS")]
    pub transfer_attempts: Option<u32>,
}

// ── Validated settings ───────────────────────────────────────────────────────

/// How cjob authenticates to AWS. Exactly one mode is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    Profile(String),
    Static {
        access_key_id: String,
        #[serde(serialize_with = "redact")]
        secret_access_key: String,
    },
}

impl Credentials {
    /// Environment variables to hand to the `aws` CLI child process.
    #[must_use]
    pub fn env_vars(&self) -> Vec<(String, String)> {
        match self {
            Self::Profile(_) => Vec::new(),
            Self::Static {
                access_key_id,
                secret_access_key,
            } => vec![
                ("AWS_ACCESS_KEY_ID".to_string(), access_key_id.clone()),
                ("AWS_SECRET_ACCESS_KEY".to_string(), secret_access_key.clone()),
            ],
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        match self {
            Self::Profile(p) => Some(p),
            Self::Static { .. } => None,
        }
    }
}

/// Spot market request options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotMarket {
    pub max_price: f64,
}

/// What EC2 does when the OS inside the instance shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownBehaviour {
    #[default]
    Terminate,
    Stop,
}

impl ShutdownBehaviour {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
            Self::Stop => "stop",
        }
    }
}

/// Validated settings, passed by reference to every service.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub region: String,
    pub credentials: Credentials,
    pub instance_type: String,
    pub key_file_path: PathBuf,
    pub image_id: Option<String>,
    pub security_group: Option<String>,
    pub spot: Option<SpotMarket>,
    pub iam_instance_profile: Option<String>,
    pub max_hours: u32,
    pub protected_instances: Vec<String>,
    pub shutdown_behaviour: ShutdownBehaviour,
    pub bucket: Option<String>,
    pub boot_wait_secs: u64,
    pub ssh_user: String,
    pub transfer_attempts: u32,
}

impl Settings {
    #[must_use]
    pub fn boot_wait(&self) -> Duration {
        Duration::from_secs(self.boot_wait_secs)
    }

    /// The configured bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBucket`] when no bucket is configured.
    pub fn bucket(&self) -> Result<&str, ConfigError> {
        self.bucket.as_deref().ok_or(ConfigError::MissingBucket)
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let credentials = credentials(
            non_empty(raw.profile),
            non_empty(raw.access_key_id),
            non_empty(raw.secret_access_key),
        )?;

        let spot = match (raw.use_spot, raw.spot_max_price) {
            (false, _) => None,
            (true, Some(price)) if price > 0.0 => Some(SpotMarket { max_price: price }),
            (true, _) => return Err(ConfigError::InvalidSpotPrice),
        };

        let shutdown_behaviour = match raw.shutdown_behaviour.as_deref() {
            None | Some("terminate") => ShutdownBehaviour::Terminate,
            Some("stop") => ShutdownBehaviour::Stop,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "EC2_SHUTDOWN_BEHAVIOUR",
                    value: other.to_string(),
                    valid: VALID_SHUTDOWN_BEHAVIOURS,
                });
            }
        };

        if spot.is_some() && shutdown_behaviour == ShutdownBehaviour::Stop {
            return Err(ConfigError::SpotCannotStop);
        }

        let transfer_attempts = raw.transfer_attempts.unwrap_or(DEFAULT_TRANSFER_ATTEMPTS);
        if transfer_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "S3_TRANSFER_ATTEMPTS",
                value: "0".to_string(),
                valid: "any number >= 1",
            });
        }

        Ok(Self {
            region: required(raw.region, "AWS_REGION")?,
            credentials,
            instance_type: required(raw.instance_type, "EC2_INSTANCE_TYPE")?,
            key_file_path: PathBuf::from(required(raw.key_file_path, "EC2_KEY_FILE_PATH")?),
            image_id: non_empty(raw.image_id),
            security_group: non_empty(raw.security_group),
            spot,
            iam_instance_profile: non_empty(raw.iam_instance_profile),
            max_hours: raw.max_hours.unwrap_or(DEFAULT_MAX_HOURS),
            protected_instances: raw.protected_instances,
            shutdown_behaviour,
            bucket: non_empty(raw.bucket),
            boot_wait_secs: raw.boot_wait_secs.unwrap_or(DEFAULT_BOOT_WAIT_SECS),
            ssh_user: non_empty(raw.ssh_user).unwrap_or_else(|| DEFAULT_SSH_USER.to_string()),
            transfer_attempts,
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

fn credentials(
    profile: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
) -> Result<Credentials, ConfigError> {
    match (profile, access_key_id, secret_access_key) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ConfigError::ConflictingCredentials),
        (Some(profile), None, None) => Ok(Credentials::Profile(profile)),
        (None, Some(access_key_id), Some(secret_access_key)) => Ok(Credentials::Static {
            access_key_id,
            secret_access_key,
        }),
        (None, _, _) => Err(ConfigError::MissingCredentials),
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    non_empty(value).ok_or(ConfigError::InvalidValue {
        key,
        value: String::new(),
        valid: "a non-empty value (required)",
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn redact<S: Serializer>(_: &str, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str("********")
}

// ── Unit tests ───────────────────────────────────────────────────────────────
