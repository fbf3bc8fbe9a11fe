use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::{self, NameError};

/// Provider-reported lifecycle state of a compute instance.
///
/// Transitions are driven by the provider and only observed here:
/// `pending -> running -> {stopping -> stopped, shutting-down -> terminated,
/// rebooting -> running}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    Terminated,
    ShuttingDown,
    Rebooting,
}

impl InstanceState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Terminated => "terminated",
            Self::ShuttingDown => "shutting-down",
            Self::Rebooting => "rebooting",
        }
    }

    /// Only a running instance accepts ssh sessions or counts as "already up".
    #[must_use]
    pub fn is_usable(self) -> bool {
        self == Self::Running
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool-managed compute instance.
///
/// Construction fails for names without the reserved prefix, so a value of
/// this type is always a managed instance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JobInstance {
    id: String,
    name: String,
    instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_ip: Option<String>,
    state: InstanceState,
    launched_at: DateTime<Utc>,
}

impl JobInstance {
    /// Build a managed instance record.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::MissingPrefix`] if `name` is not a managed name.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        instance_type: impl Into<String>,
        public_ip: Option<String>,
        state: InstanceState,
        launched_at: DateTime<Utc>,
    ) -> Result<Self, NameError> {
        let name = name.into();
        if !naming::has_prefix(&name) {
            return Err(NameError::MissingPrefix(name));
        }
        Ok(Self {
            id: id.into(),
            name,
            instance_type: instance_type.into(),
            public_ip,
            state,
            launched_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full managed name, including the prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Job name as the user typed it.
    #[must_use]
    pub fn job(&self) -> &str {
        naming::strip_prefix(&self.name).unwrap_or(&self.name)
    }

    #[must_use]
    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    #[must_use]
    pub fn public_ip(&self) -> Option<&str> {
        self.public_ip.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> InstanceState {
        self.state
    }

    #[must_use]
    pub fn launched_at(&self) -> DateTime<Utc> {
        self.launched_at
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_usable()
    }

    /// Time since launch. Negative skew from the provider clock clamps to zero.
    #[must_use]
    pub fn uptime(&self, now: DateTime<Utc>) -> Duration {
        (now - self.launched_at).max(Duration::zero())
    }
}

/// Machine-readable `cjob status --json` payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    pub instances: Vec<JobInstance>,
    /// Job names with more than one live instance.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<String>,
}
