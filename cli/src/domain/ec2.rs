//! Provider-side records exchanged with the `ComputeProvider` port.
//!
//! Field names follow the EC2 API's PascalCase JSON so the AWS CLI adapter
//! can deserialize responses straight into these types. Nothing here is
//! filtered by the naming policy; that happens in `crate::domain::instances`.

use chrono::{DateTime, Utc};
use cjob_common::InstanceState;
use serde::{Deserialize, Serialize};

// ── Instances ─────────────────────────────────────────────────────────────────

/// One reservation from `DescribeInstances`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    #[serde(default)]
    pub instances: Vec<ProviderInstance>,
}

/// A raw instance as the provider reports it, managed or not.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderInstance {
    pub instance_id: String,
    pub instance_type: String,
    pub state: StateName,
    pub launch_time: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

impl ProviderInstance {
    /// Value of the `Name` tag, empty when the tag is absent.
    #[must_use]
    pub fn name_tag(&self) -> &str {
        self.tags
            .iter()
            .find(|t| t.key == "Name")
            .map_or("", |t| t.value.as_str())
    }

    /// Public address of the first network interface, if one is associated.
    #[must_use]
    pub fn public_ip(&self) -> Option<&str> {
        self.network_interfaces
            .first()
            .and_then(|ni| ni.association.as_ref())
            .map(|a| a.public_ip.as_str())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateName {
    pub name: InstanceState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterface {
    pub association: Option<Association>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Association {
    pub public_ip: String,
}

// ── Launch ────────────────────────────────────────────────────────────────────

/// Everything `RunInstances` needs to start one job instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub name: String,
    pub image_id: String,
    pub instance_type: String,
    pub security_group_id: String,
    pub key_name: String,
    pub shutdown_behaviour: String,
    pub iam_instance_profile: Option<String>,
    /// Max hourly price when requesting a one-time spot instance.
    pub spot_max_price: Option<f64>,
}

// ── Key pairs ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyPairInfo {
    pub key_name: String,
}

/// Result of `CreateKeyPair`: the only time the private key is ever returned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedKeyPair {
    pub key_name: String,
    pub key_material: String,
}

// ── Security groups ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub ip_permissions: Vec<IpPermission>,
    #[serde(default)]
    pub ip_permissions_egress: Vec<IpPermission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpPermission {
    pub ip_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i32>,
    #[serde(default)]
    pub ip_ranges: Vec<IpRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpRange {
    pub cidr_ip: String,
}

// ── Images ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MachineImage {
    pub image_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// RFC 3339 timestamp string, compared after parsing.
    pub creation_date: String,
}

/// `Name=<name>,Values=<v1>,<v2>` filter for describe calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: &'static str,
    pub values: Vec<String>,
}

// ── Volumes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub volume_id: String,
    pub state: String,
}

impl Volume {
    /// An `available` volume is attached to nothing.
    #[must_use]
    pub fn is_orphaned(&self) -> bool {
        self.state == "available"
    }
}
