//! Network access rules for job instances.

use crate::domain::ec2::{IpPermission, IpRange, SecurityGroup};

/// Group used when no security group is configured.
pub const DEFAULT_SECURITY_GROUP: &str = "cjob-default";
pub const ANYWHERE: &str = "0.0.0.0/0";
pub const SSH_PORT: i32 = 22;

/// Inbound SSH from anywhere.
#[must_use]
pub fn ssh_ingress() -> IpPermission {
    IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: Some(SSH_PORT),
        to_port: Some(SSH_PORT),
        ip_ranges: vec![IpRange {
            cidr_ip: ANYWHERE.to_string(),
        }],
    }
}

/// All outbound traffic to anywhere.
#[must_use]
pub fn open_egress() -> IpPermission {
    IpPermission {
        ip_protocol: "-1".to_string(),
        from_port: None,
        to_port: None,
        ip_ranges: vec![IpRange {
            cidr_ip: ANYWHERE.to_string(),
        }],
    }
}

fn covers(existing: &IpPermission, wanted: &IpPermission) -> bool {
    existing.ip_protocol == wanted.ip_protocol
        && existing.from_port == wanted.from_port
        && existing.to_port == wanted.to_port
        && wanted
            .ip_ranges
            .iter()
            .all(|r| existing.ip_ranges.contains(r))
}

#[must_use]
pub fn allows_ssh(group: &SecurityGroup) -> bool {
    let wanted = ssh_ingress();
    group.ip_permissions.iter().any(|p| covers(p, &wanted))
}

#[must_use]
pub fn allows_all_egress(group: &SecurityGroup) -> bool {
    let wanted = open_egress();
    group.ip_permissions_egress.iter().any(|p| covers(p, &wanted))
}
