//! Infrastructure implementation of the `ComputeProvider` port.
//!
//! `AwsCliProvider<R>` routes every EC2 call through the `aws` CLI. List
//! parameters are passed in the CLI's JSON form so values containing commas
//! or wildcards survive intact.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{CommandRunner, ComputeProvider};
use crate::domain::ec2::{
    CreatedKeyPair, Filter, IpPermission, KeyPairInfo, LaunchRequest, MachineImage, Reservation,
    SecurityGroup, Volume,
};
use crate::infra::aws_cli::AwsCli;

const EC2: &str = "ec2";

pub struct AwsCliProvider<R: CommandRunner> {
    cli: AwsCli<R>,
}

impl<R: CommandRunner> AwsCliProvider<R> {
    pub fn new(runner: R, region: impl Into<String>, profile: Option<String>) -> Self {
        Self {
            cli: AwsCli::new(runner, region, profile),
        }
    }

    async fn act(&self, op: &str, args: &[String]) -> Result<()> {
        self.cli.call(EC2, op, args, None).await.map(|_| ())
    }
}

// ── Response envelopes ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstances {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeKeyPairs {
    #[serde(default)]
    key_pairs: Vec<KeyPairInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSecurityGroups {
    #[serde(default)]
    security_groups: Vec<SecurityGroup>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateSecurityGroup {
    group_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeImages {
    #[serde(default)]
    images: Vec<MachineImage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVolumes {
    #[serde(default)]
    volumes: Vec<Volume>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RunInstances {
    instances: Vec<LaunchedInstance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LaunchedInstance {
    instance_id: String,
}

// ── Argument builders ────────────────────────────────────────────────────────

fn filters_json(filters: &[Filter]) -> String {
    let list: Vec<_> = filters
        .iter()
        .map(|f| json!({ "Name": f.name, "Values": f.values }))
        .collect();
    serde_json::Value::Array(list).to_string()
}

fn name_tag_spec(resource_type: &str, name: &str) -> String {
    json!([{
        "ResourceType": resource_type,
        "Tags": [{ "Key": "Name", "Value": name }],
    }])
    .to_string()
}

fn instance_ids_args(ids: &[String]) -> Vec<String> {
    let mut args = vec!["--instance-ids".to_string()];
    args.extend(ids.iter().cloned());
    args
}

/// Arguments for `aws ec2 run-instances`.
#[must_use]
pub fn run_instances_args(request: &LaunchRequest) -> Vec<String> {
    let mut args: Vec<String> = [
        "--image-id",
        request.image_id.as_str(),
        "--instance-type",
        request.instance_type.as_str(),
        "--security-group-ids",
        request.security_group_id.as_str(),
        "--key-name",
        request.key_name.as_str(),
        "--count",
        "1",
        "--instance-initiated-shutdown-behavior",
        request.shutdown_behaviour.as_str(),
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    args.push("--tag-specifications".into());
    args.push(name_tag_spec("instance", &request.name));
    if let Some(profile) = &request.iam_instance_profile {
        args.push("--iam-instance-profile".into());
        args.push(format!("Name={profile}"));
    }
    if let Some(price) = request.spot_max_price {
        args.push("--instance-market-options".into());
        args.push(
            json!({
                "MarketType": "spot",
                "SpotOptions": {
                    "MaxPrice": price.to_string(),
                    "SpotInstanceType": "one-time",
                },
            })
            .to_string(),
        );
    }
    args
}

impl<R: CommandRunner> ComputeProvider for AwsCliProvider<R> {
    async fn describe_instances(&self) -> Result<Vec<Reservation>> {
        let resp: DescribeInstances = self.cli.json(EC2, "describe-instances", &[]).await?;
        Ok(resp.reservations)
    }

    async fn start_instances(&self, ids: &[String]) -> Result<()> {
        self.act("start-instances", &instance_ids_args(ids)).await
    }

    async fn stop_instances(&self, ids: &[String]) -> Result<()> {
        self.act("stop-instances", &instance_ids_args(ids)).await
    }

    async fn terminate_instances(&self, ids: &[String]) -> Result<()> {
        self.act("terminate-instances", &instance_ids_args(ids))
            .await
    }

    async fn describe_key_pairs(&self, name: &str) -> Result<Vec<KeyPairInfo>> {
        let filters = filters_json(&[Filter {
            name: "key-name",
            values: vec![name.to_string()],
        }]);
        let resp: DescribeKeyPairs = self
            .cli
            .json(EC2, "describe-key-pairs", &["--filters".into(), filters])
            .await?;
        Ok(resp.key_pairs)
    }

    async fn create_key_pair(&self, name: &str) -> Result<CreatedKeyPair> {
        self.cli
            .json(EC2, "create-key-pair", &["--key-name".into(), name.into()])
            .await
    }

    async fn find_security_group(&self, name: &str) -> Result<Option<SecurityGroup>> {
        let filters = filters_json(&[Filter {
            name: "group-name",
            values: vec![name.to_string()],
        }]);
        let resp: DescribeSecurityGroups = self
            .cli
            .json(EC2, "describe-security-groups", &["--filters".into(), filters])
            .await?;
        Ok(resp.security_groups.into_iter().next())
    }

    async fn create_security_group(&self, name: &str, description: &str) -> Result<String> {
        let args = [
            "--group-name".to_string(),
            name.to_string(),
            "--description".to_string(),
            description.to_string(),
            "--tag-specifications".to_string(),
            name_tag_spec("security-group", name),
        ];
        let resp: CreateSecurityGroup = self.cli.json(EC2, "create-security-group", &args).await?;
        Ok(resp.group_id)
    }

    async fn authorize_ingress(&self, group_id: &str, rule: &IpPermission) -> Result<()> {
        let perms = serde_json::to_string(&[rule]).context("serializing ingress rule")?;
        self.act(
            "authorize-security-group-ingress",
            &["--group-id".into(), group_id.into(), "--ip-permissions".into(), perms],
        )
        .await
    }

    async fn authorize_egress(&self, group_id: &str, rule: &IpPermission) -> Result<()> {
        let perms = serde_json::to_string(&[rule]).context("serializing egress rule")?;
        self.act(
            "authorize-security-group-egress",
            &["--group-id".into(), group_id.into(), "--ip-permissions".into(), perms],
        )
        .await
    }

    async fn describe_images(
        &self,
        owners: &[&str],
        filters: &[Filter],
    ) -> Result<Vec<MachineImage>> {
        let mut args = vec!["--owners".to_string()];
        args.extend(owners.iter().map(ToString::to_string));
        args.push("--filters".into());
        args.push(filters_json(filters));
        let resp: DescribeImages = self.cli.json(EC2, "describe-images", &args).await?;
        Ok(resp.images)
    }

    async fn describe_volumes(&self) -> Result<Vec<Volume>> {
        let resp: DescribeVolumes = self.cli.json(EC2, "describe-volumes", &[]).await?;
        Ok(resp.volumes)
    }

    async fn delete_volume(&self, volume_id: &str) -> Result<()> {
        self.act("delete-volume", &["--volume-id".into(), volume_id.into()])
            .await
    }

    async fn run_instances(&self, request: &LaunchRequest) -> Result<String> {
        let resp: RunInstances = self
            .cli
            .json(EC2, "run-instances", &run_instances_args(request))
            .await?;
        resp.instances
            .into_iter()
            .next()
            .map(|i| i.instance_id)
            .context("run-instances returned no instance")
    }
}
