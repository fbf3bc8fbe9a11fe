//! Shared invocation of the `aws` command-line client.
//!
//! Every call runs `aws --region <r> [--profile <p>] --output json <service>
//! <op> ...` through a `CommandRunner`. Credentials never appear in argv;
//! static keys reach the child through its environment (see
//! `TokioCommandRunner::with_envs`).

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::application::ports::CommandRunner;

pub struct AwsCli<R: CommandRunner> {
    runner: R,
    region: String,
    profile: Option<String>,
}

impl<R: CommandRunner> AwsCli<R> {
    pub fn new(runner: R, region: impl Into<String>, profile: Option<String>) -> Self {
        Self {
            runner,
            region: region.into(),
            profile,
        }
    }

    fn argv<'a>(&'a self, service: &'a str, op: &'a str, args: &'a [String]) -> Vec<&'a str> {
        let mut argv = vec!["--region", self.region.as_str()];
        if let Some(profile) = &self.profile {
            argv.push("--profile");
            argv.push(profile);
        }
        argv.extend(["--output", "json", service, op]);
        argv.extend(args.iter().map(String::as_str));
        argv
    }

    /// Run one operation and return its stdout.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the CLI's stderr when it exits non-zero.
    pub async fn call(
        &self,
        service: &str,
        op: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let argv = self.argv(service, op, args);
        tracing::debug!(service, op, "aws");
        let output = match timeout {
            Some(t) => self.runner.run_with_timeout("aws", &argv, t).await,
            None => self.runner.run("aws", &argv).await,
        }
        .with_context(|| format!("aws {service} {op}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("aws {service} {op} failed: {}", stderr.trim());
        }
        Ok(output.stdout)
    }

    /// Run one operation and parse its JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the response does not parse.
    pub async fn json<T: DeserializeOwned>(
        &self,
        service: &str,
        op: &str,
        args: &[String],
    ) -> Result<T> {
        let stdout = self.call(service, op, args, None).await?;
        serde_json::from_slice(&stdout)
            .with_context(|| format!("invalid JSON from aws {service} {op}"))
    }
}
