//! SSH invocation against a job instance.

use std::path::Path;

/// Options passed with `-o` on every connection. Job hosts are ephemeral, so
/// host keys are never pinned.
pub const SSH_OPTIONS: &[&str] = &[
    "StrictHostKeyChecking=no",
    "UserKnownHostsFile=/dev/null",
    "TCPKeepAlive=yes",
    "ServerAliveInterval=30",
    "LogLevel=ERROR",
];

/// Build `ssh` arguments for `user@host`, optionally running `command`.
///
/// With no command the session is interactive and a TTY is requested.
#[must_use]
pub fn ssh_args(key_file: &Path, user: &str, host: &str, command: &[String]) -> Vec<String> {
    let mut args = vec!["-i".to_string(), key_file.display().to_string()];
    for opt in SSH_OPTIONS {
        args.push("-o".to_string());
        args.push((*opt).to_string());
    }
    if command.is_empty() {
        args.push("-t".to_string());
    }
    args.push(format!("{user}@{host}"));
    args.extend(command.iter().cloned());
    args
}
