//! Application context: unified state passed to every command handler.
//!
//! Built once in `Cli::run()` after settings have loaded, so every handler
//! receives validated settings and ready adapters.

use anyhow::Result;

use crate::domain::config::Settings;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::infra::ec2::AwsCliProvider;
use crate::infra::fs::LocalFs;
use crate::infra::s3::AwsCliObjectStore;
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;
use crate::output::reporter::TerminalReporter;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
#[allow(clippy::struct_excessive_bools)]
pub struct AppFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
    /// Skip interactive prompts (also set by `CI` / `CJOB_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub settings: Settings,
    pub provider: AwsCliProvider<TokioCommandRunner>,
    pub store: AwsCliObjectStore<TokioCommandRunner>,
    /// Runs `ssh` with inherited stdio.
    pub shell: TokioCommandRunner,
    pub fs: LocalFs,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags, settings: Settings) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("CJOB_YES").is_ok();
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let aws_runner = || {
            TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT).with_envs(settings.credentials.env_vars())
        };
        let profile = settings.credentials.profile().map(String::from);

        Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            provider: AwsCliProvider::new(aws_runner(), &settings.region, profile.clone()),
            store: AwsCliObjectStore::new(aws_runner(), &settings.region, profile),
            shell: TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            fs: LocalFs,
            non_interactive: flags.yes || ci_env,
            settings,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn human(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `CJOB_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
