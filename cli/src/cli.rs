//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::config::SettingsLoader;

/// Run ad-hoc batch jobs on tagged EC2 instances
#[derive(Parser)]
#[command(
    name = "cjob",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (`NO_COLOR` in the environment does the same)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a shell on a running job
    Ssh(commands::JobArgs),

    /// Start a job instance, creating it if needed
    Start(commands::JobArgs),

    /// Terminate a job instance, or every job with `all`
    Stop(commands::stop::StopArgs),

    /// Run a command on a fresh instance, then terminate it
    Run(commands::run::RunArgs),

    /// List live job instances
    Status,

    /// Show the loaded settings
    Settings,

    /// Print the newest Ubuntu base image id
    Ami,

    /// Remove long-running instances or orphaned volumes
    #[command(subcommand)]
    Cleanup(commands::cleanup::CleanupCommand),

    /// Upload a file or directory to the configured bucket
    Upload(commands::storage::UploadArgs),

    /// Download an object from the configured bucket
    Download(commands::storage::DownloadArgs),

    /// List objects in the configured bucket
    Ls(commands::storage::LsArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings fail to load or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;

        let settings = SettingsLoader::from_process()?.load()?;
        let flags = AppFlags {
            no_color,
            quiet,
            json,
            yes,
        };
        let app = AppContext::new(&flags, settings);

        match command {
            Command::Ssh(args) => return commands::ssh::run(&args, &app).await,
            Command::Start(args) => commands::start::run(&args, &app).await,
            Command::Stop(args) => commands::stop::run(&args, &app).await,
            Command::Run(args) => commands::run::run(&args, &app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Settings => commands::settings::run(&app),
            Command::Ami => commands::ami::run(&app).await,
            Command::Cleanup(cmd) => commands::cleanup::run(&cmd, &app).await,
            Command::Upload(args) => commands::storage::upload(&args, &app).await,
            Command::Download(args) => commands::storage::download(&args, &app).await,
            Command::Ls(args) => commands::storage::ls(&args, &app).await,
        }?;
        Ok(ExitCode::SUCCESS)
    }
}
