//! Command implementations

pub mod ami;
pub mod cleanup;
pub mod run;
pub mod settings;
pub mod ssh;
pub mod start;
pub mod status;
pub mod stop;
pub mod storage;

use clap::Args;

/// A single job name argument.
#[derive(Args)]
pub struct JobArgs {
    /// Job name, without the cjob- prefix
    pub name: String,
}
