//! Shared types for cjob: the naming policy that marks tool-managed
//! resources and the records built from provider instance listings.

pub mod naming;
pub mod types;

pub use naming::{ALL_JOBS, JOB_PREFIX, NameError, add_prefix, has_prefix, job_name, strip_prefix};
pub use types::*;
