//! Static gatekeeping for archived project submissions.
//!
//! A submission archive is extracted into a throwaway workspace while being
//! checked against the review policy in a single pass. Accepted projects are
//! handed to an external runner for dynamic testing.

pub mod config;
pub mod discover;
mod error;
pub mod pipeline;
pub mod runner;

pub use config::{ReviewConfig, RunnerConfig};
pub use discover::latest_archive;
pub use error::{Error, ErrorKind, Result};
pub use pipeline::{Advisory, ReviewOutcome, ReviewPipeline};
pub use runner::{CommandRunner, RunOutcome, RunnerError, TestRunner};
