use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "subgate", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Submission identifier forwarded to the test runner.
    pub submission: String,

    /// Archive to review. Defaults to the newest .zip in the watch directory.
    pub archive: Option<PathBuf>,

    /// Configuration file (defaults to ./subgate.toml when present).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
