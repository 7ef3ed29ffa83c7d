use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use subgate::{Advisory, CommandRunner, ReviewConfig, ReviewOutcome, ReviewPipeline, latest_archive};

mod cli;

use cli::Cli;

const LOG_TARGETS: [&str; 3] = ["subgate", "subgate_archive", "subgate_fs"];

fn init_logging(verbose: bool) {
    // RUST_LOG wins over the verbose flag.
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = if verbose { "debug" } else { "info" };
        let directives: Vec<String> = LOG_TARGETS.iter().map(|t| format!("{t}={level}")).collect();
        EnvFilter::new(directives.join(","))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ReviewConfig::load(cli.config.as_deref())?;

    let archive = match cli.archive {
        Some(archive) => archive,
        None => latest_archive(&config.watch_dir)?,
    };

    let script = config.runner.script_path()?;
    let runner = CommandRunner::new(config.runner.program.clone()).script(script);
    let pipeline = ReviewPipeline::new(runner).workspace_prefix(config.workspace_prefix.clone());

    println!("[layer 1] static analysis: {}", archive.display());
    let outcome = pipeline
        .review(&cli.submission, &archive)
        .with_context(|| format!("review of '{}' failed", archive.display()))?;

    match outcome {
        ReviewOutcome::Rejected { rejection, .. } => {
            println!("REJECTED: {rejection}");
            Ok(ExitCode::FAILURE)
        }
        ReviewOutcome::Accepted {
            project_root,
            report,
            advisory,
        } => {
            if !project_root.as_os_str().is_empty() {
                println!("nested structure detected, project root: {}", project_root.display());
            }
            if !report.escaped.is_empty() {
                println!("skipped {} entries outside the extraction root", report.escaped.len());
            }
            println!("[layer 2] dynamic tests finished");
            match advisory {
                Advisory::Passed => println!("ACCEPTED"),
                Advisory::NeedsReview { reason } => println!("ACCEPTED (manual review required: {reason})"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
