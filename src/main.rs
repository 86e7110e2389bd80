use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_actions::actions::{report_failure, GithubOutputFile};
use release_actions::cli::orchestration::{run_semantic_release_step, run_validate_breaking_doc};
use release_actions::cli::{runner_debug, Cli, Commands};
use release_actions::semantic::SystemRunner;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RELEASE_ACTIONS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, debug: bool) -> Result<bool> {
    match cli.command {
        Commands::ValidateBreakingDoc(args) => Ok(run_validate_breaking_doc(&args)?),
        Commands::SemanticRelease(args) => {
            let mut sink = GithubOutputFile::from_env();
            run_semantic_release_step(&args, &SystemRunner, &mut sink, debug)?;
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = runner_debug();
    init_logging(debug);

    match run(cli, debug) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            report_failure(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
