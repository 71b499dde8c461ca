// ============================================================================
// mediaedit-cli/src/main.rs
// ============================================================================
//
// MEDIAEDIT CLI: command-line host for the media edit bridge
//
// Parses arguments, initializes logging, builds the bridge configuration and
// dispatches to the command implementations.
//
// Exit status:
// - 0: the operation resolved (or doctor found every tool)
// - 1: the CLI itself failed (configuration, runtime, missing tools)
// - 2: the operation settled with a rejection (`<CODE>: <message>` on stderr)

use anyhow::{Context, Result};
use clap::Parser;
use mediaedit_cli::output::print_error;
use mediaedit_cli::{
    Cli, Commands, Session, bridge_config, logging, run_convert, run_doctor, run_invoke,
    run_merge, run_separate,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let start = || -> Result<Session> {
        let config = bridge_config(&cli)?;
        Session::start(config, cli.json).context("failed to initialize the media bridge")
    };

    let code = match &cli.command {
        Commands::Separate { video } => run_separate(&start()?, video),
        Commands::Merge { video, audio } => run_merge(&start()?, video, audio),
        Commands::Convert { mp3 } => run_convert(&start()?, mp3),
        Commands::Invoke { method, args_json } => run_invoke(&start()?, method, args_json),
        Commands::Doctor => run_doctor(cli.json)?,
    };
    Ok(code)
}
