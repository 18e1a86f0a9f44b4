//! sinkhound CLI binary.
//!
//! Entry point for the `sinkhound` daemon.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use sinkhound_daemon::exit::{codes, exit_code, once_exit_code};
use sinkhound_daemon::{
    execute_once, execute_run, Cli, CliError, Command, CommandError, CommandReloader, RunArgs,
    ShutdownFlag, StderrLogger, Verbosity,
};
use sinkhound_fs::RealFilesystem;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = StderrLogger::new(Verbosity::from_count(cli.verbose));
    // Graceful termination on Ctrl+C: finish the current cycle, then stop
    let shutdown = ShutdownFlag::new();
    let fs = RealFilesystem;

    let result = match cli.command {
        Command::Run(args) => run_daemon(&args, &fs, &shutdown, &logger),
        Command::Once(args) => run_single_cycle(&args, &fs, &logger),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}

fn build_reloader(args: &RunArgs) -> Result<CommandReloader, CommandError> {
    CommandReloader::from_command_line(
        &args.reload_cmd,
        Duration::from_secs(args.reload_timeout_sec),
    )
    .ok_or(CommandError::InvalidArgument(CliError::EmptyReloadCommand))
}

/// Run the daemon loop until interrupted.
fn run_daemon(
    args: &RunArgs,
    fs: &RealFilesystem,
    shutdown: &ShutdownFlag,
    logger: &StderrLogger,
) -> Result<i32, CommandError> {
    let reloader = build_reloader(args)?;
    let sleeper = sinkhound_daemon::RealSleeper;

    execute_run(args, fs, &reloader, &sleeper, shutdown, logger)?;

    Ok(codes::SUCCESS)
}

/// Run exactly one cycle.
fn run_single_cycle(
    args: &RunArgs,
    fs: &RealFilesystem,
    logger: &StderrLogger,
) -> Result<i32, CommandError> {
    let reloader = build_reloader(args)?;

    let outcome = execute_once(args, fs, &reloader, logger)?;

    Ok(once_exit_code(&outcome))
}
