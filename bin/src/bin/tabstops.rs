use clap::Parser;
use std::process::ExitCode;
use tabstops_bin::{cli::Cli, commands};
use tabstops_log::LogConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match tabstops_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => {
            tracing::debug!("Logging to {}", guard.log_file.display());
            Some(guard)
        }
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        }
    };

    match commands::run(&cli) {
        // Pending replacements fail a check run.
        Ok(count) if cli.check && count > 0 => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
