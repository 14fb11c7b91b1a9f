use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert leading indentation between tabs and spaces.
#[derive(Debug, Parser)]
#[command(name = "tabstops", author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the discovered one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Columns per tab, overriding the configured tabstop
    #[arg(long, global = true)]
    pub tabstop: Option<usize>,

    /// Report the replacement count without writing anything
    #[arg(long, global = true)]
    pub check: bool,

    /// Log file path, or a directory to place the default log file in
    #[arg(long, global = true, env = "TABSTOPS_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available conversions
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand leading tabs to spaces
    ToSpaces(Target),
    /// Collapse leading runs of spaces to tabs
    ToTabs(Target),
    /// Convert whichever way the leading indentation calls for
    Toggle(Target),
}

#[derive(Debug, Args)]
pub struct Target {
    /// File to convert in place. Filters stdin to stdout when omitted.
    pub file: Option<PathBuf>,
}

impl Command {
    pub fn target(&self) -> &Target {
        match self {
            Command::ToSpaces(target) | Command::ToTabs(target) | Command::Toggle(target) => target,
        }
    }
}
