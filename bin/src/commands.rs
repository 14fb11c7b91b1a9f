//! Runs one conversion over a file, or over stdin to stdout.

use crate::{
    cli::{Cli, Command},
    paths,
};
use anyhow::{Context, Result};
use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tabstops::{convert, policy, ConfigError, Defaults, Direction};

/// Result of converting one text.
#[derive(Debug, PartialEq, Eq)]
pub struct Conversion {
    /// `None` when a toggle found no leading indentation to convert.
    pub direction: Option<Direction>,
    pub count: usize,
    pub text: String,
}

/// Convert `text` as `command` asks, at `tabstop` columns per tab.
pub fn convert_text(text: &str, command: &Command, tabstop: usize) -> Result<Conversion> {
    if tabstop == 0 {
        return Err(ConfigError::InvalidTabstop.into());
    }

    let mut buffer = text.to_string();
    let direction = match command {
        Command::ToSpaces(_) => Some(Direction::ToSpaces),
        Command::ToTabs(_) => Some(Direction::ToTabs),
        Command::Toggle(_) => policy::toggle_direction(&buffer, tabstop),
    };

    let count = match direction {
        Some(direction) => convert::rewrite_indentation(&mut buffer, direction, tabstop)?,
        None => 0,
    };

    Ok(Conversion {
        direction,
        count,
        text: buffer,
    })
}

/// Load defaults from `--config`, a discovered config file, or the embedded one.
pub fn load_defaults(cli: &Cli) -> Result<Defaults> {
    let discovered = match &cli.config {
        Some(_) => None,
        None => paths::discover(&start_dir(cli)?),
    };

    Defaults::load_with_overrides(cli.config.as_deref(), discovered.as_deref())
        .context("Failed to load tabstops configuration")
}

fn start_dir(cli: &Cli) -> Result<PathBuf> {
    let parent = cli
        .command
        .target()
        .file
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty());

    match parent {
        Some(parent) => Ok(parent.to_path_buf()),
        None => std::env::current_dir().context("Failed to read current directory"),
    }
}

/// Run the command against the process's stdin and stdout.
pub fn run(cli: &Cli) -> Result<usize> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(cli, &mut stdin.lock(), &mut stdout.lock())
}

/// Run the command, reading from `input` and writing to `output` when no file
/// is given. Returns the replacement count.
pub fn run_with<R: Read, W: Write>(cli: &Cli, input: &mut R, output: &mut W) -> Result<usize> {
    let defaults = load_defaults(cli)?;
    let tabstop = cli.tabstop.unwrap_or(defaults.tabstop);
    let file = cli.command.target().file.as_deref();

    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            input
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    let conversion = convert_text(&text, &cli.command, tabstop)?;
    tracing::info!(
        "{:?}: {} replacements (tabstop {tabstop})",
        conversion.direction,
        conversion.count
    );

    if cli.check {
        let name = file.map_or_else(|| "<stdin>".into(), Path::to_string_lossy);
        writeln!(output, "{name}: {} replacements", conversion.count)
            .context("Failed to write report")?;
        return Ok(conversion.count);
    }

    match file {
        Some(path) if conversion.count > 0 => std::fs::write(path, &conversion.text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        Some(_) => {}
        None => output
            .write_all(conversion.text.as_bytes())
            .context("Failed to write stdout")?,
    }

    Ok(conversion.count)
}
