//! Logging setup for tabstops with file output and optional stderr.
//!
//! Logs always go to a file at `warn` level (or higher if `TABSTOPS_LOG` is set).
//! Stderr logging is enabled when `TABSTOPS_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`TABSTOPS_LOG`** (highest priority) - tabstops-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for tabstops crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/tabstops/logs/tabstops-<pid>.log`
//! - macOS: `~/Library/Application Support/tabstops/logs/tabstops-12345.log`
//! - Linux: `~/.local/share/tabstops/logs/tabstops-12345.log`
//!
//! Override with `--log-file <path>`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CRATES: &[&str] = &["tabstops", "tabstops_bin", "tabstops_log"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Respects the environment variable priority described in the module docs.
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let console_enabled = env::var("TABSTOPS_LOG").is_ok()
        || env::var("RUST_LOG").is_ok()
        || cfg!(debug_assertions);

    // Stdout is reserved for converted text when filtering, so the console
    // layer writes to stderr.
    let stderr_layer = if console_enabled {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(create_filter()),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Console only, no file output. Will not crash if called multiple times or if
/// logging is already initialized by another test.
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), BoxError> {
    fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init()?;
    Ok(())
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("tabstops-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabstops")
        .join("logs");

    (dir, filename)
}

/// File filter: uses the user-specified level if set, otherwise `warn`.
fn create_file_filter() -> EnvFilter {
    if env::var("TABSTOPS_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// Implements the priority system: `TABSTOPS_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(tabstops_log) = env::var("TABSTOPS_LOG") {
        return EnvFilter::new(expand_tabstops_log(&tabstops_log));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(expand_tabstops_log("info"))
}

/// Expand a `TABSTOPS_LOG` value into a full filter directive.
///
/// - `TABSTOPS_LOG=debug` becomes `warn,tabstops=debug,tabstops_bin=debug,...`
/// - `TABSTOPS_LOG=tabstops=trace` is used as-is (advanced syntax)
fn expand_tabstops_log(level: &str) -> String {
    if level.contains('=') || level.contains(':') || level.contains(',') {
        return level.to_string();
    }

    let mut directive = String::from("warn");
    for krate in CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_level_expands_to_all_crates() {
        assert_eq!(
            expand_tabstops_log("debug"),
            "warn,tabstops=debug,tabstops_bin=debug,tabstops_log=debug"
        );
    }

    #[test]
    fn directive_syntax_is_kept_verbatim() {
        assert_eq!(
            expand_tabstops_log("tabstops::convert=trace"),
            "tabstops::convert=trace"
        );
    }

    #[test]
    fn override_with_extension_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.log");

        let (dir, name) = resolve_log_path(Some(path));
        assert_eq!(dir, tmp.path());
        assert_eq!(name, "custom.log");
    }

    #[test]
    fn override_without_extension_is_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir_path = tmp.path().join("logs");

        let (dir, name) = resolve_log_path(Some(dir_path.clone()));
        assert_eq!(dir, dir_path);
        assert!(name.starts_with("tabstops-"));
        assert!(name.ends_with(".log"));
    }
}
