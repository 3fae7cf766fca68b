//! Logging bootstrap for the CLI.
//!
//! Human-readable logs always go to stderr so stdout stays clean for
//! `--json`. A JSON-lines file sink is added when a log path or directory
//! is configured.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Explicit log file path.
const ENV_LOG_PATH: &str = "PROMPTLINT_LOG_PATH";
/// Log directory; the file is named [`LOG_FILE_NAME`].
const ENV_LOG_DIR: &str = "PROMPTLINT_LOG_DIR";
/// File name used inside a log directory.
const LOG_FILE_NAME: &str = "promptlint.jsonl";

/// Where (if anywhere) to write JSON-lines logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Full path of the log file; `None` disables file logging.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, falling back to the
    /// configured `log_dir`.
    ///
    /// `PROMPTLINT_LOG_PATH` wins over `PROMPTLINT_LOG_DIR`, which wins
    /// over `config_log_dir`.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::resolve(
            std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
            std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn resolve(
        log_path: Option<PathBuf>,
        env_log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let log_file = log_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| {
                env_log_dir
                    .filter(|d| !d.as_os_str().is_empty())
                    .or(config_log_dir)
                    .map(|dir| dir.join(LOG_FILE_NAME))
            });
        Self { log_file }
    }
}

/// Keeps the non-blocking file writer alive; drop it last to flush.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Build the log filter.
///
/// `RUST_LOG` wins when set and valid. Otherwise `--quiet` means `error`,
/// `-v` means `debug`, `-vv` and beyond mean `trace`, and anything else
/// uses the configured level.
pub fn env_filter(quiet: bool, verbose: u8, configured_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, configured_level))
}

fn level_directive(quiet: bool, verbose: u8, configured_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => configured_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn split_log_file(path: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir.to_path_buf(), PathBuf::from(file_name)))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when the log directory cannot be created or a global subscriber
/// is already installed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, file_guard) = match config.log_file {
        Some(ref path) => {
            let (dir, file_name) = split_log_file(path)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_beats_directories() {
        let cfg = ObservabilityConfig::resolve(
            Some(PathBuf::from("/tmp/explicit.log")),
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/tmp/config")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/explicit.log")));
    }

    #[test]
    fn env_dir_beats_config_dir() {
        let cfg = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/tmp/env")),
            Some(PathBuf::from("/tmp/config")),
        );
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/env/promptlint.jsonl")));
    }

    #[test]
    fn no_sources_disables_file_logging() {
        assert_eq!(ObservabilityConfig::resolve(None, None, None).log_file, None);
        let blank = ObservabilityConfig::resolve(Some(PathBuf::new()), None, None);
        assert_eq!(blank.log_file, None);
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_directive(true, 3, "info"), "error");
        assert_eq!(level_directive(false, 0, "warn"), "warn");
        assert_eq!(level_directive(false, 1, "info"), "debug");
        assert_eq!(level_directive(false, 2, "info"), "trace");
    }

    #[test]
    fn splits_log_file_path() {
        let (dir, name) = split_log_file(Path::new("logs/app.jsonl")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(name, PathBuf::from("app.jsonl"));

        let (dir, _) = split_log_file(Path::new("app.jsonl")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
    }
}
