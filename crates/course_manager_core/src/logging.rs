//! Logging bootstrap and per-context diagnostic sinks.
//!
//! # Responsibility
//! - Initialize rolling file logs once per process for binaries.
//! - Route context-level events to an optional caller-provided sink.
//!
//! # Invariants
//! - File logging init is idempotent for the same level and directory and
//!   never panics.
//! - A sink only receives lines at or above its own threshold, independent of
//!   the global `log` max level.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{info, Level, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

const LOG_FILE_BASENAME: &str = "course_manager";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Initializes process-wide file logging.
///
/// # Errors
/// - Unsupported `level`, or an empty/relative `log_dir`.
/// - Logging already active with a different level or directory.
/// - Directory creation or logger backend failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING_STATE.get_or_try_init(|| start_file_logger(level, &log_dir))?;
    if state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{level}`",
            state.level
        ));
    }
    Ok(())
}

/// Returns `(level, log_dir)` when file logging is active.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_file_logger(level: &'static str, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    info!(
        "event=logging_init module=core status=ok level={level} log_dir={} version={}",
        log_dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: log_dir.to_path_buf(),
        _logger: logger,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

type SinkWriter = dyn Fn(&str) + Send + Sync;

/// Pluggable receiver for formatted context log lines.
///
/// Lines have the form `[LEVEL] message`.
#[derive(Clone)]
pub struct LogSink {
    min_level: LevelFilter,
    writer: Arc<SinkWriter>,
}

impl LogSink {
    /// Creates a sink that forwards lines at or above `min_level` to `writer`.
    pub fn new(min_level: LevelFilter, writer: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            min_level,
            writer: Arc::new(writer),
        }
    }

    /// Creates a sink that appends lines to a shared buffer.
    pub fn capture(min_level: LevelFilter) -> (Self, CapturedLogs) {
        let captured = CapturedLogs::default();
        let buffer = captured.clone();
        let sink = Self::new(min_level, move |line| buffer.push(line));
        (sink, captured)
    }

    pub fn min_level(&self) -> LevelFilter {
        self.min_level
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.min_level
    }

    /// Formats and forwards one line when `level` passes the threshold.
    pub fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            (self.writer)(&format!("[{level}] {message}"));
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

/// Shared line buffer filled by [`LogSink::capture`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CapturedLogs {
    fn push(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    /// Returns a snapshot of captured lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
