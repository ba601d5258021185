//! Logging infrastructure - structured tracing throughout runtime
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log level, overridable by `RUST_LOG`
//! - Zero-cost when disabled
//! - Human-readable or JSON output, to stderr or a file
//!
//! Logs never go to stdout, which belongs to `puts_int`/`puts_str`.

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

// Re-export tracing macros for use throughout the runtime
pub use tracing::{debug, error, info, trace, warn, Level};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path; stderr when unset
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // RC_RUNTIME_LOG_LEVEL: trace, debug, info, warn, error
        if let Some(level_str) = lookup("RC_RUNTIME_LOG_LEVEL") {
            config.level = match level_str.to_lowercase().as_str() {
                "trace" => Level::TRACE,
                "debug" => Level::DEBUG,
                "info" => Level::INFO,
                "warn" => Level::WARN,
                "error" => Level::ERROR,
                _ => Level::INFO,
            };
        }

        // RC_RUNTIME_LOG_FILE: path to log file
        config.log_path = lookup("RC_RUNTIME_LOG_FILE").filter(|p| !p.is_empty());

        // RC_RUNTIME_LOG_JSON: enable JSON format
        config.json_format = lookup("RC_RUNTIME_LOG_JSON").is_some();

        // RC_RUNTIME_LOG_SPANS: show span events
        config.show_spans = lookup("RC_RUNTIME_LOG_SPANS").is_some();

        config
    }

    /// Create debug config (verbose logging)
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }

    fn make_writer(&self) -> BoxMakeWriter {
        match &self.log_path {
            Some(path) => {
                let path = Path::new(path);
                let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
                let file = path.file_name().unwrap_or(path.as_os_str());
                BoxMakeWriter::new(tracing_appender::rolling::never(dir, file))
            }
            None => BoxMakeWriter::new(io::stderr),
        }
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. If the host process already
/// installed one, the runtime logs through it.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "rc_runtime={}",
                config.level.as_str().to_lowercase()
            ))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let (json, compact) = if config.json_format {
            let layer = fmt::layer()
                .json()
                .with_writer(config.make_writer())
                .with_span_events(span_events);
            (Some(layer), None)
        } else {
            let layer = fmt::layer()
                .compact()
                .with_writer(config.make_writer())
                .with_span_events(span_events)
                .with_target(true)
                .with_ansi(config.log_path.is_none())
                .with_line_number(cfg!(debug_assertions));
            (None, Some(layer))
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json)
            .with(compact)
            .try_init()
            .ok(); // Ignore error if already initialized
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Runtime-specific logging functions
// ============================================================================

/// Log memory allocation
#[inline]
pub fn log_allocation(size: usize, ptr: *const u8) {
    trace!(
        event = "allocation",
        size_bytes = size,
        address = ?ptr,
        "Memory allocated"
    );
}

/// Log memory deallocation
#[inline]
pub fn log_deallocation(ptr: *const u8) {
    trace!(
        event = "deallocation",
        address = ?ptr,
        "Memory deallocated"
    );
}

/// Log object creation
#[inline]
pub fn log_object_created(object_id: u64, size: usize) {
    trace!(
        event = "object_created",
        object_id,
        size_bytes = size,
        "Object created"
    );
}

/// Log object destruction (count reached zero)
#[inline]
pub fn log_object_destroyed(object_id: u64) {
    debug!(
        event = "object_destroyed",
        object_id,
        "Object destroyed"
    );
}

/// Log FFI function call
pub fn log_ffi_call(fn_name: &str, handle: u64) {
    trace!(
        event = "ffi_call",
        function = fn_name,
        handle,
        "FFI function called"
    );
}

/// Log FFI error
pub fn log_ffi_error(fn_name: &str, error: &str) {
    error!(
        event = "ffi_error",
        function = fn_name,
        error = error,
        "FFI function error"
    );
}

/// Log builtin function call
pub fn log_builtin_call(builtin: &str) {
    trace!(
        event = "builtin_call",
        function = builtin,
        "Builtin function called"
    );
}

/// Log handles still outstanding at cleanup
pub fn log_leaked_handles(count: usize) {
    warn!(
        event = "leaked_handles",
        handles = count,
        "Handles still outstanding at runtime cleanup"
    );
}

/// Log runtime initialization
pub fn log_runtime_init() {
    info!(
        event = "runtime_init",
        "rc runtime initializing"
    );
}

/// Log runtime shutdown
pub fn log_runtime_shutdown() {
    info!(
        event = "runtime_shutdown",
        "rc runtime shutting down"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_path.is_none());

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
        assert!(debug_config.show_spans);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("RC_RUNTIME_LOG_LEVEL", "WARN"),
            ("RC_RUNTIME_LOG_FILE", "/tmp/rc.log"),
            ("RC_RUNTIME_LOG_SPANS", "1"),
        ]
        .into_iter()
        .collect();

        let config = LogConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/rc.log"));
        assert!(config.show_spans);
        assert!(!config.json_format);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = LogConfig::from_lookup(|k| (k == "RC_RUNTIME_LOG_LEVEL").then(|| "loud".to_string()));
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn test_file_writer_targets_log_path() {
        use std::io::Write;
        use tracing_subscriber::fmt::MakeWriter;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("runtime.log");
        let config = LogConfig {
            log_path: Some(path.to_string_lossy().into_owned()),
            ..LogConfig::default()
        };

        let make_writer = config.make_writer();
        let mut writer = make_writer.make_writer();
        writer.write_all(b"object_destroyed\n").expect("write");
        writer.flush().expect("flush");
        drop(writer);

        let contents = std::fs::read_to_string(&path).expect("log file");
        assert!(contents.contains("object_destroyed"));
    }

    #[test]
    fn test_init_idempotent() {
        init();
        init(); // Should not panic
        assert!(is_initialized());
    }

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_allocation(1024, std::ptr::null());
        log_deallocation(std::ptr::null());
        log_object_created(1, 32);
        log_object_destroyed(1);
        log_ffi_call("rc_take", 1);
        log_builtin_call("puts_int");
        log_runtime_init();
        log_runtime_shutdown();
    }
}
