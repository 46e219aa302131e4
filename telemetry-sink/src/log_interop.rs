//! Captures records emitted through the `log` crate and routes them into the
//! telemetry log stream as interop events.
use skylight_tracing::{
    dispatch::{flush_log_buffer, log_enabled, log_interop},
    error,
    intern_string::intern_string,
    levels::{Level, LevelFilter},
    logs::LogMetadata,
};

struct LogDispatch;

impl log::Log for LogDispatch {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        let level = log_level_to_level(metadata.level());
        let log_metadata = LogMetadata {
            level,
            fmt_str: "",
            target: "unknown",
            file: "unknown",
            line: 0,
        };
        log_enabled(&log_metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = log_level_to_level(record.level());
        let log_desc = LogMetadata {
            level,
            fmt_str: record.args().as_str().unwrap_or(""),
            target: intern_string(record.target()),
            file: record.file_static().unwrap_or("unknown"),
            line: record.line().unwrap_or(0),
        };
        log_interop(&log_desc, *record.args());
    }

    fn flush(&self) {
        flush_log_buffer();
    }
}

/// Installs a `log` crate dispatcher forwarding records through the
/// telemetry log stream.
pub fn install_log_interop(interop_max_level_override: Option<LevelFilter>) {
    static LOG_DISPATCHER: LogDispatch = LogDispatch;
    let interop_max_level = level_filter_to_log_level_filter(
        interop_max_level_override.unwrap_or_else(skylight_tracing::levels::max_level),
    );
    log::set_max_level(interop_max_level);

    if let Err(e) = log::set_logger(&LOG_DISPATCHER) {
        error!("could not set log crate dispatcher {e:?}");
        log::set_max_level(log::LevelFilter::Off);
    }
}

fn log_level_to_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Trace,
    }
}

fn level_filter_to_log_level_filter(level: LevelFilter) -> log::LevelFilter {
    match level {
        LevelFilter::Off => log::LevelFilter::Off,
        LevelFilter::Error => log::LevelFilter::Error,
        LevelFilter::Warn => log::LevelFilter::Warn,
        LevelFilter::Info => log::LevelFilter::Info,
        LevelFilter::Debug => log::LevelFilter::Debug,
        LevelFilter::Trace => log::LevelFilter::Trace,
    }
}
