use skylight_tracing::{
    event::EventSink,
    levels::Level,
    logs::{LogBlock, LogMetadata, LogStream},
    metrics::{MetricsBlock, MetricsStream},
    process_info::ProcessInfo,
    spans::{ThreadBlock, ThreadStream},
};
use std::{fmt, sync::Arc};

use colored::Colorize;

/// Prints log entries to the console
pub struct LocalEventSink {}

impl LocalEventSink {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LocalEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LocalEventSink {
    fn on_startup(&self, _process_info: Arc<ProcessInfo>) {}
    fn on_shutdown(&self) {}

    fn on_log_enabled(&self, _metadata: &LogMetadata) -> bool {
        // reaching here we accept everything
        true
    }

    fn on_log(&self, metadata: &LogMetadata, _time: i64, args: fmt::Arguments<'_>) {
        let level_string = match metadata.level {
            Level::Error => metadata.level.to_string().red().to_string(),
            Level::Warn => metadata.level.to_string().yellow().to_string(),
            Level::Info => metadata.level.to_string().cyan().to_string(),
            Level::Debug => metadata.level.to_string().purple().to_string(),
            Level::Trace => metadata.level.to_string().normal().to_string(),
        };

        let timestamp = chrono::Utc::now().to_rfc3339();
        let target = metadata.target;
        println!("{timestamp} {level_string:<5} [{target}] {args}");
    }

    fn on_init_log_stream(&self, _: &LogStream) {}
    fn on_process_log_block(&self, _: Arc<LogBlock>) {}

    fn on_init_metrics_stream(&self, _: &MetricsStream) {}
    fn on_process_metrics_block(&self, _: Arc<MetricsBlock>) {}

    fn on_init_thread_stream(&self, _: &ThreadStream) {}
    fn on_process_thread_block(&self, _: Arc<ThreadBlock>) {}

    fn is_busy(&self) -> bool {
        false
    }
}
