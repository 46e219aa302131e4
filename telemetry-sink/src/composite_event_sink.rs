use skylight_tracing::{
    event::{BoxedEventSink, EventSink},
    levels::{set_max_level, LevelFilter},
    logs::{LogBlock, LogMetadata, LogStream},
    metrics::{MetricsBlock, MetricsStream},
    process_info::ProcessInfo,
    spans::{ThreadBlock, ThreadStream},
};
use std::{fmt, sync::Arc};

/// Fans events out to multiple sinks, each guarded by a maximum level; also
/// installs the process-wide max level so filtered-out records cost a single
/// atomic load.
pub struct CompositeSink {
    sinks: Vec<(LevelFilter, BoxedEventSink)>,
    target_max_levels: Vec<(String, LevelFilter)>,
}

impl CompositeSink {
    pub fn new(
        sinks: Vec<(LevelFilter, BoxedEventSink)>,
        target_max_levels: Vec<(String, LevelFilter)>,
        max_level_override: Option<LevelFilter>,
    ) -> Self {
        let max_level = max_level_override.unwrap_or_else(|| {
            sinks
                .iter()
                .map(|(filter, _sink)| *filter)
                .max()
                .unwrap_or(LevelFilter::Off)
        });
        set_max_level(max_level);
        Self {
            sinks,
            target_max_levels,
        }
    }

    fn target_filter(&self, target: &str) -> Option<LevelFilter> {
        self.target_max_levels
            .iter()
            .find(|(t, _filter)| t == target)
            .map(|(_t, filter)| *filter)
    }
}

impl EventSink for CompositeSink {
    fn on_startup(&self, process_info: Arc<ProcessInfo>) {
        for (_filter, sink) in &self.sinks {
            sink.on_startup(process_info.clone());
        }
    }

    fn on_shutdown(&self) {
        for (_filter, sink) in &self.sinks {
            sink.on_shutdown();
        }
    }

    fn on_log_enabled(&self, metadata: &LogMetadata) -> bool {
        if let Some(filter) = self.target_filter(metadata.target) {
            if metadata.level > filter {
                return false;
            }
        }
        self.sinks
            .iter()
            .any(|(filter, sink)| metadata.level <= *filter && sink.on_log_enabled(metadata))
    }

    fn on_log(&self, desc: &LogMetadata, time: i64, args: fmt::Arguments<'_>) {
        for (filter, sink) in &self.sinks {
            if desc.level <= *filter {
                sink.on_log(desc, time, args);
            }
        }
    }

    fn on_init_log_stream(&self, log_stream: &LogStream) {
        for (_filter, sink) in &self.sinks {
            sink.on_init_log_stream(log_stream);
        }
    }

    fn on_process_log_block(&self, log_block: Arc<LogBlock>) {
        for (_filter, sink) in &self.sinks {
            sink.on_process_log_block(log_block.clone());
        }
    }

    fn on_init_metrics_stream(&self, metrics_stream: &MetricsStream) {
        for (_filter, sink) in &self.sinks {
            sink.on_init_metrics_stream(metrics_stream);
        }
    }

    fn on_process_metrics_block(&self, metrics_block: Arc<MetricsBlock>) {
        for (_filter, sink) in &self.sinks {
            sink.on_process_metrics_block(metrics_block.clone());
        }
    }

    fn on_init_thread_stream(&self, thread_stream: &ThreadStream) {
        for (_filter, sink) in &self.sinks {
            sink.on_init_thread_stream(thread_stream);
        }
    }

    fn on_process_thread_block(&self, thread_block: Arc<ThreadBlock>) {
        for (_filter, sink) in &self.sinks {
            sink.on_process_thread_block(thread_block.clone());
        }
    }

    fn is_busy(&self) -> bool {
        self.sinks.iter().any(|(_filter, sink)| sink.is_busy())
    }
}
