//! Telemetry sink library
//!
//! Wires the tracing dispatch to concrete sinks: the HTTP shipper, the
//! console printer and any extra sink the host provides.

// crate-specific lint exceptions:
#![allow(clippy::missing_errors_doc)]

pub mod composite_event_sink;
pub mod flusher;
pub mod http_event_sink;
pub mod local_event_sink;
pub mod log_interop;
pub mod stream_block;
pub mod stream_info;
pub mod system_monitor;

use crate::composite_event_sink::CompositeSink;
use crate::flusher::spawn_flush_ticker;
use crate::http_event_sink::HttpEventSink;
use crate::local_event_sink::LocalEventSink;
use crate::log_interop::install_log_interop;
use crate::system_monitor::spawn_system_monitor;
use skylight_tracing::event::BoxedEventSink;
use skylight_tracing::guards::{TracingSystemGuard, TracingThreadGuard};
use skylight_tracing::levels::LevelFilter;
use skylight_tracing::process_info::{alloc_guid, make_process_info, GuidMaker};

pub struct TelemetryGuardBuilder {
    logs_buffer_size: usize,
    metrics_buffer_size: usize,
    threads_buffer_size: usize,
    make_guid: GuidMaker,
    telemetry_sink_url: Option<String>,
    telemetry_sink_max_level: LevelFilter,
    local_sink_enabled: bool,
    local_sink_max_level: LevelFilter,
    max_level_override: Option<LevelFilter>,
    target_max_levels: Vec<(String, LevelFilter)>,
    extra_sinks: Vec<(LevelFilter, BoxedEventSink)>,
    install_log_capture: bool,
    system_metrics_enabled: bool,
}

impl Default for TelemetryGuardBuilder {
    fn default() -> Self {
        Self {
            logs_buffer_size: 10 * 1024 * 1024,
            metrics_buffer_size: 1024 * 1024,
            threads_buffer_size: 10 * 1024 * 1024,
            make_guid: alloc_guid,
            telemetry_sink_url: None,
            telemetry_sink_max_level: LevelFilter::Debug,
            local_sink_enabled: true,
            local_sink_max_level: LevelFilter::Info,
            max_level_override: None,
            target_max_levels: vec![],
            extra_sinks: vec![],
            install_log_capture: false,
            system_metrics_enabled: true,
        }
    }
}

impl TelemetryGuardBuilder {
    /// Sets the ingestion base url.
    ///
    /// When not set explicitly, the url is read from the
    /// `SKYLIGHT_TELEMETRY_URL` environment variable; without either, blocks
    /// are recorded but not shipped.
    #[must_use]
    pub fn with_telemetry_sink_url(mut self, url: impl Into<String>) -> Self {
        self.telemetry_sink_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_telemetry_sink_max_level(mut self, level_filter: LevelFilter) -> Self {
        self.telemetry_sink_max_level = level_filter;
        self
    }

    #[must_use]
    pub fn with_local_sink_enabled(mut self, enabled: bool) -> Self {
        self.local_sink_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_local_sink_max_level(mut self, level_filter: LevelFilter) -> Self {
        self.local_sink_max_level = level_filter;
        self
    }

    /// Programmatic override of the process-wide max level.
    #[must_use]
    pub fn with_max_level_override(mut self, level_filter: LevelFilter) -> Self {
        self.max_level_override = Some(level_filter);
        self
    }

    #[must_use]
    pub fn with_target_max_level(mut self, target: impl Into<String>, filter: LevelFilter) -> Self {
        self.target_max_levels.push((target.into(), filter));
        self
    }

    #[must_use]
    pub fn add_sink<Sink>(mut self, max_level: LevelFilter, sink: Sink) -> Self
    where
        Sink: skylight_tracing::event::EventSink + 'static,
    {
        self.extra_sinks.push((max_level, Box::new(sink)));
        self
    }

    #[must_use]
    pub fn with_buffer_sizes(
        mut self,
        logs_buffer_size: usize,
        metrics_buffer_size: usize,
        threads_buffer_size: usize,
    ) -> Self {
        self.logs_buffer_size = logs_buffer_size;
        self.metrics_buffer_size = metrics_buffer_size;
        self.threads_buffer_size = threads_buffer_size;
        self
    }

    #[must_use]
    pub fn with_guid_maker(mut self, make_guid: GuidMaker) -> Self {
        self.make_guid = make_guid;
        self
    }

    /// Captures records emitted through the `log` crate.
    #[must_use]
    pub fn with_install_log_capture(mut self, enabled: bool) -> Self {
        self.install_log_capture = enabled;
        self
    }

    #[must_use]
    pub fn with_system_metrics_enabled(mut self, enabled: bool) -> Self {
        self.system_metrics_enabled = enabled;
        self
    }

    pub fn build(self) -> anyhow::Result<TelemetryGuard> {
        let mut sinks: Vec<(LevelFilter, BoxedEventSink)> = vec![];
        let telemetry_sink_url = self
            .telemetry_sink_url
            .or_else(|| std::env::var("SKYLIGHT_TELEMETRY_URL").ok());
        if let Some(url) = telemetry_sink_url {
            sinks.push((
                self.telemetry_sink_max_level,
                Box::new(HttpEventSink::new(&url, self.make_guid)),
            ));
        }
        if self.local_sink_enabled {
            sinks.push((self.local_sink_max_level, Box::new(LocalEventSink::new())));
        }
        sinks.extend(self.extra_sinks);

        // the composite sink installs the process max level, which the log
        // capture reads
        let sink: BoxedEventSink = Box::new(CompositeSink::new(
            sinks,
            self.target_max_levels,
            self.max_level_override,
        ));
        if self.install_log_capture {
            install_log_interop(None);
        }

        let guard = TracingSystemGuard::with_process_info(
            self.make_guid,
            make_process_info(self.make_guid),
            sink.into(),
            self.logs_buffer_size,
            self.metrics_buffer_size,
            self.threads_buffer_size,
        )?;
        spawn_flush_ticker();
        if self.system_metrics_enabled {
            spawn_system_monitor();
        }

        // order matters: the thread guard must drop before the system guard
        Ok(TelemetryGuard {
            _thread_guard: TracingThreadGuard::new(),
            _guard: guard,
        })
    }
}

pub struct TelemetryGuard {
    // we rely on the drop order being the same as the declaration order
    _thread_guard: TracingThreadGuard,
    _guard: TracingSystemGuard,
}

impl TelemetryGuard {
    pub fn new() -> anyhow::Result<Self> {
        TelemetryGuardBuilder::default().build()
    }
}
