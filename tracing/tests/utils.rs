#![allow(dead_code)]
use skylight_tracing::event::{EventSink, TracingBlock};
use skylight_tracing::logs::{LogBlock, LogMetadata, LogStream};
use skylight_tracing::metrics::{MetricsBlock, MetricsStream};
use skylight_tracing::process_info::ProcessInfo;
use skylight_tracing::spans::{ThreadBlock, ThreadStream};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Startup,
    Shutdown,
    InitLogStream,
    InitMetricsStream,
    InitThreadStream,
    Log(String),
    ProcessLogBlock(usize),
    ProcessMetricsBlock(usize),
    ProcessThreadBlock(usize),
}

pub type SharedState = Arc<Mutex<Vec<State>>>;

/// Records the sink callbacks it observes, in order.
pub struct DebugEventSink {
    state: SharedState,
    busy: AtomicBool,
}

impl DebugEventSink {
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            busy: AtomicBool::new(false),
        }
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Relaxed);
    }

    fn push(&self, state: State) {
        self.state.lock().unwrap().push(state);
    }
}

impl EventSink for DebugEventSink {
    fn on_startup(&self, _process_info: Arc<ProcessInfo>) {
        self.push(State::Startup);
    }

    fn on_shutdown(&self) {
        self.push(State::Shutdown);
    }

    fn on_log_enabled(&self, _metadata: &LogMetadata) -> bool {
        true
    }

    fn on_log(&self, _desc: &LogMetadata, _time: i64, args: fmt::Arguments<'_>) {
        self.push(State::Log(args.to_string()));
    }

    fn on_init_log_stream(&self, _log_stream: &LogStream) {
        self.push(State::InitLogStream);
    }

    fn on_process_log_block(&self, log_block: Arc<LogBlock>) {
        self.push(State::ProcessLogBlock(log_block.nb_objects()));
    }

    fn on_init_metrics_stream(&self, _metrics_stream: &MetricsStream) {
        self.push(State::InitMetricsStream);
    }

    fn on_process_metrics_block(&self, metrics_block: Arc<MetricsBlock>) {
        self.push(State::ProcessMetricsBlock(metrics_block.nb_objects()));
    }

    fn on_init_thread_stream(&self, _thread_stream: &ThreadStream) {
        self.push(State::InitThreadStream);
    }

    fn on_process_thread_block(&self, thread_block: Arc<ThreadBlock>) {
        self.push(State::ProcessThreadBlock(thread_block.nb_objects()));
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }
}

#[macro_export]
macro_rules! expect_state {
    ($state:expr, $expected:expr) => {
        assert_eq!($state.lock().unwrap().last().cloned(), Some($expected))
    };
}
