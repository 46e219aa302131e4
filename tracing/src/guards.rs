//! RAII guards tying the telemetry lifecycle to scopes
use crate::dispatch::{
    flush_thread_buffer, init_event_dispatch, init_thread_stream, on_end_scope, shutdown_dispatch,
    Result,
};
use crate::event::EventSink;
use crate::process_info::{alloc_guid, make_process_info, GuidMaker, ProcessInfo};
use crate::spans::SpanMetadata;
use std::marker::PhantomData;
use std::sync::Arc;

/// Initializes the dispatch on creation and shuts it down when dropped.
/// Executables own one; libraries should not.
pub struct TracingSystemGuard {}

impl TracingSystemGuard {
    pub fn new(
        logs_buffer_size: usize,
        metrics_buffer_size: usize,
        threads_buffer_size: usize,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        Self::with_process_info(
            alloc_guid,
            make_process_info(alloc_guid),
            sink,
            logs_buffer_size,
            metrics_buffer_size,
            threads_buffer_size,
        )
    }

    /// For hosts supplying their own GUID allocator and process discovery.
    pub fn with_process_info(
        make_guid: GuidMaker,
        process_info: ProcessInfo,
        sink: Arc<dyn EventSink>,
        logs_buffer_size: usize,
        metrics_buffer_size: usize,
        threads_buffer_size: usize,
    ) -> Result<Self> {
        init_event_dispatch(
            make_guid,
            process_info,
            sink,
            logs_buffer_size,
            metrics_buffer_size,
            threads_buffer_size,
        )?;
        Ok(Self {})
    }
}

impl Drop for TracingSystemGuard {
    fn drop(&mut self) {
        shutdown_dispatch();
    }
}

/// Registers the current thread's span stream on creation and flushes it when
/// dropped.
pub struct TracingThreadGuard {}

impl TracingThreadGuard {
    pub fn new() -> Self {
        init_thread_stream();
        Self {}
    }
}

impl Default for TracingThreadGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TracingThreadGuard {
    fn drop(&mut self) {
        flush_thread_buffer();
    }
}

/// Emits the end-span event when dropped; created by `span_scope!`.
pub struct ThreadSpanGuard {
    pub thread_span_desc: &'static SpanMetadata,
    // makes the guard !Send: spans must end on the thread that began them
    pub _dummy_ptr: PhantomData<*mut u8>,
}

impl Drop for ThreadSpanGuard {
    fn drop(&mut self) {
        on_end_scope(self.thread_span_desc);
    }
}
