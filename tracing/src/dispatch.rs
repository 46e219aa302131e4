//! Where events are recorded and eventually handed to a sink
pub use crate::errors::{Error, Result};
use crate::event::{EventSink, TracingBlock};
use crate::intern_string::intern_string;
use crate::logs::{
    LogBlock, LogMetadata, LogStaticStrEvent, LogStream, LogStringEvent, LogStringInteropEvent,
};
use crate::metrics::{
    FloatMetricEvent, IntegerMetricEvent, MetricMetadata, MetricsBlock, MetricsStream,
};
use crate::process_info::{GuidMaker, ProcessInfo};
use crate::spans::{
    BeginThreadSpanEvent, EndThreadSpanEvent, SpanMetadata, ThreadBlock, ThreadEventQueueTypeIndex,
    ThreadStream,
};
use crate::time::now;
use crate::{info, warn};
use skylight_transit::DynString;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

// Single-writer, many-reader process-wide handle. Readers load the pointer
// without synchronization beyond the atomic; a null read after shutdown
// drops the event silently.
static G_DISPATCH: AtomicPtr<Dispatch> = AtomicPtr::new(std::ptr::null_mut());

thread_local! {
    static LOCAL_THREAD_STREAM: Cell<Option<ThreadStream>> = const { Cell::new(None) };
}

#[inline]
fn get_dispatch() -> Option<&'static Dispatch> {
    let ptr = G_DISPATCH.load(Ordering::Acquire);
    unsafe { ptr.as_ref() }
}

pub fn init_event_dispatch(
    make_guid: GuidMaker,
    process_info: ProcessInfo,
    sink: Arc<dyn EventSink>,
    logs_buffer_size: usize,
    metrics_buffer_size: usize,
    threads_buffer_size: usize,
) -> Result<()> {
    lazy_static::lazy_static! {
        static ref INIT_MUTEX: Mutex<()> = Mutex::new(());
    }
    let _guard = INIT_MUTEX.lock().unwrap();
    if !G_DISPATCH.load(Ordering::Acquire).is_null() {
        info!("event dispatch already initialized");
        return Err(Error::AlreadyInitialized());
    }
    let dispatch = Box::into_raw(Box::new(Dispatch::new(
        make_guid,
        process_info,
        sink,
        logs_buffer_size,
        metrics_buffer_size,
        threads_buffer_size,
    )));
    G_DISPATCH.store(dispatch, Ordering::Release);
    let dispatch = unsafe { &*dispatch };
    dispatch.startup();
    dispatch.init_log_stream();
    dispatch.init_metrics_stream();
    Ok(())
}

/// Flushes the shared streams, including their final blocks, notifies the
/// sink, then clears the process-wide handle. Events emitted after the
/// teardown are dropped silently.
pub fn shutdown_dispatch() {
    let ptr = G_DISPATCH.load(Ordering::Acquire);
    if let Some(dispatch) = unsafe { ptr.as_ref() } {
        dispatch.rotate_log_stream();
        dispatch.rotate_metrics_stream();
        dispatch.sink.on_shutdown();
        G_DISPATCH.swap(std::ptr::null_mut(), Ordering::AcqRel);
        // the dispatch is leaked on purpose: emitters racing with shutdown
        // may still be using the pointer they loaded before the swap
    }
}

/// Reclaims the dispatch.
///
/// # Safety
///
/// Only for tests that need to re-init: no other thread may be emitting and
/// `shutdown_dispatch` must not have run since the matching init (shutdown
/// already retired the instance in that case).
pub unsafe fn force_uninit() {
    let ptr = G_DISPATCH.swap(std::ptr::null_mut(), Ordering::AcqRel);
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

#[inline]
pub fn process_id() -> Option<String> {
    get_dispatch().map(Dispatch::get_process_id)
}

pub fn get_sink() -> Option<Arc<dyn EventSink>> {
    get_dispatch().map(Dispatch::get_sink)
}

#[inline(always)]
pub fn int_metric(metric_desc: &'static MetricMetadata, value: u64) {
    if let Some(d) = get_dispatch() {
        d.int_metric(metric_desc, value);
    }
}

#[inline(always)]
pub fn float_metric(metric_desc: &'static MetricMetadata, value: f64) {
    if let Some(d) = get_dispatch() {
        d.float_metric(metric_desc, value);
    }
}

#[inline(always)]
pub fn log(desc: &'static LogMetadata, args: fmt::Arguments<'_>) {
    if let Some(d) = get_dispatch() {
        d.log(desc, args);
    }
}

#[inline(always)]
pub fn log_interop(desc: &LogMetadata, args: fmt::Arguments<'_>) {
    if let Some(d) = get_dispatch() {
        d.log_interop(desc, args);
    }
}

#[inline(always)]
pub fn log_enabled(metadata: &LogMetadata) -> bool {
    if let Some(d) = get_dispatch() {
        d.log_enabled(metadata)
    } else {
        false
    }
}

#[inline(always)]
pub fn flush_log_buffer() {
    if let Some(d) = get_dispatch() {
        d.flush_log_buffer();
    }
}

#[inline(always)]
pub fn flush_metrics_buffer() {
    if let Some(d) = get_dispatch() {
        d.flush_metrics_buffer();
    }
}

//todo: should be implicit by default but limit the maximum number of tracked
// threads
#[inline(always)]
pub fn init_thread_stream() {
    LOCAL_THREAD_STREAM.with(|cell| unsafe {
        if (*cell.as_ptr()).is_some() {
            return;
        }
        if let Some(d) = get_dispatch() {
            d.init_thread_stream(cell);
        } else {
            warn!("dispatch not initialized, cannot init thread stream, events will be lost for this thread");
        }
    });
}

pub fn for_each_thread_stream(fun: &mut dyn FnMut(*mut ThreadStream)) {
    if let Some(d) = get_dispatch() {
        d.for_each_thread_stream(fun);
    }
}

#[inline(always)]
pub fn flush_thread_buffer() {
    LOCAL_THREAD_STREAM.with(|cell| unsafe {
        let opt_stream = &mut *cell.as_ptr();
        if let Some(stream) = opt_stream {
            if let Some(d) = get_dispatch() {
                d.flush_thread_buffer(stream);
            }
        }
    });
}

#[inline(always)]
pub fn on_begin_scope(scope: &'static SpanMetadata) {
    on_thread_event(BeginThreadSpanEvent {
        thread_span_desc: scope,
        time: now(),
    });
}

#[inline(always)]
pub fn on_end_scope(scope: &'static SpanMetadata) {
    on_thread_event(EndThreadSpanEvent {
        thread_span_desc: scope,
        time: now(),
    });
}

#[inline(always)]
fn on_thread_event<T>(event: T)
where
    T: skylight_transit::InProcSerialize + ThreadEventQueueTypeIndex,
{
    LOCAL_THREAD_STREAM.with(|cell| unsafe {
        // streams are created lazily on the first event of each thread
        if (*cell.as_ptr()).is_none() {
            if let Some(d) = get_dispatch() {
                d.init_thread_stream(cell);
            }
        }
        let opt_stream = &mut *cell.as_ptr();
        if let Some(stream) = opt_stream {
            stream.get_events_mut().push(event);
            if stream.is_full() {
                flush_thread_buffer();
            }
        }
    });
}

struct Dispatch {
    process_id: String,
    make_guid: GuidMaker,
    process_info: Arc<ProcessInfo>,
    logs_buffer_size: usize,
    metrics_buffer_size: usize,
    threads_buffer_size: usize,
    log_stream: Mutex<LogStream>,
    metrics_stream: Mutex<MetricsStream>,
    thread_streams: Mutex<Vec<*mut ThreadStream>>, // owning threads must outlive the registry entry
    sink: Arc<dyn EventSink>,
}

// the thread stream registry holds raw pointers kept alive by their owning
// threads; everything else is mutex- or atomic-guarded
unsafe impl Send for Dispatch {}
unsafe impl Sync for Dispatch {}

impl Dispatch {
    pub fn new(
        make_guid: GuidMaker,
        process_info: ProcessInfo,
        sink: Arc<dyn EventSink>,
        logs_buffer_size: usize,
        metrics_buffer_size: usize,
        threads_buffer_size: usize,
    ) -> Self {
        let process_id = process_info.process_id.clone();
        Self {
            process_id: process_id.clone(),
            make_guid,
            process_info: Arc::new(process_info),
            logs_buffer_size,
            metrics_buffer_size,
            threads_buffer_size,
            log_stream: Mutex::new(LogStream::new(
                logs_buffer_size,
                process_id.clone(),
                make_guid(),
                &[String::from("log")],
                HashMap::new(),
            )),
            metrics_stream: Mutex::new(MetricsStream::new(
                metrics_buffer_size,
                process_id,
                make_guid(),
                &[String::from("metrics")],
                HashMap::new(),
            )),
            thread_streams: Mutex::new(vec![]),
            sink,
        }
    }

    pub fn get_process_id(&self) -> String {
        self.process_id.clone()
    }

    pub fn get_sink(&self) -> Arc<dyn EventSink> {
        self.sink.clone()
    }

    fn startup(&self) {
        self.sink.on_startup(self.process_info.clone());
    }

    fn init_log_stream(&self) {
        let log_stream = self.log_stream.lock().unwrap();
        self.sink.on_init_log_stream(&log_stream);
    }

    fn init_metrics_stream(&self) {
        let metrics_stream = self.metrics_stream.lock().unwrap();
        self.sink.on_init_metrics_stream(&metrics_stream);
    }

    fn init_thread_stream(&self, cell: &Cell<Option<ThreadStream>>) {
        let mut properties = HashMap::new();
        properties.insert(String::from("thread-id"), thread_id::get().to_string());
        if let Some(name) = std::thread::current().name() {
            properties.insert("thread-name".to_owned(), name.to_owned());
        }
        let thread_stream = ThreadStream::new(
            self.threads_buffer_size,
            self.process_id.clone(),
            (self.make_guid)(),
            &["cpu".to_owned()],
            properties,
        );
        unsafe {
            let opt_ref = &mut *cell.as_ptr();
            self.sink.on_init_thread_stream(&thread_stream);
            *opt_ref = Some(thread_stream);
            let mut vec_guard = self.thread_streams.lock().unwrap();
            vec_guard.push(opt_ref.as_mut().unwrap());
        }
    }

    fn for_each_thread_stream(&self, fun: &mut dyn FnMut(*mut ThreadStream)) {
        let mut vec_guard = self.thread_streams.lock().unwrap();
        for stream in &mut *vec_guard {
            fun(*stream);
        }
    }

    #[inline]
    fn int_metric(&self, desc: &'static MetricMetadata, value: u64) {
        let time = now();
        let mut metrics_stream = self.metrics_stream.lock().unwrap();
        metrics_stream
            .get_events_mut()
            .push(IntegerMetricEvent { desc, value, time });
        if metrics_stream.is_full() {
            // rotation must not run under the stream lock
            drop(metrics_stream);
            self.flush_metrics_buffer();
        }
    }

    #[inline]
    fn float_metric(&self, desc: &'static MetricMetadata, value: f64) {
        let time = now();
        let mut metrics_stream = self.metrics_stream.lock().unwrap();
        metrics_stream
            .get_events_mut()
            .push(FloatMetricEvent { desc, value, time });
        if metrics_stream.is_full() {
            drop(metrics_stream);
            self.flush_metrics_buffer();
        }
    }

    fn log_enabled(&self, metadata: &LogMetadata) -> bool {
        self.sink.on_log_enabled(metadata)
    }

    #[inline]
    fn log(&self, desc: &'static LogMetadata, args: fmt::Arguments<'_>) {
        if !self.log_enabled(desc) {
            return;
        }
        let time = now();
        self.sink.on_log(desc, time, args);
        let mut log_stream = self.log_stream.lock().unwrap();
        if args.as_str().is_some() {
            log_stream
                .get_events_mut()
                .push(LogStaticStrEvent { desc, time });
        } else {
            log_stream.get_events_mut().push(LogStringEvent {
                desc,
                time,
                msg: DynString(args.to_string()),
            });
        }
        if log_stream.is_full() {
            drop(log_stream);
            self.flush_log_buffer();
        }
    }

    #[inline]
    fn log_interop(&self, desc: &LogMetadata, args: fmt::Arguments<'_>) {
        let time = now();
        self.sink.on_log(desc, time, args);
        let mut log_stream = self.log_stream.lock().unwrap();
        log_stream.get_events_mut().push(LogStringInteropEvent {
            time,
            level: desc.level as u8,
            target: intern_string(desc.target).into(),
            msg: DynString(args.to_string()),
        });
        if log_stream.is_full() {
            drop(log_stream);
            self.flush_log_buffer();
        }
    }

    #[inline]
    fn flush_log_buffer(&self) {
        let log_stream = self.log_stream.lock().unwrap();
        if log_stream.is_empty() {
            return;
        }
        self.rotate_log_stream_impl(log_stream);
    }

    fn rotate_log_stream(&self) {
        let log_stream = self.log_stream.lock().unwrap();
        self.rotate_log_stream_impl(log_stream);
    }

    fn rotate_log_stream_impl(&self, mut guard: MutexGuard<'_, LogStream>) {
        let stream_id = guard.stream_id().to_string();
        let mut old_block =
            guard.replace_block(Arc::new(LogBlock::new(self.logs_buffer_size, stream_id)));
        assert!(!guard.is_full());
        drop(guard); // unlocks the stream before the sink call
        Arc::get_mut(&mut old_block).unwrap().close();
        self.sink.on_process_log_block(old_block);
    }

    #[inline]
    fn flush_metrics_buffer(&self) {
        let metrics_stream = self.metrics_stream.lock().unwrap();
        if metrics_stream.is_empty() {
            return;
        }
        self.rotate_metrics_stream_impl(metrics_stream);
    }

    fn rotate_metrics_stream(&self) {
        let metrics_stream = self.metrics_stream.lock().unwrap();
        self.rotate_metrics_stream_impl(metrics_stream);
    }

    fn rotate_metrics_stream_impl(&self, mut guard: MutexGuard<'_, MetricsStream>) {
        let stream_id = guard.stream_id().to_string();
        let mut old_block = guard.replace_block(Arc::new(MetricsBlock::new(
            self.metrics_buffer_size,
            stream_id,
        )));
        assert!(!guard.is_full());
        drop(guard); // unlocks the stream before the sink call
        Arc::get_mut(&mut old_block).unwrap().close();
        self.sink.on_process_metrics_block(old_block);
    }

    #[inline]
    fn flush_thread_buffer(&self, stream: &mut ThreadStream) {
        if stream.is_empty() {
            return;
        }
        let mut old_block = stream.replace_block(Arc::new(ThreadBlock::new(
            self.threads_buffer_size,
            stream.stream_id().to_string(),
        )));
        assert!(!stream.is_full());
        Arc::get_mut(&mut old_block).unwrap().close();
        self.sink.on_process_thread_block(old_block);
    }
}
