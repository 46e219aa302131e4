mod utils;

use serial_test::serial;
use skylight_tracing::dispatch::{
    flush_thread_buffer, force_uninit, init_event_dispatch, init_thread_stream, shutdown_dispatch,
};
use skylight_tracing::event::in_memory_sink::InMemorySink;
use skylight_tracing::flush_monitor::FlushMonitor;
use skylight_tracing::levels::{set_max_level, LevelFilter};
use skylight_tracing::process_info::{alloc_guid, make_process_info};
use skylight_tracing::{imetric, info, span_scope};
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use utils::{DebugEventSink, SharedState, State};

#[test]
#[serial]
fn test_flush_monitor_flushes_all_streams() {
    let sink = Arc::new(InMemorySink::new());
    init_event_dispatch(
        alloc_guid,
        make_process_info(alloc_guid),
        sink.clone(),
        4096,
        4096,
        4096,
    )
    .unwrap();
    set_max_level(LevelFilter::Trace);

    // a worker holding a thread stream with unflushed spans
    let (ready_send, ready_recv) = channel();
    let (resume_send, resume_recv) = channel::<()>();
    let (rotated_send, rotated_recv) = channel();
    let worker = std::thread::spawn(move || {
        init_thread_stream();
        {
            span_scope!("warmup");
        }
        ready_send.send(()).unwrap();
        resume_recv.recv().unwrap();
        // the monitor marked this stream full: the next event rotates it
        {
            span_scope!("after_flush");
        }
        rotated_send.send(()).unwrap();
        // hold the thread (and its registered stream) until shutdown
        resume_recv.recv().ok();
        flush_thread_buffer();
    });
    ready_recv.recv().unwrap();

    info!("pending log entry");
    imetric!("pending_metric", "count", 1);

    let monitor = FlushMonitor::new(0);
    monitor.tick();
    assert!(sink.log_block_count() >= 1);
    assert!(sink.metrics_block_count() >= 1);
    assert_eq!(sink.total_log_events(), 1);
    assert_eq!(sink.total_metrics_events(), 1);
    // thread buffers are not touched from the monitor's thread
    assert_eq!(sink.thread_block_count(), 0);

    resume_send.send(()).unwrap();
    rotated_recv.recv().unwrap();
    assert!(sink.thread_block_count() >= 1);

    drop(resume_send);
    worker.join().unwrap();
    shutdown_dispatch();
    unsafe { force_uninit() };
}

#[test]
#[serial]
fn test_flush_monitor_skips_busy_sink() {
    let state: SharedState = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::new(DebugEventSink::new(state.clone()));
    init_event_dispatch(
        alloc_guid,
        make_process_info(alloc_guid),
        sink.clone(),
        4096,
        4096,
        4096,
    )
    .unwrap();
    set_max_level(LevelFilter::Trace);

    info!("pending log entry");
    sink.set_busy(true);
    let monitor = FlushMonitor::new(0);
    monitor.tick();
    let nb_blocks = state
        .lock()
        .unwrap()
        .iter()
        .filter(|s| matches!(s, State::ProcessLogBlock(_)))
        .count();
    assert_eq!(nb_blocks, 0);

    sink.set_busy(false);
    monitor.tick();
    expect_state!(&state, State::ProcessLogBlock(1));

    shutdown_dispatch();
    unsafe { force_uninit() };
}
