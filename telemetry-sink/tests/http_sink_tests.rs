use skylight_telemetry_sink::http_event_sink::HttpEventSink;
use skylight_tracing::event::{EventSink, TracingBlock};
use skylight_tracing::levels::Level;
use skylight_tracing::logs::{LogBlock, LogMetadata, LogStaticStrEvent};
use skylight_tracing::process_info::alloc_guid;
use std::sync::Arc;

static LOG_DESC: LogMetadata = LogMetadata {
    level: Level::Info,
    fmt_str: "ping",
    target: "net",
    file: file!(),
    line: line!(),
};

// nothing listens on the discard port: every request fails, which must stay
// invisible to the emitter
#[test]
fn test_worker_drains_and_joins_on_shutdown() {
    let sink = HttpEventSink::new("http://127.0.0.1:9/", alloc_guid);
    let mut block = LogBlock::new(1024, String::from("stream-1"));
    block.events.push(LogStaticStrEvent {
        desc: &LOG_DESC,
        time: 1,
    });
    block.close();
    sink.on_process_log_block(Arc::new(block));
    // drains the queue, joins the worker; must not hang or panic
    sink.on_shutdown();
    assert!(!sink.is_busy());
}
