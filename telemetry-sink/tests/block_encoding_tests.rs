//! Decodes shipped block payloads back into values using only the stream
//! envelope metadata, the way a remote decoder would.
use skylight_telemetry::block_wire_format::parse_block_payload;
use skylight_telemetry_sink::stream_block::StreamBlock;
use skylight_telemetry_sink::stream_info::get_stream_info;
use skylight_tracing::event::TracingBlock;
use skylight_tracing::intern_string::set_host_string_resolver;
use skylight_tracing::levels::Level;
use skylight_tracing::logs::{LogBlock, LogMetadata, LogStaticStrEvent, LogStream,
    LogStringInteropEvent};
use skylight_tracing::parsing::make_custom_readers;
use skylight_tracing::static_string_ref::StaticStringRef;
use skylight_transit::value::Value;
use skylight_transit::{parse_object_buffer, read_dependencies, DynString};
use std::collections::HashMap;
use std::sync::Arc;

static LOG_DESC: LogMetadata = LogMetadata {
    level: Level::Info,
    fmt_str: "hello",
    target: "net",
    file: "a.cc",
    line: 7,
};

fn make_log_stream() -> LogStream {
    LogStream::new(
        4096,
        String::from("process-1"),
        String::from("stream-1"),
        &[String::from("log")],
        HashMap::new(),
    )
}

#[test]
fn test_stream_info_layout() {
    let stream = make_log_stream();
    let info = get_stream_info(&stream);
    assert_eq!(info.stream_id, "stream-1");
    assert_eq!(info.process_id, "process-1");
    assert_eq!(info.tags, vec![String::from("log")]);

    let dep_names: Vec<&str> = info
        .dependencies_metadata
        .iter()
        .map(|udt| udt.name.as_str())
        .collect();
    assert_eq!(dep_names, vec!["StaticStringDependency", "LogMetadataDependency"]);

    let obj_names: Vec<&str> = info
        .objects_metadata
        .iter()
        .map(|udt| udt.name.as_str())
        .collect();
    // secondary udts come after the primaries, tags index the primary list
    assert_eq!(
        obj_names,
        vec![
            "LogStaticStrEvent",
            "LogStringEvent",
            "LogStringInteropEvent",
            "StaticStringRef",
        ]
    );
}

#[test]
fn test_log_block_round_trip() {
    let stream = make_log_stream();
    let info = get_stream_info(&stream);

    let mut block = LogBlock::new(4096, String::from("stream-1"));
    block.events.push(LogStaticStrEvent {
        desc: &LOG_DESC,
        time: 1000,
    });
    block.close();

    let payload_bytes = block.encode_bin(String::from("block-1")).unwrap();
    let payload = parse_block_payload(&payload_bytes).unwrap();
    assert_eq!(payload.envelope.block_id, "block-1");
    assert_eq!(payload.envelope.stream_id, "stream-1");
    assert_eq!(payload.envelope.nb_objects, 1);
    assert!(payload.envelope.begin_ticks <= payload.envelope.end_ticks);

    let deps = read_dependencies(&info.dependencies_metadata, &payload.dependencies).unwrap();
    // "hello", "net", "a.cc" and the metadata record
    assert_eq!(deps.len(), 4);
    assert_eq!(
        deps[&(LOG_DESC.target.as_ptr() as u64)].as_str().unwrap(),
        "net"
    );
    assert_eq!(
        deps[&(LOG_DESC.fmt_str.as_ptr() as u64)].as_str().unwrap(),
        "hello"
    );

    let mut decoded = vec![];
    parse_object_buffer(
        &make_custom_readers(),
        &deps,
        &info.objects_metadata,
        &payload.objects,
        |value| {
            decoded.push(value);
            Ok(true)
        },
    )
    .unwrap();
    assert_eq!(decoded.len(), 1);
    let event = match &decoded[0] {
        Value::Object(obj) => obj.clone(),
        other => panic!("unexpected value {other:?}"),
    };
    assert_eq!(event.type_name, "LogStaticStrEvent");
    assert_eq!(event.get::<i64>("time").unwrap(), 1000);
    let desc = event.get::<Arc<skylight_transit::value::Object>>("desc").unwrap();
    assert_eq!(desc.get::<Arc<String>>("target").unwrap().as_str(), "net");
    assert_eq!(desc.get::<Arc<String>>("fmt_str").unwrap().as_str(), "hello");
    assert_eq!(desc.get::<Arc<String>>("file").unwrap().as_str(), "a.cc");
    assert_eq!(desc.get::<u32>("line").unwrap(), 7);
    assert_eq!(desc.get::<u32>("level").unwrap(), 3);
}

#[test]
fn test_interop_block_round_trip() {
    set_host_string_resolver(|id| {
        if id == 77 {
            Some(String::from("engine.core"))
        } else {
            None
        }
    });
    let stream = make_log_stream();
    let info = get_stream_info(&stream);

    let mut block = LogBlock::new(4096, String::from("stream-1"));
    block.events.push(LogStringInteropEvent {
        time: 5,
        level: Level::Warn as u8,
        target: StaticStringRef::from_host_id(77),
        msg: DynString(String::from("payload")),
    });
    block.close();

    let payload_bytes = block.encode_bin(String::from("block-2")).unwrap();
    let payload = parse_block_payload(&payload_bytes).unwrap();
    let deps = read_dependencies(&info.dependencies_metadata, &payload.dependencies).unwrap();
    assert_eq!(deps[&77].as_str().unwrap(), "engine.core");

    let mut decoded = vec![];
    parse_object_buffer(
        &make_custom_readers(),
        &deps,
        &info.objects_metadata,
        &payload.objects,
        |value| {
            decoded.push(value);
            Ok(true)
        },
    )
    .unwrap();
    assert_eq!(decoded.len(), 1);
    let event = match &decoded[0] {
        Value::Object(obj) => obj.clone(),
        other => panic!("unexpected value {other:?}"),
    };
    assert_eq!(event.type_name, "LogStringInteropEvent");
    assert_eq!(event.get::<i64>("time").unwrap(), 5);
    assert_eq!(event.get::<u8>("level").unwrap(), Level::Warn as u8);
    assert_eq!(
        event.get::<Arc<String>>("target").unwrap().as_str(),
        "engine.core"
    );
    assert_eq!(event.get::<Arc<String>>("msg").unwrap().as_str(), "payload");
}
