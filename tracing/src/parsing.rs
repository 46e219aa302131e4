//! Manual parsing of dynamically sized events
use anyhow::{Context, Result};
use skylight_transit::{
    advance_window, parse_pod_instance, read_advance_string, read_consume_pod,
    value::{Object, Value},
    CustomReaderMap, UserDefinedType,
};
use std::{collections::HashMap, sync::Arc};

fn parse_log_string_event(
    udt: &UserDefinedType,
    _udts: &[UserDefinedType],
    dependencies: &HashMap<u64, Value>,
    mut object_window: &[u8],
) -> Result<Value> {
    let desc_id: u64 = read_consume_pod(&mut object_window);
    let time: i64 = read_consume_pod(&mut object_window);
    let msg = read_advance_string(&mut object_window).with_context(|| "parsing string")?;
    let desc: Value = dependencies
        .get(&desc_id)
        .with_context(|| format!("desc member {} of LogStringEvent not found", desc_id))?
        .clone();
    let members = vec![
        (String::from("time"), Value::I64(time)),
        (String::from("msg"), Value::String(Arc::new(msg))),
        (String::from("desc"), desc),
    ];
    Ok(Value::Object(Arc::new(Object {
        type_name: udt.name.clone(),
        members,
    })))
}

fn parse_log_string_interop_event(
    udt: &UserDefinedType,
    udts: &[UserDefinedType],
    dependencies: &HashMap<u64, Value>,
    mut object_window: &[u8],
) -> Result<Value> {
    let string_ref_metadata = udts
        .iter()
        .find(|t| t.name == "StaticStringRef")
        .with_context(|| {
            "can't parse log string interop event with no metadata for StaticStringRef"
        })?;
    let time: i64 = read_consume_pod(&mut object_window);
    let level: u8 = read_consume_pod(&mut object_window);
    let target = parse_pod_instance(
        string_ref_metadata,
        udts,
        dependencies,
        &object_window[0..string_ref_metadata.size],
    )
    .with_context(|| "parse_pod_instance")?;
    object_window = advance_window(object_window, string_ref_metadata.size);
    let msg = read_advance_string(&mut object_window)?;
    let members = vec![
        (String::from("time"), Value::I64(time)),
        (String::from("level"), Value::U8(level)),
        (String::from("target"), target),
        (String::from("msg"), Value::String(Arc::new(msg))),
    ];
    Ok(Value::Object(Arc::new(Object {
        type_name: udt.name.clone(),
        members,
    })))
}

/// Dictionary of custom readers for dynamically sized events
pub fn make_custom_readers() -> CustomReaderMap {
    let mut custom_readers: CustomReaderMap = HashMap::new();
    custom_readers.insert("LogStringEvent".into(), Arc::new(parse_log_string_event));
    custom_readers.insert(
        "LogStringInteropEvent".into(),
        Arc::new(parse_log_string_interop_event),
    );
    custom_readers
}
