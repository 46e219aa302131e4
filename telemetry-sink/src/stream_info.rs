use skylight_telemetry::stream_info::StreamInfo;
use skylight_tracing::event::{EventStream, ExtractDeps, TracingBlock};
use skylight_transit::{HeterogeneousQueue, UserDefinedType};

/// Builds the stream envelope: identifiers, tags, properties and the layout
/// of every record shape the stream can ship.
pub fn get_stream_info<Block>(stream: &EventStream<Block>) -> StreamInfo
where
    Block: TracingBlock,
    <Block as TracingBlock>::Queue: HeterogeneousQueue,
    <<Block as TracingBlock>::Queue as ExtractDeps>::DepsQueue: HeterogeneousQueue,
{
    let dependencies_metadata =
        make_queue_metadata::<<<Block as TracingBlock>::Queue as ExtractDeps>::DepsQueue>();
    let objects_metadata = make_queue_metadata::<Block::Queue>();
    StreamInfo {
        stream_id: stream.stream_id().to_owned(),
        process_id: stream.process_id().to_owned(),
        dependencies_metadata,
        objects_metadata,
        tags: stream.tags().to_vec(),
        properties: stream.properties().clone(),
    }
}

fn collect_secondary_udts(secondary: &mut Vec<UserDefinedType>, udt: &UserDefinedType) {
    for sec in &udt.secondary_udts {
        collect_secondary_udts(secondary, sec);
        if !secondary.iter().any(|existing| existing.name == sec.name) {
            secondary.push(sec.clone());
        }
    }
}

fn make_queue_metadata<Queue: HeterogeneousQueue>() -> Vec<UserDefinedType> {
    let mut types = Queue::reflect_contained();
    let mut secondary = vec![];
    for udt in &types {
        collect_secondary_udts(&mut secondary, udt);
    }
    // secondary types go after the primaries: wire tags index the primary list
    types.append(&mut secondary);
    types
}
