use anyhow::{Context, Result};
use skylight_telemetry::block_wire_format::{format_block_payload, BlockEnvelope};
use skylight_tracing::{
    event::{EventBlock, ExtractDeps, TracingBlock},
    logs::LogBlock,
    metrics::MetricsBlock,
    spans::ThreadBlock,
};
use skylight_transit::HeterogeneousQueue;

/// Sealed blocks that can be turned into a shipping payload.
pub trait StreamBlock {
    fn encode_bin(&self, block_id: String) -> Result<Vec<u8>>;
}

fn encode_block<Q>(block: &EventBlock<Q>, block_id: String) -> Result<Vec<u8>>
where
    Q: HeterogeneousQueue + ExtractDeps,
    <Q as ExtractDeps>::DepsQueue: HeterogeneousQueue,
{
    let end = block
        .end
        .as_ref()
        .with_context(|| "encoding a block that was not sealed")?;
    let envelope = BlockEnvelope {
        block_id,
        stream_id: block.stream_id.clone(),
        begin_time: block
            .begin
            .time
            .to_rfc3339_opts(chrono::SecondsFormat::Nanos, false),
        begin_ticks: block.begin.ticks,
        end_time: end
            .time
            .to_rfc3339_opts(chrono::SecondsFormat::Nanos, false),
        end_ticks: end.ticks,
        nb_objects: block.nb_objects() as i32,
    };
    let deps = block.events.extract();
    format_block_payload(&envelope, deps.as_bytes(), block.events.as_bytes())
}

impl StreamBlock for LogBlock {
    fn encode_bin(&self, block_id: String) -> Result<Vec<u8>> {
        encode_block(self, block_id)
    }
}

impl StreamBlock for MetricsBlock {
    fn encode_bin(&self, block_id: String) -> Result<Vec<u8>> {
        encode_block(self, block_id)
    }
}

impl StreamBlock for ThreadBlock {
    fn encode_bin(&self, block_id: String) -> Result<Vec<u8>> {
        encode_block(self, block_id)
    }
}
