//! On-wire layout of a shipped block:
//! `[envelope json as DynString] [u32: dep size] [lz4 deps] [u32: obj size] [lz4 objects]`
use crate::compression::{compress, decompress};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skylight_transit::{advance_window, read_advance_string, read_consume_pod, write_any, DynString, InProcSerialize};

/// Header of the binary block payload.
///
/// Both raw tick counts and RFC3339 times are sent so that decoders can
/// calibrate ticks against the wall clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockEnvelope {
    pub block_id: String,
    pub stream_id: String,
    pub begin_time: String,
    pub begin_ticks: i64,
    pub end_time: String,
    pub end_ticks: i64,
    pub nb_objects: i32,
}

/// Parsed counterpart of [`format_block_payload`], dependency and object
/// buffers already decompressed.
#[derive(Debug)]
pub struct BlockPayload {
    pub envelope: BlockEnvelope,
    pub dependencies: Vec<u8>,
    pub objects: Vec<u8>,
}

pub fn format_block_payload(
    envelope: &BlockEnvelope,
    dependencies: &[u8],
    objects: &[u8],
) -> Result<Vec<u8>> {
    let envelope_json =
        serde_json::to_string(envelope).with_context(|| "serializing block envelope")?;
    let compressed_deps = compress(dependencies)?;
    let compressed_objects = compress(objects)?;
    let mut buffer = Vec::with_capacity(
        envelope_json.len() + compressed_deps.len() + compressed_objects.len() + 16,
    );
    DynString(envelope_json).write_value(&mut buffer);
    write_any(&mut buffer, &(compressed_deps.len() as u32));
    buffer.extend_from_slice(&compressed_deps);
    write_any(&mut buffer, &(compressed_objects.len() as u32));
    buffer.extend_from_slice(&compressed_objects);
    Ok(buffer)
}

pub fn parse_block_payload(mut window: &[u8]) -> Result<BlockPayload> {
    let envelope_json =
        read_advance_string(&mut window).with_context(|| "reading block envelope")?;
    let envelope: BlockEnvelope =
        serde_json::from_str(&envelope_json).with_context(|| "parsing block envelope")?;
    let dep_size: u32 = read_consume_pod(&mut window);
    if window.len() < dep_size as usize {
        anyhow::bail!("truncated dependencies section");
    }
    let dependencies = decompress(&window[..dep_size as usize])
        .with_context(|| "decompressing dependencies")?;
    window = advance_window(window, dep_size as usize);
    let obj_size: u32 = read_consume_pod(&mut window);
    if window.len() < obj_size as usize {
        anyhow::bail!("truncated objects section");
    }
    let objects =
        decompress(&window[..obj_size as usize]).with_context(|| "decompressing objects")?;
    Ok(BlockPayload {
        envelope,
        dependencies,
        objects,
    })
}
