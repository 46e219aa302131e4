use skylight_telemetry::block_wire_format::{
    format_block_payload, parse_block_payload, BlockEnvelope,
};
use skylight_telemetry::compression::{compress, decompress};

#[test]
fn test_compression_round_trip() {
    let src: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let compressed = compress(&src).unwrap();
    assert!(compressed.len() < src.len());
    let decompressed = decompress(&compressed).unwrap();
    assert_eq!(decompressed, src);
}

#[test]
fn test_block_payload_round_trip() {
    let envelope = BlockEnvelope {
        block_id: String::from("block-1"),
        stream_id: String::from("stream-1"),
        begin_time: String::from("2024-04-02T10:00:00.000000000+00:00"),
        begin_ticks: 1000,
        end_time: String::from("2024-04-02T10:00:01.000000000+00:00"),
        end_ticks: 2000,
        nb_objects: 3,
    };
    let dependencies = vec![1u8, 2, 3, 4, 5];
    let objects = vec![9u8; 512];

    let payload_bytes = format_block_payload(&envelope, &dependencies, &objects).unwrap();
    let payload = parse_block_payload(&payload_bytes).unwrap();
    assert_eq!(payload.envelope.block_id, "block-1");
    assert_eq!(payload.envelope.stream_id, "stream-1");
    assert_eq!(payload.envelope.begin_ticks, 1000);
    assert_eq!(payload.envelope.end_ticks, 2000);
    assert_eq!(payload.envelope.nb_objects, 3);
    assert_eq!(payload.dependencies, dependencies);
    assert_eq!(payload.objects, objects);
}

#[test]
fn test_parse_rejects_invalid_envelope() {
    use skylight_transit::{DynString, InProcSerialize};
    let mut buffer = vec![];
    DynString(String::from("not json")).write_value(&mut buffer);
    assert!(parse_block_payload(&buffer).is_err());
}

#[test]
fn test_parse_rejects_truncated_sections() {
    let envelope = BlockEnvelope {
        block_id: String::from("block-1"),
        stream_id: String::from("stream-1"),
        begin_time: String::new(),
        begin_ticks: 0,
        end_time: String::new(),
        end_ticks: 0,
        nb_objects: 0,
    };
    let payload_bytes = format_block_payload(&envelope, b"deps", b"objects").unwrap();
    // cut inside the compressed objects section
    assert!(parse_block_payload(&payload_bytes[..payload_bytes.len() - 4]).is_err());
}
