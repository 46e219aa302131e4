use serde::{Deserialize, Serialize};
use skylight_transit::UserDefinedType;
use std::collections::HashMap;

/// Sent once when a stream is created.
///
/// The UDT lists describe the byte layout of every record subsequently
/// shipped in the stream's blocks; a record with `size == 0` signals custom
/// parsing.
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamInfo {
    pub stream_id: String,
    pub process_id: String,
    pub dependencies_metadata: Vec<UserDefinedType>,
    pub objects_metadata: Vec<UserDefinedType>,
    pub tags: Vec<String>,
    pub properties: HashMap<String, String>,
}
