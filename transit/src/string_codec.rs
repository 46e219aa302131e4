use crate::{Reflect, UserDefinedType};

/// Encoding of a serialized string. `HostInterned` identifies a string owned
/// by the host's intern registry; it carries no inline bytes and is resolved
/// when dependencies are extracted.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StringCodec {
    Ansi = 0,
    Wide = 1,
    Utf8 = 2,
    HostInterned = 3,
}

impl Reflect for StringCodec {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("StringCodec"),
            size: 1,
            members: vec![],
            is_reference: false,
            secondary_udts: vec![],
        }
    }
}

impl TryFrom<u8> for StringCodec {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(StringCodec::Ansi),
            1 => Ok(StringCodec::Wide),
            2 => Ok(StringCodec::Utf8),
            3 => Ok(StringCodec::HostInterned),
            other => anyhow::bail!("invalid codec id {other}"),
        }
    }
}
