//! StaticStringRef points to a string dependency keeping track of the codec.
//! Necessary where ansi, wide and host-interned strings coexist with plain
//! utf-8 literals.
use crate::intern_string::resolve_host_string;
use skylight_transit::{
    prelude::*, string_codec::StringCodec, Member, StaticStringDependency, UserDefinedType,
};

#[derive(Debug)]
pub struct StaticStringRef {
    pub ptr: *const u8,
    pub len: u32,
    pub codec: StringCodec,
}

impl InProcSerialize for StaticStringRef {}

// reference udt: decoders resolve the id against the block's dependencies
impl Reflect for StaticStringRef {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("StaticStringRef"),
            size: std::mem::size_of::<Self>(),
            members: vec![Member {
                name: String::from("id"),
                type_name: String::from("usize"),
                offset: memoffset::offset_of!(Self, ptr),
                size: std::mem::size_of::<*const u8>(),
                is_reference: true,
            }],
            is_reference: true,
            secondary_udts: vec![],
        }
    }
}

impl StaticStringRef {
    pub fn id(&self) -> u64 {
        self.ptr as u64
    }

    /// Reference to a string interned by the host; carries no bytes until
    /// the dependency extractor materializes them through the registered
    /// resolver.
    pub fn from_host_id(id: u64) -> Self {
        Self {
            ptr: id as *const u8,
            len: 0,
            codec: StringCodec::HostInterned,
        }
    }

    pub fn into_dependency(&self) -> StaticStringDependency {
        match self.codec {
            StringCodec::HostInterned => {
                let resolved = resolve_host_string(self.id()).unwrap_or("");
                StaticStringDependency {
                    id: self.id(),
                    codec: StringCodec::Utf8,
                    len: resolved.len() as u32,
                    ptr: resolved.as_ptr(),
                }
            }
            codec => StaticStringDependency {
                id: self.id(),
                codec,
                len: self.len,
                ptr: self.ptr,
            },
        }
    }
}

impl std::convert::From<&'static str> for StaticStringRef {
    fn from(src: &'static str) -> Self {
        Self {
            len: src.len() as u32,
            ptr: src.as_ptr(),
            codec: StringCodec::Utf8,
        }
    }
}
