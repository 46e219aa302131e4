use crate::{
    read_consume_pod, string_codec::StringCodec, write_any, InProcSerialize, InProcSize, Reflect,
    UserDefinedType,
};

/// Serializes the identity of a static string along with its bytes.
/// Shipped with every block that references the string so that decoders can
/// resolve references without process-global state.
///
/// The identity is the emitting process's pointer or intern handle; for
/// host-interned strings the bytes are materialized at extraction time while
/// the identity stays the host's handle value.
#[derive(Debug)]
pub struct StaticStringDependency {
    pub id: u64,
    pub codec: StringCodec,
    pub len: u32,
    pub ptr: *const u8,
}

impl std::convert::From<&'static str> for StaticStringDependency {
    fn from(src: &'static str) -> Self {
        Self {
            id: src.as_ptr() as u64,
            codec: StringCodec::Utf8,
            len: src.len() as u32,
            ptr: src.as_ptr(),
        }
    }
}

// dynamically sized, decoders use a custom reader
impl Reflect for StaticStringDependency {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("StaticStringDependency"),
            size: 0,
            members: vec![],
            is_reference: false,
            secondary_udts: vec![],
        }
    }
}

impl InProcSerialize for StaticStringDependency {
    const IN_PROC_SIZE: InProcSize = InProcSize::Dynamic;

    fn get_value_size(&self) -> Option<u32> {
        let size = std::mem::size_of::<u64>() as u32 + // id
            1 + // codec
            std::mem::size_of::<u32>() as u32 + // size in bytes
            self.len; // actual buffer
        Some(size)
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        write_any(buffer, &self.id);
        let codec = self.codec as u8;
        write_any(buffer, &codec);
        write_any(buffer, &self.len);
        unsafe {
            let slice = std::slice::from_raw_parts(self.ptr, self.len as usize);
            buffer.extend_from_slice(slice);
        }
    }

    unsafe fn read_value(mut window: &[u8]) -> Self {
        let id: u64 = read_consume_pod(&mut window);
        let codec = StringCodec::try_from(read_consume_pod::<u8>(&mut window)).unwrap();
        let buffer_size: u32 = read_consume_pod(&mut window);
        assert_eq!(buffer_size as usize, window.len());
        Self {
            id,
            codec,
            len: buffer_size,
            ptr: window.as_ptr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_string_dependency() {
        let dep = StaticStringDependency::from("net");
        assert_eq!(dep.id, "net".as_ptr() as u64);
        let mut buffer = vec![];
        dep.write_value(&mut buffer);
        assert_eq!(buffer.len(), dep.get_value_size().unwrap() as usize);

        let read_back = unsafe { StaticStringDependency::read_value(&buffer) };
        assert_eq!(read_back.id, dep.id);
        assert_eq!(read_back.len, 3);
        let bytes = unsafe { std::slice::from_raw_parts(read_back.ptr, read_back.len as usize) };
        assert_eq!(bytes, b"net");
    }
}
