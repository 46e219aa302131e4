use crate::{
    advance_window, read_consume_pod, string_codec::StringCodec, write_any, InProcSerialize,
    InProcSize,
};
use anyhow::Result;

/// Runtime-formed string, fully owned at serialization time; the queue copies
/// the bytes.
#[derive(Debug)]
pub struct DynString(pub String);

impl InProcSerialize for DynString {
    const IN_PROC_SIZE: InProcSize = InProcSize::Dynamic;

    fn get_value_size(&self) -> Option<u32> {
        let header_size = 1 + // codec
            std::mem::size_of::<u32>() as u32; // size in bytes
        Some(header_size + self.0.len() as u32)
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        let codec = StringCodec::Utf8 as u8;
        write_any(buffer, &codec);
        let len = self.0.len() as u32;
        write_any(buffer, &len);
        buffer.extend_from_slice(self.0.as_bytes());
    }

    unsafe fn read_value(mut window: &[u8]) -> Self {
        let res = read_advance_string(&mut window).unwrap();
        assert_eq!(window.len(), 0);
        Self(res)
    }
}

/// Parse string from buffer, move buffer pointer forward.
pub fn read_advance_string(window: &mut &[u8]) -> Result<String> {
    let codec = StringCodec::try_from(read_consume_pod::<u8>(window))?;
    let string_len_bytes: u32 = read_consume_pod(window);
    let string_buffer = &(*window)[0..(string_len_bytes as usize)];
    *window = advance_window(window, string_len_bytes as usize);
    match codec {
        StringCodec::Ansi => {
            // typically windows-1252; close enough to latin1 to decode lossily
            Ok(String::from_utf8_lossy(string_buffer).to_string())
        }
        StringCodec::Wide => {
            if string_len_bytes % 2 != 0 {
                anyhow::bail!("wrong utf-16 buffer size");
            }
            let wide: Vec<u16> = string_buffer
                .chunks_exact(2)
                .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                .collect();
            Ok(String::from_utf16_lossy(&wide))
        }
        StringCodec::Utf8 => Ok(String::from_utf8_lossy(string_buffer).to_string()),
        StringCodec::HostInterned => {
            anyhow::bail!("host-interned strings carry no inline bytes")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dyn_string_round_trip() {
        let mut buffer = vec![];
        let value = DynString(String::from("shipping lane"));
        value.write_value(&mut buffer);
        assert_eq!(buffer.len(), value.get_value_size().unwrap() as usize);
        let read_back = unsafe { DynString::read_value(&buffer) };
        assert_eq!(read_back.0, "shipping lane");
    }

    #[test]
    fn test_read_wide_string() {
        let mut buffer = vec![StringCodec::Wide as u8];
        let utf16: Vec<u16> = "wide".encode_utf16().collect();
        write_any(&mut buffer, &((utf16.len() * 2) as u32));
        for unit in utf16 {
            buffer.extend_from_slice(&unit.to_ne_bytes());
        }
        let mut window = &buffer[..];
        assert_eq!(read_advance_string(&mut window).unwrap(), "wide");
        assert!(window.is_empty());
    }
}
