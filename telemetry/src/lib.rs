//! structures and functions common to the shipping sink and to decoders
pub mod block_wire_format;
pub mod compression;
pub mod stream_info;
