use crate::{levels::Level, static_string_ref::StaticStringRef};
use skylight_transit::{
    prelude::*, read_advance_string, read_consume_pod, write_any, DynString, InProcSize,
};

/// Describes a log callsite. Statically allocated; its address is the wire
/// identity of the callsite.
#[derive(Debug)]
pub struct LogMetadata {
    pub level: Level,
    pub fmt_str: &'static str,
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
}

#[derive(Debug, TransitReflect)]
pub struct LogStaticStrEvent {
    pub desc: &'static LogMetadata,
    pub time: i64,
}

impl InProcSerialize for LogStaticStrEvent {}

/// Log entry whose message was formatted at runtime; the metadata stays a
/// reference, the message is copied into the queue.
#[derive(Debug)]
pub struct LogStringEvent {
    pub desc: &'static LogMetadata,
    pub time: i64,
    pub msg: DynString,
}

impl InProcSerialize for LogStringEvent {
    const IN_PROC_SIZE: InProcSize = InProcSize::Dynamic;

    fn get_value_size(&self) -> Option<u32> {
        Some(
            std::mem::size_of::<usize>() as u32 //desc reference
                + std::mem::size_of::<i64>() as u32 //time
                + self.msg.get_value_size().unwrap(), //message
        )
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        let desc_id = self.desc as *const _ as usize;
        write_any(buffer, &desc_id);
        write_any(buffer, &self.time);
        self.msg.write_value(buffer);
    }

    unsafe fn read_value(mut window: &[u8]) -> Self {
        let desc_id: usize = read_consume_pod(&mut window);
        let desc = &*(desc_id as *const LogMetadata);
        let time: i64 = read_consume_pod(&mut window);
        let msg = DynString(read_advance_string(&mut window).unwrap());
        assert_eq!(window.len(), 0);
        Self { desc, time, msg }
    }
}

impl Reflect for LogStringEvent {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("LogStringEvent"),
            size: 0,
            members: vec![],
            is_reference: false,
            secondary_udts: vec![],
        }
    }
}

/// Log entry captured from the host's log routing; the target keeps its
/// codec so engine strings survive the trip.
#[derive(Debug)]
pub struct LogStringInteropEvent {
    pub time: i64,
    pub level: u8,
    pub target: StaticStringRef,
    pub msg: DynString,
}

impl InProcSerialize for LogStringInteropEvent {
    const IN_PROC_SIZE: InProcSize = InProcSize::Dynamic;

    fn get_value_size(&self) -> Option<u32> {
        Some(
            std::mem::size_of::<i64>() as u32 //time
                + std::mem::size_of::<u8>() as u32 //level
                + std::mem::size_of::<StaticStringRef>() as u32 //target
                + self.msg.get_value_size().unwrap(), //message
        )
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        write_any(buffer, &self.time);
        write_any(buffer, &self.level);
        write_any(buffer, &self.target);
        self.msg.write_value(buffer);
    }

    unsafe fn read_value(mut window: &[u8]) -> Self {
        let time: i64 = read_consume_pod(&mut window);
        let level: u8 = read_consume_pod(&mut window);
        let target: StaticStringRef = read_consume_pod(&mut window);
        let msg = DynString(read_advance_string(&mut window).unwrap());
        Self {
            time,
            level,
            target,
            msg,
        }
    }
}

impl Reflect for LogStringInteropEvent {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("LogStringInteropEvent"),
            size: 0,
            members: vec![],
            is_reference: false,
            secondary_udts: vec![StaticStringRef::reflect()],
        }
    }
}

/// Flat copy of a [`LogMetadata`] plus its 64-bit identity, shipped with
/// every block whose events reference it.
#[derive(Debug, TransitReflect)]
pub struct LogMetadataDependency {
    pub id: u64,
    pub fmt_str: *const u8,
    pub target: *const u8,
    pub file: *const u8,
    pub line: u32,
    pub level: u32,
}

impl InProcSerialize for LogMetadataDependency {}
