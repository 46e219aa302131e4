use super::{LogMetadata, LogMetadataDependency, LogStaticStrEvent, LogStringEvent,
    LogStringInteropEvent};
use crate::event::{EventBlock, EventStream, ExtractDeps};
use skylight_transit::{declare_queue_struct, prelude::*, StaticStringDependency};
use std::collections::HashSet;

declare_queue_struct!(
    struct LogMsgQueue<LogStaticStrEvent, LogStringEvent, LogStringInteropEvent> {}
);

declare_queue_struct!(
    struct LogDepsQueue<StaticStringDependency, LogMetadataDependency> {}
);

fn record_log_metadata(desc: &LogMetadata, seen: &mut HashSet<u64>, deps: &mut LogDepsQueue) {
    let id = desc as *const _ as u64;
    if !seen.insert(id) {
        return;
    }
    // strings first so the record referencing them resolves in one pass
    for text in [desc.fmt_str, desc.target, desc.file] {
        if seen.insert(text.as_ptr() as u64) {
            deps.push(StaticStringDependency::from(text));
        }
    }
    deps.push(LogMetadataDependency {
        id,
        fmt_str: desc.fmt_str.as_ptr(),
        target: desc.target.as_ptr(),
        file: desc.file.as_ptr(),
        line: desc.line,
        level: desc.level as u32,
    });
}

impl ExtractDeps for LogMsgQueue {
    type DepsQueue = LogDepsQueue;

    fn extract(&self) -> Self::DepsQueue {
        let mut deps = LogDepsQueue::new(1024 * 1024);
        let mut seen = HashSet::new();
        self.for_each(|event| match event {
            LogMsgQueueAny::LogStaticStrEvent(evt) => {
                record_log_metadata(evt.desc, &mut seen, &mut deps);
            }
            LogMsgQueueAny::LogStringEvent(evt) => {
                record_log_metadata(evt.desc, &mut seen, &mut deps);
            }
            LogMsgQueueAny::LogStringInteropEvent(evt) => {
                // the message is inline, the target is the only reference
                if seen.insert(evt.target.id()) {
                    deps.push(evt.target.into_dependency());
                }
            }
        });
        deps
    }
}

pub type LogBlock = EventBlock<LogMsgQueue>;
pub type LogStream = EventStream<LogBlock>;
