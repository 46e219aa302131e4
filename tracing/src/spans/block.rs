use crate::{
    event::{EventBlock, EventStream, ExtractDeps},
    spans::{BeginThreadSpanEvent, EndThreadSpanEvent, SpanMetadata, SpanMetadataDependency},
};
use skylight_transit::{declare_queue_struct, prelude::*, StaticStringDependency};
use std::collections::HashSet;

declare_queue_struct!(
    struct ThreadEventQueue<BeginThreadSpanEvent, EndThreadSpanEvent> {}
);

declare_queue_struct!(
    struct ThreadDepsQueue<StaticStringDependency, SpanMetadataDependency> {}
);

fn record_span_metadata(desc: &SpanMetadata, seen: &mut HashSet<u64>, deps: &mut ThreadDepsQueue) {
    let id = desc as *const _ as u64;
    if !seen.insert(id) {
        return;
    }
    // strings first so the record referencing them resolves in one pass
    for text in [desc.name, desc.target, desc.file] {
        if seen.insert(text.as_ptr() as u64) {
            deps.push(StaticStringDependency::from(text));
        }
    }
    deps.push(SpanMetadataDependency {
        id,
        name: desc.name.as_ptr(),
        target: desc.target.as_ptr(),
        file: desc.file.as_ptr(),
        line: desc.line,
    });
}

impl ExtractDeps for ThreadEventQueue {
    type DepsQueue = ThreadDepsQueue;

    const MAX_OBJECT_SIZE: usize = 32;

    fn extract(&self) -> Self::DepsQueue {
        let mut deps = ThreadDepsQueue::new(1024 * 1024);
        let mut seen = HashSet::new();
        self.for_each(|event| {
            let desc = match event {
                ThreadEventQueueAny::BeginThreadSpanEvent(evt) => evt.thread_span_desc,
                ThreadEventQueueAny::EndThreadSpanEvent(evt) => evt.thread_span_desc,
            };
            record_span_metadata(desc, &mut seen, &mut deps);
        });
        deps
    }
}

pub type ThreadBlock = EventBlock<ThreadEventQueue>;
pub type ThreadStream = EventStream<ThreadBlock>;
