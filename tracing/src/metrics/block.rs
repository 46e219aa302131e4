use crate::{
    event::{EventBlock, EventStream, ExtractDeps},
    metrics::{FloatMetricEvent, IntegerMetricEvent, MetricMetadata, MetricMetadataDependency},
};
use skylight_transit::{declare_queue_struct, prelude::*, StaticStringDependency};
use std::collections::HashSet;

declare_queue_struct!(
    struct MetricsMsgQueue<IntegerMetricEvent, FloatMetricEvent> {}
);

declare_queue_struct!(
    struct MetricsDepsQueue<StaticStringDependency, MetricMetadataDependency> {}
);

fn record_metric_metadata(
    desc: &MetricMetadata,
    seen: &mut HashSet<u64>,
    deps: &mut MetricsDepsQueue,
) {
    let id = desc as *const _ as u64;
    if !seen.insert(id) {
        return;
    }
    // strings first so the record referencing them resolves in one pass
    for text in [desc.name, desc.unit, desc.target, desc.file] {
        if seen.insert(text.as_ptr() as u64) {
            deps.push(StaticStringDependency::from(text));
        }
    }
    deps.push(MetricMetadataDependency {
        id,
        name: desc.name.as_ptr(),
        unit: desc.unit.as_ptr(),
        target: desc.target.as_ptr(),
        file: desc.file.as_ptr(),
        line: desc.line,
        lod: desc.lod as u32,
    });
}

impl ExtractDeps for MetricsMsgQueue {
    type DepsQueue = MetricsDepsQueue;

    const MAX_OBJECT_SIZE: usize = 32;

    fn extract(&self) -> Self::DepsQueue {
        let mut deps = MetricsDepsQueue::new(1024 * 1024);
        let mut seen = HashSet::new();
        self.for_each(|event| {
            let desc = match event {
                MetricsMsgQueueAny::IntegerMetricEvent(evt) => evt.desc,
                MetricsMsgQueueAny::FloatMetricEvent(evt) => evt.desc,
            };
            record_metric_metadata(desc, &mut seen, &mut deps);
        });
        deps
    }
}

pub type MetricsBlock = EventBlock<MetricsMsgQueue>;
pub type MetricsStream = EventStream<MetricsBlock>;
