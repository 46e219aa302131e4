use crate::time::DualTime;
use skylight_transit::HeterogeneousQueue;

/// A sealed, time-bounded slice of one stream's events, the unit of
/// shipping. `end` is set exactly once, when the block is closed at rotation.
#[derive(Debug)]
pub struct EventBlock<Q> {
    pub stream_id: String,
    pub begin: DualTime,
    pub events: Q,
    pub end: Option<DualTime>,
}

impl<Q> EventBlock<Q>
where
    Q: HeterogeneousQueue,
{
    pub fn close(&mut self) {
        self.end = Some(DualTime::now());
    }
}

/// Computes the set of metadata and string records referenced by a queue's
/// events, each exactly once.
pub trait ExtractDeps {
    type DepsQueue;

    /// Upper bound on the wire footprint of a single record. Streams reserve
    /// this much headroom below their capacity so one last record always
    /// fits after `is_full` first reports true.
    const MAX_OBJECT_SIZE: usize = 128;

    fn extract(&self) -> Self::DepsQueue;
}

pub trait TracingBlock {
    type Queue: ExtractDeps;

    fn new(buffer_size: usize, stream_id: String) -> Self;
    fn len_bytes(&self) -> usize;
    fn capacity_bytes(&self) -> usize;
    fn nb_objects(&self) -> usize;
    fn events_mut(&mut self) -> &mut Self::Queue;
    fn hint_max_obj_size(&self) -> usize {
        <Self::Queue as ExtractDeps>::MAX_OBJECT_SIZE
    }
}

impl<Q> TracingBlock for EventBlock<Q>
where
    Q: HeterogeneousQueue + ExtractDeps,
{
    type Queue = Q;

    fn new(buffer_size: usize, stream_id: String) -> Self {
        Self {
            stream_id,
            begin: DualTime::now(),
            events: Q::new(buffer_size),
            end: None,
        }
    }

    fn len_bytes(&self) -> usize {
        self.events.len_bytes()
    }

    fn capacity_bytes(&self) -> usize {
        self.events.capacity_bytes()
    }

    fn nb_objects(&self) -> usize {
        self.events.nb_objects()
    }

    fn events_mut(&mut self) -> &mut Self::Queue {
        &mut self.events
    }
}
