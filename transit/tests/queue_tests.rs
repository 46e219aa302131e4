use skylight_transit::prelude::*;
use skylight_transit::{
    declare_queue_struct, read_advance_string, read_consume_pod, read_dependencies, write_any,
    DynString, StaticStringDependency,
};

#[derive(Debug, TransitReflect)]
pub struct CounterEvent {
    pub value: u64,
    pub time: i64,
}

impl InProcSerialize for CounterEvent {}

#[derive(Debug)]
pub struct MessageEvent {
    pub time: i64,
    pub msg: DynString,
}

impl InProcSerialize for MessageEvent {
    const IN_PROC_SIZE: InProcSize = InProcSize::Dynamic;

    fn get_value_size(&self) -> Option<u32> {
        Some(std::mem::size_of::<i64>() as u32 + self.msg.get_value_size().unwrap())
    }

    fn write_value(&self, buffer: &mut Vec<u8>) {
        write_any(buffer, &self.time);
        self.msg.write_value(buffer);
    }

    unsafe fn read_value(mut window: &[u8]) -> Self {
        let time: i64 = read_consume_pod(&mut window);
        let msg = DynString(read_advance_string(&mut window).unwrap());
        Self { time, msg }
    }
}

impl Reflect for MessageEvent {
    fn reflect() -> UserDefinedType {
        UserDefinedType {
            name: String::from("MessageEvent"),
            size: 0,
            members: vec![],
            is_reference: false,
            secondary_udts: vec![],
        }
    }
}

declare_queue_struct!(
    struct TestQueue<CounterEvent, MessageEvent> {}
);

#[test]
fn test_queue_push_preserves_order() {
    let mut queue = TestQueue::new(1024);
    queue.push(CounterEvent { value: 1, time: 10 });
    queue.push(MessageEvent {
        time: 20,
        msg: DynString(String::from("in flight")),
    });
    queue.push(CounterEvent { value: 2, time: 30 });
    assert_eq!(queue.nb_objects(), 3);
    assert!(queue.len_bytes() > 0);

    let items: Vec<TestQueueAny> = queue.iter().collect();
    assert_eq!(items.len(), 3);
    match &items[0] {
        TestQueueAny::CounterEvent(evt) => {
            assert_eq!(evt.value, 1);
            assert_eq!(evt.time, 10);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &items[1] {
        TestQueueAny::MessageEvent(evt) => {
            assert_eq!(evt.time, 20);
            assert_eq!(evt.msg.0, "in flight");
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &items[2] {
        TestQueueAny::CounterEvent(evt) => {
            assert_eq!(evt.value, 2);
            assert_eq!(evt.time, 30);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_queue_for_each_matches_iter() {
    let mut queue = TestQueue::new(1024);
    for i in 0..16u64 {
        queue.push(CounterEvent {
            value: i,
            time: i as i64,
        });
    }
    let mut visited = 0u64;
    queue.for_each(|item| match item {
        TestQueueAny::CounterEvent(evt) => {
            assert_eq!(evt.value, visited);
            visited += 1;
        }
        other => panic!("unexpected event {other:?}"),
    });
    assert_eq!(visited, 16);
}

#[test]
fn test_reflect_contained() {
    let udts = TestQueue::reflect_contained();
    assert_eq!(udts.len(), 2);
    assert_eq!(udts[0].name, "CounterEvent");
    assert_eq!(udts[0].size, std::mem::size_of::<CounterEvent>());
    assert_eq!(udts[0].members.len(), 2);
    assert_eq!(udts[0].members[0].name, "value");
    assert_eq!(udts[0].members[0].type_name, "u64");
    assert!(!udts[0].members[0].is_reference);
    assert_eq!(udts[1].name, "MessageEvent");
    assert_eq!(udts[1].size, 0); // custom parsing
}

#[derive(Debug, TransitReflect)]
pub struct CounterMetadataDependency {
    pub id: u64,
    pub name: *const u8,
    pub line: u32,
}

impl InProcSerialize for CounterMetadataDependency {}

declare_queue_struct!(
    struct TestDepsQueue<StaticStringDependency, CounterMetadataDependency> {}
);

#[test]
fn test_read_dependencies() {
    static NAME: &str = "frame_time";
    let mut deps = TestDepsQueue::new(1024);
    deps.push(StaticStringDependency::from(NAME));
    deps.push(CounterMetadataDependency {
        id: 0xABCD,
        name: NAME.as_ptr(),
        line: 21,
    });

    let udts = TestDepsQueue::reflect_contained();
    let resolved = read_dependencies(&udts, deps.as_bytes()).unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(
        resolved[&(NAME.as_ptr() as u64)].as_str().unwrap(),
        "frame_time"
    );
    let metadata = match &resolved[&0xABCD] {
        skylight_transit::value::Value::Object(obj) => obj.clone(),
        other => panic!("unexpected value {other:?}"),
    };
    assert_eq!(metadata.type_name, "CounterMetadataDependency");
    assert_eq!(metadata.get::<u32>("line").unwrap(), 21);
    assert_eq!(
        metadata
            .get::<std::sync::Arc<String>>("name")
            .unwrap()
            .as_str(),
        "frame_time"
    );
}
