use skylight_transit::prelude::*;

/// Describes an instrumented scope. Statically allocated; its address is the
/// wire identity of the span.
#[derive(Debug)]
pub struct SpanMetadata {
    pub name: &'static str,
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
}

#[derive(Debug, TransitReflect)]
pub struct BeginThreadSpanEvent {
    pub thread_span_desc: &'static SpanMetadata,
    pub time: i64,
}

impl InProcSerialize for BeginThreadSpanEvent {}

#[derive(Debug, TransitReflect)]
pub struct EndThreadSpanEvent {
    pub thread_span_desc: &'static SpanMetadata,
    pub time: i64,
}

impl InProcSerialize for EndThreadSpanEvent {}

#[derive(Debug, TransitReflect)]
pub struct SpanMetadataDependency {
    pub id: u64,
    pub name: *const u8,
    pub target: *const u8,
    pub file: *const u8,
    pub line: u32,
}

impl InProcSerialize for SpanMetadataDependency {}
