//! Tracing crate
//!
//! Records structured log entries, numeric metrics and cpu thread spans into
//! per-stream binary buffers with predictable overhead on the emission path.
//!
//! Contrary to hook-per-event tracing systems, events accumulate in
//! heterogeneous queues serialized with `skylight-transit`; full buffers are
//! rotated and handed to an [`event::EventSink`] as sealed blocks, ready to
//! ship over the wire.
//!
//! # Examples
//! ```
//! use skylight_tracing::{span_scope, info, warn, error, debug, imetric, fmetric, guards, event};
//!
//! // libraries don't need (and should not) set up any TracingSystemGuard;
//! // executables install one, here with a null sink
//! let _tracing_guard = guards::TracingSystemGuard::new(
//!     8 * 1024 * 1024,
//!     1024 * 1024,
//!     16 * 1024 * 1024,
//!     std::sync::Arc::new(event::NullEventSink {}),
//! );
//! let _thread_guard = guards::TracingThreadGuard::new();
//!
//! // span covering the rest of the scope
//! span_scope!("main");
//!
//! info!("hello {}", "world");
//! warn!("stream lagging");
//!
//! imetric!("frame_time", "ticks", 1000);
//! fmetric!("frame_time", "ticks", 1000.0);
//! ```

// crate-specific lint exceptions:
#![allow(unsafe_code, clippy::missing_errors_doc, clippy::inline_always)]

pub mod dispatch;
pub mod errors;
pub mod event;
pub mod flush_monitor;
pub mod guards;
pub mod intern_string;
pub mod levels;
pub mod logs;
pub mod metrics;
pub mod parsing;
pub mod process_info;
pub mod spans;
pub mod static_string_ref;
pub mod time;

#[macro_use]
extern crate lazy_static;

#[macro_use]
mod macros;

pub mod prelude {
    pub use crate::levels::*;
    pub use crate::process_info::*;
    pub use crate::time::*;
    pub use crate::{
        debug, error, fmetric, imetric, info, log, log_enabled, span_scope, trace, warn,
    };
    pub use skylight_tracing_proc_macros::*;
}
