//! Process metadata
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::{frequency, now};

/// Allocates globally unique string identifiers for processes, streams and
/// blocks. Hosts with their own GUID scheme substitute their allocator at
/// init time.
pub type GuidMaker = fn() -> String;

/// Default identifier allocator.
pub fn alloc_guid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub process_id: String,
    pub parent_process_id: String,
    pub exe: String,
    pub username: String,
    pub realname: String,
    pub computer: String,
    pub distro: String,
    pub cpu_brand: String,
    pub tsc_frequency: i64,
    /// RFC 3339
    pub start_time: DateTime<Utc>,
    pub start_ticks: i64,
}

fn cpu_brand() -> String {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    return raw_cpuid::CpuId::new()
        .get_processor_brand_string()
        .map_or_else(|| "unknown".to_owned(), |b| b.as_str().to_owned());
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    return std::env::consts::ARCH.to_owned();
}

/// Builds the process record and stamps the parent/child lineage in the
/// environment so that spawned processes can point back at this one.
pub fn make_process_info(make_guid: GuidMaker) -> ProcessInfo {
    let process_id = make_guid();
    // the variable name matches the engine-side instrumentation so that
    // lineage survives mixed process trees
    let parent_process_id = std::env::var("LGN_TELEMETRY_PARENT_PROCESS").unwrap_or_default();
    std::env::set_var("LGN_TELEMETRY_PARENT_PROCESS", &process_id);
    ProcessInfo {
        process_id,
        parent_process_id,
        exe: std::env::current_exe()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned(),
        username: whoami::username(),
        realname: whoami::realname(),
        computer: whoami::devicename(),
        distro: whoami::distro(),
        cpu_brand: cpu_brand(),
        tsc_frequency: frequency(),
        start_time: Utc::now(),
        start_ticks: now(),
    }
}
