//! Drives the flush monitor when the host has no frame loop to hook.
use skylight_tracing::flush_monitor::FlushMonitor;
use std::sync::Once;
use std::time::Duration;

fn tick_forever() {
    let monitor = FlushMonitor::default();
    loop {
        std::thread::sleep(Duration::from_secs(1));
        monitor.tick();
    }
}

/// Spawns the timer thread ticking the flush monitor once per second. The
/// thread is detached; ticks after shutdown hit a cleared dispatch and do
/// nothing.
pub fn spawn_flush_ticker() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::thread::spawn(tick_forever);
    });
}
