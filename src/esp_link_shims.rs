//! Runtime symbol providers for third-party crates.
//!
//! `async-io-mini` timers sit on `embassy-time`, which links against a
//! global time driver through two symbols.  They are provided here with a
//! 1 MHz tick: `esp_timer_get_time()` on target, a process-local
//! monotonic clock on host.  Wakes are scheduled on a short-lived sleeper
//! thread, which is enough for the 100 ms queue waits of the pipeline.

use core::task::Waker;
use core::time::Duration;

#[cfg(target_os = "espidf")]
fn now_us() -> u64 {
    // SAFETY: esp_timer is started by the IDF before app_main.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
}

#[cfg(not(target_os = "espidf"))]
fn now_us() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_micros() as u64
}

/// Current time in driver ticks (µs).
#[unsafe(no_mangle)]
fn _embassy_time_now() -> u64 {
    now_us()
}

/// Wake `waker` once the driver clock reaches `at`.
#[unsafe(no_mangle)]
fn _embassy_time_schedule_wake(at: u64, waker: &Waker) {
    let now = now_us();
    if at <= now {
        waker.wake_by_ref();
        return;
    }
    let sleeper = waker.clone();
    let spawned = std::thread::Builder::new()
        .name("time-wake".into())
        .stack_size(4 * 1024)
        .spawn(move || {
            std::thread::sleep(Duration::from_micros(at - now));
            sleeper.wake();
        });
    if let Err(e) = spawned {
        // Re-poll now; the timer re-registers on its next poll.
        log::warn!("time driver: wake thread spawn failed: {}", e);
        waker.wake_by_ref();
    }
}
