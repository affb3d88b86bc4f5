//! Node-local time.

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::sys;

/// Milliseconds since boot, wrapping at 2³².
///
/// Same clock as the `ms` field on the wire.
#[inline]
pub fn millis() -> u32 {
    // SAFETY: esp_timer_get_time is always safe to call after boot
    let us = unsafe { sys::esp_timer_get_time() };
    (us / 1000) as u32
}

/// Blocking delay. Only used during bring-up (baseline seeding) and halt.
#[inline]
pub fn delay_ms(ms: u32) {
    FreeRtos::delay_ms(ms);
}
