//! Debug log drain.
//!
//! Moves entries from a [`LogStream`] to a debug serial port:
//!
//! ```text
//! Sensor: UART0 (USB bridge), 115200, shared with ESP-IDF boot output
//! Hub:    UART1 TX on HUB_DEBUG_TX_PIN, 115200, never the data link
//! ```
//!
//! The sink is any `core::fmt::Write`, so the drain is host-testable.

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Room for a full entry plus its prefix.
const FORMAT_CAPACITY: usize = 160;

/// How often dropped-entry counts are reported.
pub const DROP_REPORT_INTERVAL_MS: u32 = 10_000;

/// Format: `[timestamp_ms] LEVEL: message\n`
pub fn format_entry(entry: &LogEntry) -> heapless::String<FORMAT_CAPACITY> {
    let mut out = heapless::String::new();
    // Capacity covers the widest prefix plus MAX_MSG_LEN
    let _ = writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.msg.as_str()
    );
    out
}

/// Drains a stream into a debug sink, a bounded number of entries per call.
pub struct DebugDrain {
    max_per_call: usize,
    last_drop_report: u32,
}

impl DebugDrain {
    pub const fn new(max_per_call: usize) -> Self {
        Self {
            max_per_call,
            last_drop_report: 0,
        }
    }

    /// Write up to `max_per_call` entries. Returns how many were written.
    ///
    /// Every [`DROP_REPORT_INTERVAL_MS`] a `[WARN] Dropped: N` line is added
    /// if entries were lost, and the counter is reset.
    pub fn service<W: Write + ?Sized, const N: usize>(
        &mut self,
        stream: &LogStream<N>,
        out: &mut W,
        now_ms: u32,
    ) -> usize {
        let mut written = 0;
        while written < self.max_per_call {
            let Some(entry) = stream.drain() else {
                break;
            };
            let _ = out.write_str(&format_entry(&entry));
            written += 1;
        }

        if now_ms.wrapping_sub(self.last_drop_report) >= DROP_REPORT_INTERVAL_MS {
            let dropped = stream.dropped();
            if dropped > 0 {
                let _ = writeln!(out, "[WARN] Dropped: {}", dropped);
                stream.reset_dropped();
            }
            self.last_drop_report = now_ms;
        }

        written
    }

    /// Write everything queued. Used before halting.
    pub fn flush<W: Write + ?Sized, const N: usize>(&mut self, stream: &LogStream<N>, out: &mut W) {
        while let Some(entry) = stream.drain() {
            let _ = out.write_str(&format_entry(&entry));
        }
    }
}
