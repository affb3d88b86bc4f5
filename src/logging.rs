//! Non-blocking logging for the node main loops.
//!
//! # Architecture
//!
//! ```text
//! Main loop                LogStream                 Debug UART
//! ─────────                ─────────                 ──────────
//!
//! link_info!() ──────────▶ [L0][L1][L2] ──drain()──▶ [ms] LEVEL: msg
//! stack format             fixed ring                 a few per iteration
//! never blocks             drops when full
//! ```
//!
//! # Rules
//!
//! - The sampling loop and the hub loop never write to a UART directly to log;
//!   they push here and drain later.
//! - The radio receive callback never logs. It only bumps mailbox counters.
//! - Messages are dropped (and counted) if the ring is full.
//! - One producer, one consumer per stream.

use core::cell::UnsafeCell;
use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length in bytes. Longer messages are truncated.
pub const MAX_MSG_LEN: usize = 96;

/// Log ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Bounded message text.
pub type Message = heapless::String<MAX_MSG_LEN>;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Node-local milliseconds (wraps with the same clock as `ms` on the wire).
    pub timestamp_ms: u32,
    pub level: LogLevel,
    pub msg: Message,
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_ms: 0,
        level: LogLevel::Info,
        msg: Message::new(),
    };
}

/// Fixed-size log ring.
///
/// `push` is the producer side (main loop), `drain` the consumer side (debug
/// drain, same loop or another task). Coordination is two atomic indices.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: single producer owns the slot at write_idx until it publishes it,
// single consumer owns the slot at read_idx until it releases it. The full
// check keeps the two from ever touching the same slot.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue one entry. Returns `false` if the ring was full and it was dropped.
    #[inline]
    pub fn push(&self, timestamp_ms: u32, level: LogLevel, msg: &str) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: slot `idx` is not visible to the consumer until write_idx
        // is published below.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_ms = timestamp_ms;
            entry.level = level;
            entry.msg.clear();
            push_truncated(&mut entry.msg, msg);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the oldest entry, if any.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: slot published by the producer, not reused until read_idx
        // moves past it.
        let entry = unsafe { (*self.entries.get())[idx].clone() };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries lost to a full ring since the last reset.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() != 0
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Append as much of `s` as fits, cutting on a char boundary.
fn push_truncated<const M: usize>(buf: &mut heapless::String<M>, s: &str) {
    let room = M - buf.len();
    let mut cut = s.len().min(room);
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    // Fits by construction
    let _ = buf.push_str(&s[..cut]);
}

/// `fmt::Write` adapter that truncates instead of failing.
struct Truncating<'a, const M: usize>(&'a mut heapless::String<M>);

impl<const M: usize> Write for Truncating<'_, M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        push_truncated(self.0, s);
        Ok(())
    }
}

/// Format `args` into a bounded message, truncating on overflow.
#[inline]
pub fn format_message(args: fmt::Arguments<'_>) -> Message {
    let mut msg = Message::new();
    let _ = Truncating(&mut msg).write_fmt(args);
    msg
}

/// Format and push one entry.
///
/// ```ignore
/// link_log!(LogLevel::Info, LOG_STREAM, now_ms, "sent {} frames", n);
/// ```
#[macro_export]
macro_rules! link_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let msg = $crate::logging::format_message(format_args!($($arg)*));
        $stream.push($timestamp, $level, msg.as_str());
    }};
}

#[macro_export]
macro_rules! link_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! link_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// The node's log stream. Each firmware binary runs exactly one role, so one
/// stream is enough.
pub static LOG_STREAM: LogStream = LogStream::new();
