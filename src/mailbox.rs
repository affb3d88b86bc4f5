//! Single-slot overwrite mailbox between the radio receive callback and the
//! hub main loop.
//!
//! # Architecture
//!
//! ```text
//! Wi-Fi task               Mailbox                 Main loop
//! ──────────               ───────                 ─────────
//!
//! recv cb ──deliver()──▶ [ slot ] ──take()──────▶ decode + serialise
//!   no block              overwrite               snapshot + clear
//!   no alloc              on arrival              in one critical section
//! ```
//!
//! # Rules
//!
//! - Writer and reader each hold the critical section only for a fixed-size
//!   copy. No I/O or allocation inside.
//! - A second arrival before `take()` replaces the first. Older samples have
//!   no value, so there is no queue.
//! - Frames shorter than the header are dropped at the door.

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;

use crate::identity::{MacAddress, MAC_LEN};
use crate::packet::{HEADER_LEN, MAX_PACKET_LEN};

/// A received frame together with its sender, as copied out of the radio
/// callback. At most [`MAX_PACKET_LEN`] bytes are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub sender: MacAddress,
    len: u8,
    bytes: [u8; MAX_PACKET_LEN],
}

impl Inbound {
    /// Copy `data` (truncated to [`MAX_PACKET_LEN`]) and `sender`.
    pub fn copy_from(sender: &[u8; MAC_LEN], data: &[u8]) -> Self {
        let len = data.len().min(MAX_PACKET_LEN);
        let mut bytes = [0u8; MAX_PACKET_LEN];
        bytes[..len].copy_from_slice(&data[..len]);
        Self {
            sender: MacAddress::new(*sender),
            len: len as u8,
            bytes,
        }
    }

    /// The kept frame bytes.
    pub fn frame(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// Outcome of [`Mailbox::deliver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Slot was empty.
    Stored,
    /// Slot held an undrained frame, which is now gone.
    Overwrote,
    /// Shorter than the header, dropped.
    Rejected,
}

/// Diagnostics snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MailboxStats {
    pub stored: u32,
    pub overwritten: u32,
    pub rejected: u32,
}

pub struct Mailbox {
    slot: Mutex<Cell<Option<Inbound>>>,
    stored: AtomicU32,
    overwritten: AtomicU32,
    rejected: AtomicU32,
}

impl Mailbox {
    /// Create an empty mailbox. `const` so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
            stored: AtomicU32::new(0),
            overwritten: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
        }
    }

    /// Receive-callback side.
    ///
    /// Safe to call from the Wi-Fi task: one bounded copy outside the critical
    /// section, one slot swap inside it.
    #[inline]
    pub fn deliver(&self, sender: &[u8; MAC_LEN], data: &[u8]) -> Delivery {
        if data.len() < HEADER_LEN {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            return Delivery::Rejected;
        }

        let inbound = Inbound::copy_from(sender, data);
        let previous = critical_section::with(|cs| self.slot.borrow(cs).replace(Some(inbound)));

        self.stored.fetch_add(1, Ordering::Relaxed);
        if previous.is_some() {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
            Delivery::Overwrote
        } else {
            Delivery::Stored
        }
    }

    /// Main-loop side: snapshot the frame and sender, and clear ready, as one
    /// atomic step with respect to [`deliver`](Self::deliver).
    #[inline]
    pub fn take(&self) -> Option<Inbound> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    /// Whether a frame is waiting.
    pub fn is_ready(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }

    pub fn stats(&self) -> MailboxStats {
        MailboxStats {
            stored: self.stored.load(Ordering::Relaxed),
            overwritten: self.overwritten.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}
