//! Hub node: drains the mailbox and emits one CSV line per datagram.
//!
//! The receive side is [`Mailbox::deliver`], called from the radio callback.
//! Everything here runs on the main loop.

use core::fmt::Write;

use crate::error::PacketError;
use crate::identity::MacAddress;
use crate::mailbox::{Inbound, Mailbox};
use crate::packet::TouchPacket;
use crate::serialiser;

/// What one [`Hub::poll`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Mailbox was empty.
    Idle,
    /// One line was written.
    Emitted { sender: MacAddress, seq: u16 },
    /// A frame was taken but failed validation; nothing was written.
    Dropped(PacketError),
    /// The sink refused the write.
    SinkError,
}

/// Hub-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HubStats {
    pub emitted: u32,
    pub dropped: u32,
    pub sink_errors: u32,
}

pub struct Hub<'a> {
    mailbox: &'a Mailbox,
    stats: HubStats,
    last_drop: Option<PacketError>,
}

impl<'a> Hub<'a> {
    pub const fn new(mailbox: &'a Mailbox) -> Self {
        Self {
            mailbox,
            stats: HubStats {
                emitted: 0,
                dropped: 0,
                sink_errors: 0,
            },
            last_drop: None,
        }
    }

    /// Print the one-off `HUB_MAC` line.
    pub fn announce<W: Write + ?Sized>(&self, out: &mut W, own_mac: &MacAddress) -> core::fmt::Result {
        serialiser::write_hub_mac_line(out, own_mac)
    }

    /// Drain the mailbox once.
    ///
    /// Snapshot-and-clear happens inside the mailbox's critical section;
    /// decoding and formatting happen after it is released.
    pub fn poll<W: Write + ?Sized>(&mut self, out: &mut W) -> PollOutcome {
        match self.mailbox.take() {
            Some(inbound) => self.emit(out, &inbound),
            None => PollOutcome::Idle,
        }
    }

    fn emit<W: Write + ?Sized>(&mut self, out: &mut W, inbound: &Inbound) -> PollOutcome {
        let packet = match TouchPacket::decode(inbound.frame()) {
            Ok(packet) => packet,
            Err(e) => {
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                self.last_drop = Some(e);
                return PollOutcome::Dropped(e);
            }
        };

        match serialiser::write_touch_line(out, &inbound.sender, &packet) {
            Ok(()) => {
                self.stats.emitted = self.stats.emitted.wrapping_add(1);
                PollOutcome::Emitted {
                    sender: inbound.sender,
                    seq: packet.seq,
                }
            }
            Err(_) => {
                self.stats.sink_errors = self.stats.sink_errors.wrapping_add(1);
                PollOutcome::SinkError
            }
        }
    }

    pub fn stats(&self) -> HubStats {
        self.stats
    }

    pub fn last_drop(&self) -> Option<PacketError> {
        self.last_drop
    }
}
