//! Broadcaster: packs filtered values into datagrams and broadcasts them at
//! the target rate.
//!
//! # Contract
//!
//! Fire-and-forget. A failed send is counted and forgotten; the next tick
//! carries fresher data anyway. No retry, no backpressure.

use crate::error::LinkError;
use crate::identity::ShortId;
use crate::packet::{ChannelValues, TouchPacket, MAX_PACKET_LEN};

/// Connectionless broadcast link (ESP-NOW on target).
pub trait RadioLink {
    /// Transmit one frame to the broadcast address.
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), LinkError>;
}

impl<T: RadioLink + ?Sized> RadioLink for &mut T {
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        (**self).broadcast(frame)
    }
}

/// Polling send scheduler.
///
/// Due when `now − last_send ≥ period_ms` in wrapping millisecond arithmetic,
/// so it keeps working across the 2³² ms rollover. A period of 0 is always
/// due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacer {
    period_ms: u32,
    last_send: u32,
}

impl Pacer {
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            last_send: 0,
        }
    }

    /// Build from a target rate in Hz (`0` = uncapped).
    pub const fn from_hz(target_hz: u32) -> Self {
        Self::new(if target_hz == 0 { 0 } else { 1000 / target_hz })
    }

    /// Check and, if due, mark `now` as the last send.
    #[inline]
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.period_ms == 0 || now_ms.wrapping_sub(self.last_send) >= self.period_ms {
            self.last_send = now_ms;
            true
        } else {
            false
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

/// Transmit counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TxStats {
    /// Frames handed to the radio successfully.
    pub sent: u32,
    /// Frames the radio rejected.
    pub failed: u32,
    pub last_error: Option<LinkError>,
}

/// What one broadcast attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxReport {
    pub seq: u16,
    pub len: usize,
    pub result: Result<(), LinkError>,
}

pub struct Broadcaster<R> {
    radio: R,
    id: ShortId,
    seq: u16,
    pacer: Pacer,
    frame: [u8; MAX_PACKET_LEN],
    stats: TxStats,
}

impl<R: RadioLink> Broadcaster<R> {
    pub fn new(radio: R, id: ShortId, pacer: Pacer) -> Self {
        Self {
            radio,
            id,
            seq: 0,
            pacer,
            frame: [0; MAX_PACKET_LEN],
            stats: TxStats::default(),
        }
    }

    /// Send `values` if the pacer says a send is due at `now_ms`.
    ///
    /// `values` is read only when a send happens, so the caller can keep
    /// filtering between sends and always ship the freshest value.
    pub fn poll(&mut self, now_ms: u32, values: impl FnOnce() -> ChannelValues) -> Option<TxReport> {
        if !self.pacer.poll(now_ms) {
            return None;
        }
        let values = values();
        Some(self.send(now_ms, &values))
    }

    /// Build, encode and transmit one datagram stamped with `now_ms`.
    ///
    /// `seq` is post-incremented and wraps at 2¹⁶.
    pub fn send(&mut self, now_ms: u32, values: &[u16]) -> TxReport {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);

        let packet = TouchPacket::new(self.id, seq, now_ms, values);
        let len = match packet.encode(&mut self.frame) {
            Ok(len) => len,
            // Empty channel list: nothing to put on the air
            Err(_) => return TxReport { seq, len: 0, result: Ok(()) },
        };

        let result = self.radio.broadcast(&self.frame[..len]);
        match result {
            Ok(()) => self.stats.sent = self.stats.sent.wrapping_add(1),
            Err(e) => {
                self.stats.failed = self.stats.failed.wrapping_add(1);
                self.stats.last_error = Some(e);
            }
        }

        TxReport { seq, len, result }
    }

    /// Sequence number the next datagram will carry.
    pub fn next_seq(&self) -> u16 {
        self.seq
    }

    /// Resume numbering from `seq`.
    pub fn set_next_seq(&mut self, seq: u16) {
        self.seq = seq;
    }

    pub fn short_id(&self) -> ShortId {
        self.id
    }

    pub fn stats(&self) -> TxStats {
        self.stats
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }
}
