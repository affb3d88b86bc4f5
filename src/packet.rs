//! Module: packet
//!
//! Purpose: The touch datagram and its explicit little-endian wire codec.
//!
//! Layout (packed, no padding):
//! ```text
//! [ver:1][n:1][id:3][seq:2][ms:4][v0:2]...[v(n-1):2]   = 11 + 2n bytes
//! ```
//!
//! Native struct layout is never relied on; every field is written and read
//! at a fixed offset.
//!
//! Safety: Safe. No unsafe blocks.

use heapless::Vec;

use crate::config::MAX_CH;
use crate::error::PacketError;
use crate::identity::ShortId;

/// Protocol version written by this build and the only one accepted.
pub const PROTOCOL_VERSION: u8 = 1;

/// `ver + n + id + seq + ms`.
pub const HEADER_LEN: usize = 1 + 1 + 3 + 2 + 4;

/// A full 32-channel datagram (75 bytes). Inbound frames are truncated here.
pub const MAX_PACKET_LEN: usize = HEADER_LEN + 2 * MAX_CH;

const OFF_VER: usize = 0;
const OFF_N: usize = 1;
const OFF_ID: usize = 2;
const OFF_SEQ: usize = 5;
const OFF_MS: usize = 7;
const OFF_VALUES: usize = HEADER_LEN;

/// On-wire length of a datagram carrying `n` channels.
#[inline]
pub const fn wire_len(n: usize) -> usize {
    HEADER_LEN + 2 * n
}

/// Per-channel values, wire order.
pub type ChannelValues = Vec<u16, MAX_CH>;

/// One touch telemetry record.
///
/// `values.len()` is the channel count `n`. The protocol version is implied:
/// encode always writes [`PROTOCOL_VERSION`] and decode rejects anything else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchPacket {
    pub id: ShortId,
    pub seq: u16,
    pub ms: u32,
    pub values: ChannelValues,
}

impl TouchPacket {
    /// Build a packet from a value slice. Values past `MAX_CH` are dropped.
    pub fn new(id: ShortId, seq: u16, ms: u32, values: &[u16]) -> Self {
        let take = values.len().min(MAX_CH);
        let mut packet = Self {
            id,
            seq,
            ms,
            values: Vec::new(),
        };
        // Cannot fail, `take` is within capacity
        let _ = packet.values.extend_from_slice(&values[..take]);
        packet
    }

    /// Channel count `n` as carried on the wire.
    #[inline]
    pub fn channel_count(&self) -> u8 {
        self.values.len() as u8
    }

    /// Exact encoded length, `11 + 2n`.
    #[inline]
    pub fn wire_len(&self) -> usize {
        wire_len(self.values.len())
    }

    /// Serialise into `buf`, returning the number of bytes written.
    ///
    /// Only `11 + 2n` bytes are touched; short datagrams are never padded.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, PacketError> {
        if self.values.is_empty() {
            return Err(PacketError::NoChannels);
        }
        let len = self.wire_len();
        if buf.len() < len {
            return Err(PacketError::BufferTooSmall { needed: len });
        }

        buf[OFF_VER] = PROTOCOL_VERSION;
        buf[OFF_N] = self.channel_count();
        buf[OFF_ID..OFF_SEQ].copy_from_slice(&self.id.bytes());
        buf[OFF_SEQ..OFF_MS].copy_from_slice(&self.seq.to_le_bytes());
        buf[OFF_MS..OFF_VALUES].copy_from_slice(&self.ms.to_le_bytes());

        for (slot, value) in buf[OFF_VALUES..len].chunks_exact_mut(2).zip(&self.values) {
            slot.copy_from_slice(&value.to_le_bytes());
        }

        Ok(len)
    }

    /// Parse a received frame.
    ///
    /// Bytes past [`MAX_PACKET_LEN`] are ignored and a declared `n` above
    /// `MAX_CH` is clamped, so an oversize frame yields at most 32 values.
    /// Trailing bytes beyond `11 + 2·min(n, 32)` are ignored.
    pub fn decode(frame: &[u8]) -> Result<Self, PacketError> {
        if frame.len() < HEADER_LEN {
            return Err(PacketError::TooShort { len: frame.len() });
        }
        let frame = &frame[..frame.len().min(MAX_PACKET_LEN)];

        let ver = frame[OFF_VER];
        if ver != PROTOCOL_VERSION {
            return Err(PacketError::UnsupportedVersion(ver));
        }

        let declared = frame[OFF_N];
        if declared == 0 {
            return Err(PacketError::NoChannels);
        }
        let count = (declared as usize).min(MAX_CH);
        if frame.len() < wire_len(count) {
            return Err(PacketError::Truncated {
                declared,
                len: frame.len(),
            });
        }

        let id = ShortId::new([frame[OFF_ID], frame[OFF_ID + 1], frame[OFF_ID + 2]]);
        let seq = u16::from_le_bytes([frame[OFF_SEQ], frame[OFF_SEQ + 1]]);
        let ms = u32::from_le_bytes([
            frame[OFF_MS],
            frame[OFF_MS + 1],
            frame[OFF_MS + 2],
            frame[OFF_MS + 3],
        ]);

        let mut values = ChannelValues::new();
        for pair in frame[OFF_VALUES..wire_len(count)].chunks_exact(2) {
            // count <= MAX_CH
            let _ = values.push(u16::from_le_bytes([pair[0], pair[1]]));
        }

        Ok(Self { id, seq, ms, values })
    }
}
