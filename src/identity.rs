//! Node identity: station MAC and the 3-byte short ID derived from it.

use core::fmt;

/// Length of a station MAC address.
pub const MAC_LEN: usize = 6;

/// Length of a short ID.
pub const SHORT_ID_LEN: usize = 3;

/// A 6-byte link-layer address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl MacAddress {
    /// `FF:FF:FF:FF:FF:FF`, the only peer a sensor registers.
    pub const BROADCAST: Self = Self([0xFF; MAC_LEN]);

    pub const fn new(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }

    /// Last three octets. Used as the on-wire demux key.
    pub const fn short_id(&self) -> ShortId {
        ShortId([self.0[3], self.0[4], self.0[5]])
    }

    /// Display adapter for the 12-digit separator-free form (`A1B2C3D4E5F6`).
    pub fn compact(&self) -> CompactMac<'_> {
        CompactMac(self)
    }
}

impl From<[u8; MAC_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }
}

/// Colon-separated uppercase form, as printed in `HUB_MAC`.
impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

/// See [`MacAddress::compact`].
pub struct CompactMac<'a>(&'a MacAddress);

impl fmt::Display for CompactMac<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 .0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Three-byte sender tag carried in every datagram. Not globally unique.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShortId(pub [u8; SHORT_ID_LEN]);

impl ShortId {
    pub const fn new(bytes: [u8; SHORT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; SHORT_ID_LEN] {
        self.0
    }
}

/// Six uppercase hex digits (`D4E5F6`).
impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}
