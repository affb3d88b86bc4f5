//! CSV line formatting for the hub's serial link.
//!
//! Two line kinds, both LF-terminated ASCII:
//!
//! ```text
//! HUB_MAC AA:BB:CC:DD:EE:FF
//! touch,<MAC12>,<ID6>,<seq>,<ms>,<n>,<v0>,...,<v(n-1)>
//! ```
//!
//! Hex is uppercase, decimals carry no leading zeros, there is no quoting.
//! A line is rendered completely into a [`Line`] before it touches the sink,
//! so lines are never interleaved.

use core::fmt::{self, Write};

use crate::config::MAX_CH;
use crate::identity::MacAddress;
use crate::packet::TouchPacket;

/// Longest possible touch line:
/// `touch,` + 12 + `,` + 6 + `,65535,4294967295,32` + 32 × `,65535` + LF.
pub const MAX_TOUCH_LINE_LEN: usize = 6 + 12 + 1 + 6 + 6 + 11 + 3 + 6 * MAX_CH + 1;

/// Line buffer size, rounded up from [`MAX_TOUCH_LINE_LEN`].
pub const LINE_CAPACITY: usize = 256;

const _: () = assert!(MAX_TOUCH_LINE_LEN <= LINE_CAPACITY);

/// One fully rendered output line.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Prefix of every telemetry line.
pub const TOUCH_TAG: &str = "touch";

/// Prefix of the one-off boot line.
pub const HUB_MAC_TAG: &str = "HUB_MAC";

/// Render one telemetry line.
///
/// The channel count written is `min(n, 32)` and exactly that many values
/// follow it.
pub fn touch_line(sender: &MacAddress, packet: &TouchPacket) -> Result<Line, fmt::Error> {
    let mut line = Line::new();
    let count = packet.values.len().min(MAX_CH);

    write!(
        line,
        "{},{},{},{},{},{}",
        TOUCH_TAG,
        sender.compact(),
        packet.id,
        packet.seq,
        packet.ms,
        count
    )?;
    for value in &packet.values[..count] {
        write!(line, ",{}", value)?;
    }
    line.push('\n').map_err(|_| fmt::Error)?;

    Ok(line)
}

/// Render the `HUB_MAC` boot line.
pub fn hub_mac_line(mac: &MacAddress) -> Result<Line, fmt::Error> {
    let mut line = Line::new();
    writeln!(line, "{} {}", HUB_MAC_TAG, mac)?;
    Ok(line)
}

/// Render and emit one telemetry line with a single write.
pub fn write_touch_line<W: Write + ?Sized>(
    out: &mut W,
    sender: &MacAddress,
    packet: &TouchPacket,
) -> fmt::Result {
    let line = touch_line(sender, packet)?;
    out.write_str(&line)
}

/// Emit the `HUB_MAC` boot line.
pub fn write_hub_mac_line<W: Write + ?Sized>(out: &mut W, mac: &MacAddress) -> fmt::Result {
    let line = hub_mac_line(mac)?;
    out.write_str(&line)
}
