//! CSV line format tests

use touch_link::identity::MacAddress;
use touch_link::packet::TouchPacket;
use touch_link::serialiser::{self, hub_mac_line, touch_line, LINE_CAPACITY, MAX_TOUCH_LINE_LEN};

const SENDER: MacAddress = MacAddress::new([0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]);

/// `touch,<12 hex>,<6 hex>,<dec>,<dec>,<dec>(,<dec>)*\n` with no leading zeros.
fn is_touch_line(line: &str) -> bool {
    let Some(body) = line.strip_suffix('\n') else {
        return false;
    };
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() < 6 || fields[0] != "touch" {
        return false;
    }

    let upper_hex = |s: &str, len: usize| {
        s.len() == len && s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    };
    let decimal = |s: &str| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
    };

    let Ok(n) = fields[5].parse::<usize>() else {
        return false;
    };
    upper_hex(fields[1], 12)
        && upper_hex(fields[2], 6)
        && fields[3..].iter().all(|f| decimal(f))
        && fields.len() == 6 + n
}

#[test]
fn test_touch_line_exact() {
    let packet = TouchPacket::new(SENDER.short_id(), 42, 123_456, &[5000, 5000, 5000, 5000]);
    let line = touch_line(&SENDER, &packet).unwrap();
    assert_eq!(line.as_str(), "touch,A1B2C3D4E5F6,D4E5F6,42,123456,4,5000,5000,5000,5000\n");
}

#[test]
fn test_touch_line_mixed_values() {
    let sender = MacAddress::new([0x10, 0x20, 0x30, 0xAA, 0x00, 0xBB]);
    let packet = TouchPacket::new(sender.short_id(), 0, 0, &[0, 1, 65535]);
    let line = touch_line(&sender, &packet).unwrap();

    assert_eq!(line.as_str(), "touch,102030AA00BB,AA00BB,0,0,3,0,1,65535\n");
    assert!(is_touch_line(&line));
}

#[test]
fn test_touch_line_id_is_taken_from_datagram() {
    // Sender MAC and datagram ID disagree: both are printed as-is
    let packet = TouchPacket::new(touch_link::ShortId::new([0x01, 0x02, 0x03]), 7, 8, &[9]);
    let line = touch_line(&SENDER, &packet).unwrap();
    assert_eq!(line.as_str(), "touch,A1B2C3D4E5F6,010203,7,8,1,9\n");
}

#[test]
fn test_full_width_line_fits() {
    let values = [65535u16; 32];
    let packet = TouchPacket::new(SENDER.short_id(), u16::MAX, u32::MAX, &values);
    let line = touch_line(&SENDER, &packet).unwrap();

    assert!(is_touch_line(&line));
    assert_eq!(line.len(), MAX_TOUCH_LINE_LEN);
    assert_eq!(MAX_TOUCH_LINE_LEN, 238);
    assert!(line.len() <= LINE_CAPACITY);
    assert!(line.starts_with("touch,A1B2C3D4E5F6,D4E5F6,65535,4294967295,32,65535,"));
    assert_eq!(line.matches(',').count(), 5 + 32);
}

#[test]
fn test_hub_mac_line() {
    let line = hub_mac_line(&SENDER).unwrap();
    assert_eq!(line.as_str(), "HUB_MAC A1:B2:C3:D4:E5:F6\n");
}

#[test]
fn test_hub_mac_line_pads_octets() {
    let mac = MacAddress::new([0x00, 0x0A, 0x00, 0x01, 0xFF, 0x10]);
    let line = hub_mac_line(&mac).unwrap();
    assert_eq!(line.as_str(), "HUB_MAC 00:0A:00:01:FF:10\n");
}

#[test]
fn test_write_helpers_emit_one_line_each() {
    let mut out = String::new();
    serialiser::write_hub_mac_line(&mut out, &SENDER).unwrap();
    let packet = TouchPacket::new(SENDER.short_id(), 1, 2, &[3, 4]);
    serialiser::write_touch_line(&mut out, &SENDER, &packet).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["HUB_MAC A1:B2:C3:D4:E5:F6", "touch,A1B2C3D4E5F6,D4E5F6,1,2,2,3,4"]);
    assert!(out.ends_with('\n'));
}

#[test]
fn test_line_checker_rejects_malformed() {
    assert!(!is_touch_line("touch,A1B2C3D4E5F6,D4E5F6,1,2,2,3\n"));
    assert!(!is_touch_line("touch,a1b2c3d4e5f6,D4E5F6,1,2,1,3\n"));
    assert!(!is_touch_line("touch,A1B2C3D4E5F6,D4E5F6,01,2,1,3\n"));
    assert!(!is_touch_line("touch,A1B2C3D4E5F6,D4E5F6,1,2,1,3"));
}
