//! End-to-end tests: sensor node → broadcast → mailbox → hub → CSV

use std::collections::HashMap;

use touch_link::broadcaster::RadioLink;
use touch_link::config::SensorConfig;
use touch_link::error::{LinkError, PacketError, TouchError};
use touch_link::hub::{Hub, PollOutcome};
use touch_link::identity::MacAddress;
use touch_link::mailbox::Mailbox;
use touch_link::packet::{TouchPacket, MAX_PACKET_LEN, PROTOCOL_VERSION};
use touch_link::sampler::TouchSource;
use touch_link::sensor::SensorNode;
use touch_link::ShortId;

#[derive(Default)]
struct FakePads {
    levels: HashMap<u8, u32>,
}

impl FakePads {
    fn constant(pads: &[u8], raw: u32) -> Self {
        Self {
            levels: pads.iter().map(|&p| (p, raw)).collect(),
        }
    }
}

impl TouchSource for FakePads {
    fn read(&mut self, channel: u8) -> Result<u32, TouchError> {
        self.levels
            .get(&channel)
            .copied()
            .ok_or(TouchError::Read { channel, code: -1 })
    }
}

/// Stands in for the air: every broadcast frame lands here.
#[derive(Default)]
struct Air {
    frames: Vec<Vec<u8>>,
}

impl RadioLink for Air {
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

const PADS: &[u8] = &[1, 2, 3, 4];

const SENSOR_MAC: MacAddress = MacAddress::new([0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]);

fn config(pins: &'static [u8]) -> SensorConfig {
    SensorConfig {
        pins,
        ..SensorConfig::DEFAULT
    }
}

fn sensor(mac: MacAddress, raw: u32) -> SensorNode<FakePads, Air> {
    SensorNode::bring_up(FakePads::constant(PADS, raw), Air::default(), mac, &config(PADS), |_| {})
        .unwrap()
}

/// Move every frame the sensor has sent into the mailbox.
fn relay(node: &mut SensorNode<FakePads, Air>, mailbox: &Mailbox) -> usize {
    let sender = node.mac().octets();
    let frames: Vec<Vec<u8>> = node.broadcaster_mut().radio_mut().frames.drain(..).collect();
    for frame in &frames {
        mailbox.deliver(&sender, frame);
    }
    frames.len()
}

#[test]
fn test_steady_sensor_line() {
    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut node = sensor(SENSOR_MAC, 5000);
    let mut out = String::new();

    // 200 loop iterations at 1 ms each, then the send at 123456
    for now in 123_256..123_456 {
        node.tick(now);
    }
    node.broadcaster_mut().radio_mut().frames.clear();
    node.broadcaster_mut().set_next_seq(42);

    let report = node.tick(123_456).unwrap();
    assert_eq!((report.seq, report.len), (42, 19));
    assert_eq!(relay(&mut node, &mailbox), 1);

    assert_eq!(
        hub.poll(&mut out),
        PollOutcome::Emitted {
            sender: SENSOR_MAC,
            seq: 42
        }
    );
    assert_eq!(out, "touch,A1B2C3D4E5F6,D4E5F6,42,123456,4,5000,5000,5000,5000\n");
    assert_eq!(hub.poll(&mut out), PollOutcome::Idle);
}

#[test]
fn test_touch_transient_on_the_wire() {
    let mut node = sensor(SENSOR_MAC, 5000);
    for now in 0..1000 {
        node.tick(now);
    }
    node.broadcaster_mut().radio_mut().frames.clear();

    // Touch channel 0 and keep running the 1 ms loop at 250 Hz
    node.sampler_mut().source_mut().levels.insert(1, 1000);
    for now in 1000..1100 {
        node.tick(now);
    }

    // 100 samples in: β·(baseline − filt) per sample adds up to ~537
    let drift = 5000.0 - node.sampler().channels()[0].baseline();
    assert!((400.0..=600.0).contains(&drift), "baseline drift after 100 samples = {}", drift);

    for now in 1100..1200 {
        node.tick(now);
    }

    let v0: Vec<u16> = node
        .broadcaster()
        .radio()
        .frames
        .iter()
        .map(|f| TouchPacket::decode(f).unwrap().values[0])
        .collect();
    assert_eq!(v0.len(), 50);
    assert!(v0[4] <= 1800, "5th datagram after touch carries {}", v0[4]);
    assert!(v0[39] <= 1010, "40th datagram after touch carries {}", v0[39]);

    // The other channels never moved
    let last = TouchPacket::decode(node.broadcaster().radio().frames.last().unwrap()).unwrap();
    assert_eq!(&last.values[1..], &[5000, 5000, 5000]);

    // ~1019 after 200 samples, bounded by β·4000·200
    let drift = 5000.0 - node.sampler().channels()[0].baseline();
    assert!((900.0..=1200.0).contains(&drift), "baseline drift after 200 samples = {}", drift);
    assert_eq!(node.sampler().channels()[1].baseline(), 5000.0);
}

#[test]
fn test_undersize_datagram_emits_nothing() {
    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut out = String::new();

    mailbox.deliver(&SENSOR_MAC.octets(), &[PROTOCOL_VERSION; 10]);
    assert_eq!(hub.poll(&mut out), PollOutcome::Idle);
    assert!(out.is_empty());
    assert_eq!(mailbox.stats().rejected, 1);
}

#[test]
fn test_invalid_datagrams_are_dropped_by_hub() {
    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut out = String::new();

    let mut frame = [0u8; 13];
    frame[0] = 9;
    frame[1] = 1;
    mailbox.deliver(&SENSOR_MAC.octets(), &frame);
    assert_eq!(hub.poll(&mut out), PollOutcome::Dropped(PacketError::UnsupportedVersion(9)));

    frame[0] = PROTOCOL_VERSION;
    frame[1] = 0;
    mailbox.deliver(&SENSOR_MAC.octets(), &frame);
    assert_eq!(hub.poll(&mut out), PollOutcome::Dropped(PacketError::NoChannels));

    assert!(out.is_empty());
    assert_eq!(hub.stats().dropped, 2);
    assert_eq!(hub.last_drop(), Some(PacketError::NoChannels));
}

#[test]
fn test_only_latest_of_two_arrivals_is_emitted() {
    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut out = String::new();
    let mut node = sensor(SENSOR_MAC, 5000);

    node.tick(4);
    node.tick(8);
    assert_eq!(relay(&mut node, &mailbox), 2);

    assert!(matches!(hub.poll(&mut out), PollOutcome::Emitted { seq: 1, .. }));
    assert_eq!(hub.poll(&mut out), PollOutcome::Idle);
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with("touch,A1B2C3D4E5F6,D4E5F6,1,8,4,"));
    assert!(out.ends_with('\n'));
}

#[test]
fn test_two_sensors_interleave() {
    let mac_a = MacAddress::new([0x24, 0x6F, 0x28, 0xAA, 0x00, 0xBB]);
    let mac_b = MacAddress::new([0x24, 0x6F, 0x28, 0xCC, 0x11, 0xDD]);
    assert_eq!(mac_a.short_id(), ShortId::new([0xAA, 0x00, 0xBB]));

    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut out = String::new();
    let mut a = sensor(mac_a, 4000);
    let mut b = sensor(mac_b, 6000);

    // Hub drains after each arrival
    for now in 0..400u32 {
        a.tick(now);
        if relay(&mut a, &mailbox) > 0 {
            hub.poll(&mut out);
        }
        b.tick(now);
        if relay(&mut b, &mailbox) > 0 {
            hub.poll(&mut out);
        }
    }

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2 * 99);

    let mut last_seq: HashMap<&str, u16> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 10, "{}", line);
        let (mac, id, value) = if i % 2 == 0 {
            ("246F28AA00BB", "AA00BB", "4000")
        } else {
            ("246F28CC11DD", "CC11DD", "6000")
        };
        assert_eq!(fields[1], mac);
        assert_eq!(fields[2], id);
        assert!(fields[6..].iter().all(|v| *v == value));

        let seq: u16 = fields[3].parse().unwrap();
        if let Some(prev) = last_seq.insert(fields[2], seq) {
            assert_eq!(seq, prev.wrapping_add(1));
        }
    }
    assert_eq!(hub.stats().emitted, 198);
}

#[test]
fn test_oversize_inbound_is_clamped() {
    let mailbox = Mailbox::new();
    let mut hub = Hub::new(&mailbox);
    let mut out = String::new();

    let mut frame = vec![0u8; 100];
    frame[0] = PROTOCOL_VERSION;
    frame[1] = 40;
    frame[2..5].copy_from_slice(&[0xAA, 0x00, 0xBB]);
    for i in 0..44 {
        frame[11 + 2 * i..13 + 2 * i].copy_from_slice(&(i as u16 + 100).to_le_bytes());
    }

    mailbox.deliver(&SENSOR_MAC.octets(), &frame);
    assert_eq!(mailbox.take().map(|m| m.frame().len()), Some(MAX_PACKET_LEN));

    mailbox.deliver(&SENSOR_MAC.octets(), &frame);
    assert!(matches!(hub.poll(&mut out), PollOutcome::Emitted { .. }));

    let fields: Vec<&str> = out.trim_end().split(',').collect();
    assert_eq!(fields[5], "32");
    assert_eq!(fields.len(), 6 + 32);
    assert_eq!(fields[6], "100");
    assert_eq!(fields[37], "131");
}

#[test]
fn test_hub_announces_own_mac_first() {
    let mailbox = Mailbox::new();
    let hub = Hub::new(&mailbox);
    let mut out = String::new();

    hub.announce(&mut out, &MacAddress::new([0x24, 0x6F, 0x28, 0x01, 0x02, 0x03])).unwrap();
    assert_eq!(out, "HUB_MAC 24:6F:28:01:02:03\n");
}
