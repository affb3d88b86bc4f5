//! # touch-link
//!
//! Capacitive-touch telemetry over ESP-NOW.
//!
//! ## Architecture
//!
//! ```text
//! touch pads ─▶ Sampler ─▶ Broadcaster ─▶ ESP-NOW ─▶ Mailbox ─▶ Hub ─▶ serial CSV
//! └──────────── sensor node ───────────┘  broadcast  └──────── hub node ───────┘
//! ```
//!
//! - Sensors filter every loop iteration and send the freshest value at the
//!   target rate. Fire-and-forget.
//! - The hub's radio callback only copies into a single-slot mailbox; the main
//!   loop drains it and writes one line per datagram.
//! - Everything outside [`hal`] is platform-independent and tested on the host.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod identity;
pub mod packet;
pub mod filter;
pub mod sampler;
pub mod broadcaster;
pub mod sensor;
pub mod mailbox;
pub mod serialiser;
pub mod hub;
pub mod logging;
pub mod debug_log;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use config::{HubConfig, SensorConfig, MAX_CH};
pub use error::{ConfigError, InitError, LinkError, PacketError, TouchError};
pub use identity::{MacAddress, ShortId};
pub use packet::{TouchPacket, HEADER_LEN, MAX_PACKET_LEN, PROTOCOL_VERSION};
pub use filter::{ChannelState, FilterParams};
pub use sampler::{Sampler, TouchSource};
pub use broadcaster::{Broadcaster, Pacer, RadioLink};
pub use sensor::SensorNode;
pub use mailbox::{Inbound, Mailbox};
pub use hub::{Hub, PollOutcome};
pub use logging::{LogLevel, LogStream, LOG_STREAM};

/// Firmware version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");
