//! Error types for both node roles.
//!
//! Only [`InitError`] is ever fatal. Everything else is counted and dropped.

use core::fmt;

/// Bring-up failure. The node logs it once and halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// E01: Configuration constants out of range
    Config(ConfigError),
    /// E02: Wi-Fi / ESP-NOW stack init failed (raw `esp_err_t`)
    RadioInit(i32),
    /// E03: Broadcast peer registration failed (raw `esp_err_t`)
    PeerRegistration(i32),
    /// E04: UART driver init failed (raw `esp_err_t`)
    SerialInit(i32),
    /// E05: Touch peripheral init failed (raw `esp_err_t`)
    TouchInit(i32),
    /// E06: No successful raw read while seeding a channel
    SeedFailed { channel: u8 },
}

impl InitError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E01",
            Self::RadioInit(_) => "E02",
            Self::PeerRegistration(_) => "E03",
            Self::SerialInit(_) => "E04",
            Self::TouchInit(_) => "E05",
            Self::SeedFailed { .. } => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Config(_) => "invalid configuration",
            Self::RadioInit(_) => "ESP-NOW init failed",
            Self::PeerRegistration(_) => "peer add failed",
            Self::SerialInit(_) => "serial init failed",
            Self::TouchInit(_) => "touch init failed",
            Self::SeedFailed { .. } => "baseline seeding failed",
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())?;
        match self {
            Self::Config(e) => write!(f, " ({})", e),
            Self::RadioInit(code)
            | Self::PeerRegistration(code)
            | Self::SerialInit(code)
            | Self::TouchInit(code) => write!(f, " (esp_err {})", code),
            Self::SeedFailed { channel } => write!(f, " (channel {})", channel),
        }
    }
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

/// Configuration range violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Channel list length outside 1..=MAX_CH
    ChannelCount(usize),
    /// LPF_ALPHA outside (0, 1]
    FilterAlpha,
    /// BASELINE_ADAPT outside (0, 1]
    BaselineAdapt,
    /// SEED_SAMPLES is zero
    SeedSamples,
    /// Pinned radio channel outside 1..=14
    RadioChannel(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelCount(n) => write!(f, "channel count {} not in 1..=32", n),
            Self::FilterAlpha => f.write_str("LPF_ALPHA not in (0, 1]"),
            Self::BaselineAdapt => f.write_str("BASELINE_ADAPT not in (0, 1]"),
            Self::SeedSamples => f.write_str("SEED_SAMPLES is zero"),
            Self::RadioChannel(ch) => write!(f, "radio channel {} not in 1..=14", ch),
        }
    }
}

/// Datagram decode/encode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    /// Shorter than the 11-byte header
    TooShort { len: usize },
    /// `ver` is not a version this build understands
    UnsupportedVersion(u8),
    /// Declared `n` is zero
    NoChannels,
    /// Frame ends before `min(n, 32)` values
    Truncated { declared: u8, len: usize },
    /// Output buffer cannot hold the encoded datagram
    BufferTooSmall { needed: usize },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "datagram of {} bytes is shorter than header", len),
            Self::UnsupportedVersion(v) => write!(f, "unsupported protocol version {}", v),
            Self::NoChannels => f.write_str("datagram declares zero channels"),
            Self::Truncated { declared, len } => {
                write!(f, "datagram of {} bytes cannot hold {} channels", len, declared)
            }
            Self::BufferTooSmall { needed } => write!(f, "encode needs {} bytes", needed),
        }
    }
}

/// Radio transmit failure. Never surfaced past the broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Driver rejected the send (raw `esp_err_t` on target)
    Send(i32),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(code) => write!(f, "send failed (esp_err {})", code),
        }
    }
}

/// Raw touch read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchError {
    /// Driver returned an error for this channel (raw `esp_err_t` on target)
    Read { channel: u8, code: i32 },
}

impl fmt::Display for TouchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { channel, code } => {
                write!(f, "touch read on channel {} failed (esp_err {})", channel, code)
            }
        }
    }
}
