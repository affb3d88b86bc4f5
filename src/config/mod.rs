//! Module: config
//!
//! Purpose: Compile-time configuration for both node roles.
//!
//! Architecture:
//! - Every tunable is a `const` here, there is no runtime or persisted config
//! - `SensorConfig::DEFAULT` / `HubConfig::DEFAULT` group the constants
//! - `validate()` is called once at bring-up; failure is init-fatal
//!
//! Safety: Safe. Plain data.

use crate::error::ConfigError;

/// Upper bound on channels per sensor and per datagram.
pub const MAX_CH: usize = 32;

/// Touch channels sampled by the sensor, in wire order.
///
/// ESP32-S3 touch pads are GPIO 1..=14. Trim to what is actually wired.
pub const TOUCH_PINS: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];

/// Low-pass coefficient (higher = snappier).
pub const LPF_ALPHA: f32 = 0.2;

/// Baseline drift compensation rate.
pub const BASELINE_ADAPT: f32 = 0.0015;

/// Datagram send rate in Hz. 0 sends on every loop iteration.
pub const TARGET_HZ: u32 = 250;

/// Raw samples averaged per channel when seeding filters at boot.
pub const SEED_SAMPLES: u32 = 32;

/// Spacing between seed samples.
pub const SEED_SPACING_MS: u32 = 3;

/// Hub data link baud rate.
///
/// A worst-case 32-channel line is 238 bytes
/// ([`MAX_TOUCH_LINE_LEN`](crate::serialiser::MAX_TOUCH_LINE_LEN)); at 250 Hz
/// that is ~60 kB/s per sensor against ~92 kB/s of line bandwidth.
pub const HUB_BAUD: u32 = 921_600;

/// Debug log baud rate (sensor UART0, hub UART1).
pub const SENSOR_DEBUG_BAUD: u32 = 115_200;

/// Pin the Wi-Fi channel at bring-up. `None` keeps the driver default.
///
/// Both ends must agree when set.
pub const RADIO_CHANNEL: Option<u8> = None;

/// Hub debug log TX pin (UART1). `None` disables hub debug output.
pub const HUB_DEBUG_TX_PIN: Option<u8> = Some(17);

const _: () = assert!(
    !TOUCH_PINS.is_empty() && TOUCH_PINS.len() <= MAX_CH,
    "TOUCH_PINS must list 1..=MAX_CH channels"
);

/// Sensor node configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorConfig {
    pub pins: &'static [u8],
    pub lpf_alpha: f32,
    pub baseline_adapt: f32,
    pub target_hz: u32,
    pub seed_samples: u32,
    pub seed_spacing_ms: u32,
    pub debug_baud: u32,
    pub radio_channel: Option<u8>,
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        pins: TOUCH_PINS,
        lpf_alpha: LPF_ALPHA,
        baseline_adapt: BASELINE_ADAPT,
        target_hz: TARGET_HZ,
        seed_samples: SEED_SAMPLES,
        seed_spacing_ms: SEED_SPACING_MS,
        debug_baud: SENSOR_DEBUG_BAUD,
        radio_channel: RADIO_CHANNEL,
    };

    /// Number of sampled channels (`NUM_CH`).
    pub const fn num_channels(&self) -> usize {
        self.pins.len()
    }

    /// Nominal send period, `⌊1000 / target_hz⌋`. 0 means uncapped.
    pub const fn period_ms(&self) -> u32 {
        if self.target_hz == 0 {
            0
        } else {
            1000 / self.target_hz
        }
    }

    /// Check every range constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pins.is_empty() || self.pins.len() > MAX_CH {
            return Err(ConfigError::ChannelCount(self.pins.len()));
        }
        if !(self.lpf_alpha > 0.0 && self.lpf_alpha <= 1.0) {
            return Err(ConfigError::FilterAlpha);
        }
        if !(self.baseline_adapt > 0.0 && self.baseline_adapt <= 1.0) {
            return Err(ConfigError::BaselineAdapt);
        }
        if self.seed_samples == 0 {
            return Err(ConfigError::SeedSamples);
        }
        validate_radio_channel(self.radio_channel)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Hub node configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HubConfig {
    pub baud: u32,
    pub debug_baud: u32,
    pub debug_tx_pin: Option<u8>,
    pub radio_channel: Option<u8>,
}

impl HubConfig {
    pub const DEFAULT: Self = Self {
        baud: HUB_BAUD,
        debug_baud: SENSOR_DEBUG_BAUD,
        debug_tx_pin: HUB_DEBUG_TX_PIN,
        radio_channel: RADIO_CHANNEL,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_radio_channel(self.radio_channel)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// 2.4 GHz channels 1..=14
fn validate_radio_channel(channel: Option<u8>) -> Result<(), ConfigError> {
    match channel {
        Some(ch) if !(1..=14).contains(&ch) => Err(ConfigError::RadioChannel(ch)),
        _ => Ok(()),
    }
}
