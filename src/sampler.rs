//! Sampler: reads every configured touch channel once per tick and feeds
//! the per-channel filters.

use heapless::Vec;

use crate::config::MAX_CH;
use crate::error::{InitError, TouchError};
use crate::filter::{ChannelState, FilterParams};

/// Raw capacitance source, one read per channel per call.
///
/// Lower readings mean a stronger touch. Implemented over the ESP32 touch
/// peripheral in `hal::touch`, and by scripted fakes in tests.
pub trait TouchSource {
    fn read(&mut self, channel: u8) -> Result<u32, TouchError>;
}

impl<T: TouchSource + ?Sized> TouchSource for &mut T {
    fn read(&mut self, channel: u8) -> Result<u32, TouchError> {
        (**self).read(channel)
    }
}

/// Owns the touch source and the filter state of every channel.
///
/// Channel arrays are owned by the sensor loop and never shared.
pub struct Sampler<S> {
    source: S,
    pins: Vec<u8, MAX_CH>,
    channels: Vec<ChannelState, MAX_CH>,
    params: FilterParams,
    read_errors: u32,
    last_error: Option<TouchError>,
}

impl<S: TouchSource> Sampler<S> {
    /// Seed every channel from an average of `samples` raw reads.
    ///
    /// Channels are seeded in order, `delay_ms(spacing_ms)` after each read.
    /// Failed reads are left out of the average; a channel with no good read
    /// at all is fatal.
    pub fn seed(
        mut source: S,
        pins: &[u8],
        params: FilterParams,
        samples: u32,
        spacing_ms: u32,
        mut delay_ms: impl FnMut(u32),
    ) -> Result<Self, InitError> {
        if pins.is_empty() || pins.len() > MAX_CH {
            return Err(crate::error::ConfigError::ChannelCount(pins.len()).into());
        }

        let mut channels = Vec::new();
        let mut read_errors = 0u32;
        let mut last_error = None;

        for &pin in pins {
            let mut sum = 0u64;
            let mut good = 0u32;
            for _ in 0..samples {
                match source.read(pin) {
                    Ok(raw) => {
                        sum += raw as u64;
                        good += 1;
                    }
                    Err(e) => {
                        read_errors += 1;
                        last_error = Some(e);
                    }
                }
                delay_ms(spacing_ms);
            }
            if good == 0 {
                return Err(InitError::SeedFailed { channel: pin });
            }
            let average = sum as f32 / good as f32;
            // Bounded by the pins.len() check above
            let _ = channels.push(ChannelState::seeded(average));
        }

        let mut owned_pins = Vec::new();
        let _ = owned_pins.extend_from_slice(pins);

        Ok(Self {
            source,
            pins: owned_pins,
            channels,
            params,
            read_errors,
            last_error,
        })
    }

    /// Read and filter every channel once.
    ///
    /// A channel whose read fails keeps its previous state for this tick.
    pub fn tick(&mut self) {
        for (pin, state) in self.pins.iter().zip(self.channels.iter_mut()) {
            match self.source.read(*pin) {
                Ok(raw) => state.update(raw, &self.params),
                Err(e) => {
                    self.read_errors = self.read_errors.wrapping_add(1);
                    self.last_error = Some(e);
                }
            }
        }
    }

    /// Quantised filter outputs, in channel order.
    pub fn outputs(&self) -> Vec<u16, MAX_CH> {
        self.channels.iter().map(ChannelState::output).collect()
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    /// `NUM_CH`.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Failed raw reads since boot, seeding included.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    pub fn last_error(&self) -> Option<TouchError> {
        self.last_error
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
