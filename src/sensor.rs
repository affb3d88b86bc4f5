//! Sensor node: sample, filter, and broadcast on every loop iteration.
//!
//! ```text
//! tick(now) ──▶ Sampler::tick ──▶ Pacer due? ──▶ Broadcaster::send
//!               every call         polled          freshest filt values
//! ```

use crate::broadcaster::{Broadcaster, Pacer, RadioLink, TxReport, TxStats};
use crate::config::SensorConfig;
use crate::error::InitError;
use crate::filter::FilterParams;
use crate::identity::{MacAddress, ShortId};
use crate::sampler::{Sampler, TouchSource};

pub struct SensorNode<S, R> {
    sampler: Sampler<S>,
    broadcaster: Broadcaster<R>,
    mac: MacAddress,
}

impl<S: TouchSource, R: RadioLink> SensorNode<S, R> {
    /// Validate config, seed baselines and derive the short ID.
    ///
    /// Seeding blocks for roughly `channels × seed_samples × seed_spacing_ms`.
    pub fn bring_up(
        source: S,
        radio: R,
        mac: MacAddress,
        config: &SensorConfig,
        delay_ms: impl FnMut(u32),
    ) -> Result<Self, InitError> {
        config.validate()?;

        let params = FilterParams::new(config.lpf_alpha, config.baseline_adapt);
        let sampler = Sampler::seed(
            source,
            config.pins,
            params,
            config.seed_samples,
            config.seed_spacing_ms,
            delay_ms,
        )?;
        let broadcaster = Broadcaster::new(radio, mac.short_id(), Pacer::from_hz(config.target_hz));

        Ok(Self {
            sampler,
            broadcaster,
            mac,
        })
    }

    /// One loop iteration: filter every channel, then send if due.
    pub fn tick(&mut self, now_ms: u32) -> Option<TxReport> {
        self.sampler.tick();
        let sampler = &self.sampler;
        self.broadcaster.poll(now_ms, || sampler.outputs())
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    pub fn short_id(&self) -> ShortId {
        self.broadcaster.short_id()
    }

    pub fn sampler(&self) -> &Sampler<S> {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut Sampler<S> {
        &mut self.sampler
    }

    pub fn broadcaster(&self) -> &Broadcaster<R> {
        &self.broadcaster
    }

    pub fn broadcaster_mut(&mut self) -> &mut Broadcaster<R> {
        &mut self.broadcaster
    }

    pub fn tx_stats(&self) -> TxStats {
        self.broadcaster.stats()
    }
}
