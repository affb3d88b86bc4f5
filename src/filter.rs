//! Per-channel touch filtering.
//!
//! Two first-order IIR stages per channel:
//!
//! ```text
//! filt     ← (1 − α)·filt     + α·raw
//! baseline ← (1 − β)·baseline + β·filt
//! ```
//!
//! α (~0.2) follows a touch within a handful of samples. β (~0.0015) is three
//! orders of magnitude slower and follows drift only. The baseline tracks the
//! filtered value, so a single noisy raw sample cannot move the reference.

/// Filter coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    /// Low-pass coefficient α, (0, 1].
    pub alpha: f32,
    /// Baseline adaptation rate β, (0, 1].
    pub beta: f32,
}

impl FilterParams {
    pub const fn new(alpha: f32, beta: f32) -> Self {
        Self { alpha, beta }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::new(crate::config::LPF_ALPHA, crate::config::BASELINE_ADAPT)
    }
}

/// Filter state of one channel. Created once at boot, never reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelState {
    filt: f32,
    baseline: f32,
}

impl ChannelState {
    /// Seed both stages from the same boot-time average, so there is no
    /// startup transient.
    pub const fn seeded(average: f32) -> Self {
        Self {
            filt: average,
            baseline: average,
        }
    }

    /// Fold one raw sample into both stages.
    #[inline]
    pub fn update(&mut self, raw: u32, params: &FilterParams) {
        self.filt = (1.0 - params.alpha) * self.filt + params.alpha * raw as f32;
        self.baseline = (1.0 - params.beta) * self.baseline + params.beta * self.filt;
    }

    /// Low-pass output (lower = stronger touch).
    #[inline]
    pub fn filtered(&self) -> f32 {
        self.filt
    }

    /// Slow no-touch reference.
    #[inline]
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Filtered value as it goes on the wire.
    #[inline]
    pub fn output(&self) -> u16 {
        quantize(self.filt)
    }
}

/// Round half away from zero, then clamp to `0..=65535`.
#[inline]
pub fn quantize(value: f32) -> u16 {
    let rounded = libm::roundf(value);
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else if rounded >= u16::MAX as f32 {
        u16::MAX
    } else {
        rounded as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_away() {
        assert_eq!(quantize(0.4), 0);
        assert_eq!(quantize(0.5), 1);
        assert_eq!(quantize(1234.49), 1234);
        assert_eq!(quantize(1234.5), 1235);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(-0.4), 0);
        assert_eq!(quantize(65535.4), 65535);
        assert_eq!(quantize(70000.0), 65535);
        assert_eq!(quantize(f32::INFINITY), 65535);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_seeded_steady_state_is_exact() {
        let params = FilterParams::default();
        let mut ch = ChannelState::seeded(5000.0);
        for _ in 0..1000 {
            ch.update(5000, &params);
        }
        assert_eq!(ch.output(), 5000);
        assert!((ch.baseline() - 5000.0).abs() < 0.01);
    }

    #[test]
    fn test_single_update_matches_recurrence() {
        let params = FilterParams::new(0.2, 0.0015);
        let mut ch = ChannelState::seeded(100.0);
        ch.update(200, &params);

        assert!((ch.filtered() - 120.0).abs() < 1e-4);
        let expected_baseline = 0.9985 * 100.0 + 0.0015 * 120.0;
        assert!((ch.baseline() - expected_baseline).abs() < 1e-4);
    }
}
