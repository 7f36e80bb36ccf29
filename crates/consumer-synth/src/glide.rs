//! Portamento (glide) pitch ramp.
//!
//! A one-pole approach toward the target frequency. Larger glide amounts
//! give a longer time constant; an amount of zero jumps straight to the
//! target.
//!
//! ```rust
//! use consumer_synth::GlideRamp;
//!
//! let mut glide = GlideRamp::new(48000.0);
//! glide.snap(220.0);
//!
//! // Ramp up an octave with a 50 ms time constant
//! let first = glide.advance(440.0, 0.1);
//! assert!(first > 220.0 && first < 440.0);
//! ```

use libm::expf;

/// Time constant in seconds at glide amount 1.0.
pub const GLIDE_MAX_SECONDS: f32 = 0.5;

/// Distance in Hz at which the ramp snaps onto its target.
pub const GLIDE_SNAP_HZ: f32 = 0.01;

/// One-pole frequency ramp.
#[derive(Debug, Clone)]
pub struct GlideRamp {
    current: f32,
    sample_rate: f32,
    /// Glide amount the cached coefficient was computed for
    cached_amount: f32,
    coeff: f32,
}

impl Default for GlideRamp {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl GlideRamp {
    /// Create a ramp at 0 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            current: 0.0,
            sample_rate,
            cached_amount: 0.0,
            coeff: 1.0,
        }
    }

    /// Move one sample toward `target_hz` and return the current frequency.
    ///
    /// `glide_amount` is in [0.0, 1.0]; 0.0 (or less) jumps immediately.
    #[inline]
    pub fn advance(&mut self, target_hz: f32, glide_amount: f32) -> f32 {
        if glide_amount <= 0.0 || !self.current.is_finite() {
            self.current = target_hz;
            return self.current;
        }

        if glide_amount != self.cached_amount {
            self.recalculate_coeff(glide_amount);
        }

        let delta = target_hz - self.current;
        let next = self.current + delta * self.coeff;
        // A step below f32 resolution would stall short of the target, and
        // rounding at coeff ≈ 1 can land past it.
        let crossed = (target_hz - next) * delta <= 0.0;
        self.current = if delta.abs() <= GLIDE_SNAP_HZ || next == self.current || crossed {
            target_hz
        } else {
            next
        };
        self.current
    }

    /// Jump to `hz` immediately.
    pub fn snap(&mut self, hz: f32) {
        self.current = hz;
    }

    /// Current frequency in Hz.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// `coeff = 1 − exp(−1 / (τ × sr))` with `τ = glide × GLIDE_MAX_SECONDS`.
    fn recalculate_coeff(&mut self, glide_amount: f32) {
        self.cached_amount = glide_amount;
        let tau = glide_amount * GLIDE_MAX_SECONDS;
        self.coeff = (1.0 - expf(-1.0 / (tau * self.sample_rate))).clamp(0.0, 1.0);
    }
}
