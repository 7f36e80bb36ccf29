//! Resonant low-pass filter for the synth voice.
//!
//! # Topology
//!
//! A 2-pole (12 dB/oct) Topology-Preserving Transform state-variable filter
//! after Zavalishin, "The Art of VA Filter Design" (2012), low-pass output
//! only. The trapezoidal integrators keep the response stable while the
//! cutoff is swept every sample by the filter envelope and the LFO.
//!
//! # Parameter Mapping
//!
//! - Cutoff: normalized [0, 1] → `20 Hz × 1000^c` (20 Hz to 20 kHz), then
//!   limited to `0.45 × sample_rate`.
//! - Resonance: [-0.5, 1] → `Q = 0.707 × 2^(4r)` (about 0.18 to 11.3).
//! - Peak: [0, 1] → a Q ceiling `1 + peak × (Q_CEILING − 1)`. Q is soft-limited
//!   against it with `ceiling × tanh(Q / ceiling)`.
//!
//! # Stability
//!
//! The band-pass integrator state is saturated with `tanh`. The output is
//! linear up to [`OUTPUT_KNEE`] and soft-limited above it, so resonant peaks
//! and full-scale input round off inside (-1, 1) instead of flattening. A
//! non-finite output or a state beyond [`STATE_LIMIT`] resets the filter to
//! silence for that sample.

use core::f32::consts::PI;
use libm::{exp2f, powf, tanf, tanhf};

use consumer_core::{flush_denormal, soft_limit};

/// Lowest mapped cutoff in Hz (normalized cutoff 0.0).
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Ratio between highest and lowest mapped cutoff (20 Hz → 20 kHz).
pub const CUTOFF_RANGE: f32 = 1000.0;

/// Highest cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.45;

/// Q at resonance 0.0 (Butterworth).
pub const BASE_Q: f32 = 0.707;

/// Octaves of Q per unit of resonance.
pub const RESONANCE_OCTAVES: f32 = 4.0;

/// Q ceiling at peak 1.0.
pub const Q_CEILING: f32 = 12.0;

/// Output magnitude above which the soft limiter bends the signal.
pub const OUTPUT_KNEE: f32 = 0.5;

/// Integrator magnitude treated as divergence.
pub const STATE_LIMIT: f32 = 1.0e4;

/// Resonant low-pass filter with per-sample cutoff modulation.
///
/// # Example
///
/// ```rust
/// use consumer_synth::Filter;
///
/// let mut filter = Filter::new(48000.0);
///
/// // Half-open cutoff, mild resonance, filter envelope fully open
/// let out = filter.process(0.5, 0.5, 0.2, 0.5, 0.3, 1.0, 0.0);
/// assert!((-1.0..=1.0).contains(&out));
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    // TPT state
    ic1eq: f32,
    ic2eq: f32,

    // Cached coefficients
    g: f32,
    k: f32,
    cutoff_hz: f32,
    q: f32,

    sample_rate: f32,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Filter {
    /// Create a filter at the given sample rate with silent state.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            cutoff_hz: -1.0,
            q: -1.0,
            sample_rate,
        };
        filter.update_coefficients(1.0, BASE_Q);
        filter
    }

    /// Map a normalized cutoff to Hz at this filter's sample rate.
    pub fn cutoff_hz(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (MIN_CUTOFF_HZ * powf(CUTOFF_RANGE, normalized))
            .min(self.sample_rate * MAX_CUTOFF_RATIO)
    }

    /// Effective Q for a resonance and peak setting.
    pub fn effective_q(resonance: f32, peak: f32) -> f32 {
        let q = BASE_Q * exp2f(RESONANCE_OCTAVES * resonance);
        let ceiling = 1.0 + peak.clamp(0.0, 1.0) * (Q_CEILING - 1.0);
        ceiling * tanhf(q / ceiling)
    }

    /// Filter one sample.
    ///
    /// # Arguments
    /// * `input` - Signal sample
    /// * `base_cutoff` - Normalized cutoff [0, 1]
    /// * `resonance` - [-0.5, 1]
    /// * `peak` - Resonance ceiling [0, 1]
    /// * `env_amount` - Filter envelope depth [-1, 1]
    /// * `env_level` - Current filter envelope level [0, 1]
    /// * `lfo_offset` - Normalized cutoff offset from the LFO
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn process(
        &mut self,
        input: f32,
        base_cutoff: f32,
        resonance: f32,
        peak: f32,
        env_amount: f32,
        env_level: f32,
        lfo_offset: f32,
    ) -> f32 {
        let cutoff = (base_cutoff + env_amount * env_level + lfo_offset).clamp(0.0, 1.0);
        let cutoff_hz = self.cutoff_hz(cutoff);
        let q = Self::effective_q(resonance, peak);
        if cutoff_hz != self.cutoff_hz || q != self.q {
            self.update_coefficients(cutoff_hz, q);
        }

        let output = self.tick(input);
        if !output.is_finite()
            || self.ic1eq.abs() > STATE_LIMIT
            || self.ic2eq.abs() > STATE_LIMIT
        {
            self.reset();
            return 0.0;
        }
        soft_limit(output, OUTPUT_KNEE)
    }

    /// Clear the integrator state.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn update_coefficients(&mut self, cutoff_hz: f32, q: f32) {
        self.cutoff_hz = cutoff_hz;
        self.q = q;
        self.g = tanf(PI * cutoff_hz / self.sample_rate);
        self.k = 1.0 / q.max(f32::EPSILON);
    }

    #[inline]
    fn tick(&mut self, input: f32) -> f32 {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        // Saturate the band-pass state to bound resonant energy.
        let v1_sat = tanhf(v1);

        self.ic1eq = flush_denormal(2.0 * v1_sat - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        v2
    }
}
