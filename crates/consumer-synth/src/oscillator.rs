//! Audio-rate oscillator.
//!
//! A phase accumulator driving four naive waveform shapes. Pitch is passed
//! per sample so glide, detune, octave, and LFO vibrato can change it
//! continuously without any per-oscillator state beyond the phase.

use core::f32::consts::PI;
use libm::{exp2f, sinf};

/// Detune range in semitones at `detune = ±1.0`.
pub const DETUNE_SEMITONES: f32 = 1.0;

/// Oscillator waveform types.
///
/// The discriminants are the stable parameter encoding (0..=3).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Sine waveform: pure fundamental tone.
    Sine = 0,
    /// Square waveform (50% duty cycle): odd harmonics, hollow timbre.
    Square = 1,
    /// Triangle waveform: odd harmonics, softer than square.
    Triangle = 2,
    /// Sawtooth waveform: all harmonics, bright timbre.
    #[default]
    Saw = 3,
}

impl Waveform {
    /// All waveforms in parameter order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
    ];

    /// Decode a parameter index. Out-of-range indices clamp to the nearest shape.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, 3) as usize]
    }

    /// Parameter index of this waveform.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Evaluate the waveform at `phase` in [0.0, 1.0).
    ///
    /// - Sine: `sin(2π·phase)`
    /// - Square: `+1` below half a cycle, `-1` above
    /// - Triangle: `|4·phase − 2| − 1`
    /// - Saw: `2·phase − 1`
    ///
    /// Output is always within [-1.0, 1.0].
    #[inline]
    pub fn sample_at(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => sinf(phase * 2.0 * PI),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => (4.0 * phase - 2.0).abs() - 1.0,
            Waveform::Saw => 2.0 * phase - 1.0,
        }
    }
}

/// Audio-rate oscillator.
///
/// The sample rate is fixed at construction. Frequency, waveform, detune,
/// and octave are arguments of [`advance`](Self::advance) so that the caller
/// owns all pitch modulation.
///
/// # Example
///
/// ```rust
/// use consumer_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
///
/// // A4 sawtooth, one octave down, slightly sharp
/// let sample = osc.advance(440.0, Waveform::Saw, 0.1, -1);
/// assert!((-1.0..=1.0).contains(&sample));
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Whether the last advance wrapped the phase
    wrapped: bool,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Oscillator {
    /// Create a new oscillator with the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
            wrapped: false,
        }
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Effective frequency after octave shift and detune.
    ///
    /// `frequency_hz × 2^octave × 2^(detune × DETUNE_SEMITONES / 12)`
    #[inline]
    pub fn effective_frequency(frequency_hz: f32, detune: f32, octave: i32) -> f32 {
        frequency_hz * exp2f(octave as f32 + detune * DETUNE_SEMITONES / 12.0)
    }

    /// Generate the sample at the current phase, then advance the phase.
    ///
    /// # Arguments
    /// * `frequency_hz` - Base frequency before detune/octave
    /// * `waveform` - Shape to synthesize
    /// * `detune` - Fine tune in [-1.0, 1.0] (full scale = one semitone)
    /// * `octave` - Octave shift
    #[inline]
    pub fn advance(
        &mut self,
        frequency_hz: f32,
        waveform: Waveform,
        detune: f32,
        octave: i32,
    ) -> f32 {
        let output = waveform.sample_at(self.phase);
        let increment =
            Self::effective_frequency(frequency_hz, detune, octave) / self.sample_rate;
        self.advance_phase(increment);
        output
    }

    #[inline]
    fn advance_phase(&mut self, increment: f32) {
        // Non-finite or negative increments freeze the phase instead of corrupting it.
        let increment = if increment.is_finite() { increment.max(0.0) } else { 0.0 };
        let next = self.phase + increment;
        self.wrapped = next >= 1.0;
        self.phase = if self.wrapped { next - libm::floorf(next) } else { next };
    }

    /// Whether the last [`advance`](Self::advance) wrapped past the end of a cycle.
    #[inline]
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    /// Hard sync: reset phase to 0.
    ///
    /// Call this when a master oscillator completes a cycle.
    #[inline]
    pub fn sync(&mut self) {
        self.phase = 0.0;
    }

    /// Reset phase and wrap state.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.wrapped = false;
    }

    /// Get current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}
