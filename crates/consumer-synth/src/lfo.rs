//! Low frequency oscillator for pitch and filter modulation.
//!
//! The LFO reuses [`Oscillator`] for phase accumulation, restricted to the
//! sine and triangle shapes and scaled by depth. It is free-running: note
//! events never reset its phase.

use crate::oscillator::{Oscillator, Waveform};

/// Semitones of pitch offset at full LFO output.
pub const LFO_PITCH_SEMITONES: f32 = 2.0;

/// Highest LFO rate in Hz.
pub const LFO_MAX_RATE_HZ: f32 = 20.0;

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoShape {
    /// Smooth, natural modulation.
    #[default]
    Sine = 0,
    /// Linear ramps, harder corners than sine.
    Triangle = 1,
}

impl LfoShape {
    /// Decode a parameter index. Anything but 1 is sine.
    pub fn from_index(index: i32) -> Self {
        if index == 1 { Self::Triangle } else { Self::Sine }
    }

    /// Parameter index of this shape.
    pub fn index(self) -> i32 {
        self as i32
    }

    fn waveform(self) -> Waveform {
        match self {
            Self::Sine => Waveform::Sine,
            Self::Triangle => Waveform::Triangle,
        }
    }
}

/// What the LFO modulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoDestination {
    /// Offset the normalized filter cutoff.
    #[default]
    Filter = 0,
    /// Offset both oscillators' pitch by up to [`LFO_PITCH_SEMITONES`].
    Pitch = 1,
    /// Filter and pitch together.
    Both = 2,
}

impl LfoDestination {
    /// Decode a parameter index, clamping out-of-range values.
    pub fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => Self::Filter,
            1 => Self::Pitch,
            _ => Self::Both,
        }
    }

    /// Parameter index of this destination.
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Whether the filter cutoff is modulated.
    pub fn targets_filter(self) -> bool {
        matches!(self, Self::Filter | Self::Both)
    }

    /// Whether oscillator pitch is modulated.
    pub fn targets_pitch(self) -> bool {
        matches!(self, Self::Pitch | Self::Both)
    }
}

/// Low frequency oscillator.
///
/// # Example
///
/// ```rust
/// use consumer_synth::{Lfo, LfoShape};
///
/// let mut lfo = Lfo::new(48000.0);
/// let value = lfo.advance(5.0, 0.5, LfoShape::Triangle);
/// assert!((-0.5..=0.5).contains(&value));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    osc: Oscillator,
}

impl Lfo {
    /// Create an LFO at phase 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            osc: Oscillator::new(sample_rate),
        }
    }

    /// Advance one sample and return a value in `[-depth, depth]`.
    #[inline]
    pub fn advance(&mut self, rate_hz: f32, depth: f32, shape: LfoShape) -> f32 {
        let rate = rate_hz.clamp(0.0, LFO_MAX_RATE_HZ);
        self.osc.advance(rate, shape.waveform(), 0.0, 0) * depth.clamp(0.0, 1.0)
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.osc.phase()
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    #[test]
    fn test_lfo_output_scaled_by_depth() {
        for shape in [LfoShape::Sine, LfoShape::Triangle] {
            let mut lfo = Lfo::new(SR);
            let mut max: f32 = 0.0;
            for _ in 0..48000 {
                let value = lfo.advance(3.0, 0.25, shape);
                assert!((-0.25..=0.25).contains(&value), "{:?} {}", shape, value);
                max = max.max(value.abs());
            }
            assert!(max > 0.24, "{:?} should reach depth, got {}", shape, max);
        }
    }

    #[test]
    fn test_zero_depth_is_silent_but_phase_runs() {
        let mut lfo = Lfo::new(SR);
        for _ in 0..1000 {
            assert_eq!(lfo.advance(5.0, 0.0, LfoShape::Sine), 0.0);
        }
        assert!(lfo.phase() > 0.0);
    }

    #[test]
    fn test_lfo_phase_accumulation() {
        let mut lfo = Lfo::new(SR);
        // 1 Hz for a quarter second
        for _ in 0..12000 {
            lfo.advance(1.0, 1.0, LfoShape::Sine);
        }
        assert!((lfo.phase() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_rate_is_clamped() {
        let mut fast = Lfo::new(SR);
        let mut capped = Lfo::new(SR);
        for _ in 0..1000 {
            fast.advance(1000.0, 1.0, LfoShape::Sine);
            capped.advance(LFO_MAX_RATE_HZ, 1.0, LfoShape::Sine);
        }
        assert_eq!(fast.phase(), capped.phase());
    }

    #[test]
    fn test_destination_routing() {
        assert!(LfoDestination::Filter.targets_filter());
        assert!(!LfoDestination::Filter.targets_pitch());
        assert!(LfoDestination::Pitch.targets_pitch());
        assert!(!LfoDestination::Pitch.targets_filter());
        assert!(LfoDestination::Both.targets_filter() && LfoDestination::Both.targets_pitch());
    }

    #[test]
    fn test_index_decoding() {
        assert_eq!(LfoShape::from_index(0), LfoShape::Sine);
        assert_eq!(LfoShape::from_index(1), LfoShape::Triangle);
        assert_eq!(LfoDestination::from_index(-3), LfoDestination::Filter);
        assert_eq!(LfoDestination::from_index(1), LfoDestination::Pitch);
        assert_eq!(LfoDestination::from_index(7), LfoDestination::Both);
        assert_eq!(LfoDestination::from_index(LfoDestination::Both.index()), LfoDestination::Both);
    }
}
