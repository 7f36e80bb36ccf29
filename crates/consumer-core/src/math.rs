//! Mathematical utility functions for DSP.
//!
//! Provides the small, allocation-free helpers shared by the synth voice and
//! its host glue. All functions are suitable for `no_std`.
//!
//! # Pitch Conversions
//!
//! - [`note_to_freq`] - Pitch index to frequency (A4 = 69 = 440 Hz)
//! - [`semitones_to_ratio`] - Pitch offset to frequency ratio
//!
//! # Buffer Helpers
//!
//! - [`clamp_channel`] / [`clamp_stereo`] - Limit rendered buffers in place
//!
//! # Saturation
//!
//! - [`soft_limit`] - Unity below a knee, tanh curve above it, never reaches ±1
//!
//! # Utilities
//!
//! - [`tick_length`] - Sequencer tick length in samples
//! - [`floats_are_equal`] - Tolerant float comparison
//! - [`flush_denormal`] - Denormal protection for feedback paths

use libm::{exp2f, tanhf};

/// Tolerance used by [`floats_are_equal`].
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Pitch index of A4.
pub const A4_NOTE: f32 = 69.0;

/// Frequency of A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// Convert a pitch index to frequency in Hz.
///
/// Uses twelve-tone equal temperament with A4 (index 69) = 440 Hz. Any
/// index is accepted, including negative ones.
///
/// # Example
/// ```rust
/// use consumer_core::note_to_freq;
///
/// assert!((note_to_freq(69) - 440.0).abs() < 1e-3);
/// assert!((note_to_freq(81) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn note_to_freq(note: i32) -> f32 {
    A4_FREQUENCY * exp2f((note as f32 - A4_NOTE) / 12.0)
}

/// Convert a pitch offset in semitones to a frequency ratio.
///
/// 12 semitones = 2.0, -12 semitones = 0.5.
#[inline]
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Length of one sequencer tick in samples.
///
/// A tick is a sixteenth note, so one beat at `bpm` spans four ticks.
/// Returns `0.0` for a non-positive or non-finite tempo.
///
/// # Example
/// ```rust
/// use consumer_core::tick_length;
///
/// // 120 BPM at 48 kHz: one beat = 24000 samples, one tick = 6000
/// assert_eq!(tick_length(120.0, 48000.0), 6000.0);
/// ```
#[inline]
pub fn tick_length(bpm: f32, sample_rate: f32) -> f32 {
    if !(bpm.is_finite() && bpm > 0.0) {
        return 0.0;
    }
    sample_rate * 60.0 / bpm / 4.0
}

/// Clamp every sample of a channel to `[-max, max]` in place.
///
/// A negative `max` is treated as its magnitude.
pub fn clamp_channel(channel: &mut [f32], max: f32) {
    let limit = max.abs();
    for sample in channel.iter_mut() {
        *sample = sample.clamp(-limit, limit);
    }
}

/// Clamp a stereo pair of channels in place.
///
/// `max` is capped at 1.0, so the result is always within full scale.
pub fn clamp_stereo(left: &mut [f32], right: &mut [f32], max: f32) {
    let limit = max.abs().min(1.0);
    clamp_channel(left, limit);
    clamp_channel(right, limit);
}

/// Soft-limit a sample toward ±1.
///
/// Samples with magnitude up to `knee` pass unchanged. Above it the excess
/// is bent onto a tanh curve that meets the linear segment with unit slope
/// and approaches ±1 asymptotically, so loud peaks round off instead of
/// flattening. `knee` is expected in [0, 1).
///
/// # Example
/// ```rust
/// use consumer_core::soft_limit;
///
/// assert_eq!(soft_limit(0.3, 0.5), 0.3);
/// let loud = soft_limit(1.5, 0.5);
/// assert!(loud > 0.9 && loud < 1.0);
/// assert_eq!(soft_limit(-1.5, 0.5), -loud);
/// ```
#[inline]
pub fn soft_limit(x: f32, knee: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= knee {
        return x;
    }
    let headroom = 1.0 - knee;
    let limited = knee + headroom * tanhf((magnitude - knee) / headroom);
    if x < 0.0 { -limited } else { limited }
}

/// Compare two floats within [`FLOAT_EPSILON`].
///
/// # Example
/// ```rust
/// use consumer_core::floats_are_equal;
///
/// assert!(floats_are_equal(0.1 + 0.2, 0.3));
/// assert!(!floats_are_equal(0.1, 0.2));
/// ```
#[inline]
pub fn floats_are_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < FLOAT_EPSILON
}

/// Flush denormal numbers to zero.
///
/// Denormals (very small floating point numbers near zero) cause severe
/// slowdowns on most architectures. Use this on filter and integrator state
/// that can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
