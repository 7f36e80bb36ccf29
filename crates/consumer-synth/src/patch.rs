//! The channel patch: every timbre parameter of one voice.
//!
//! [`ChannelParameters`] is a plain `Copy` struct grouped by section. The
//! same values are also addressable by flat index through [`ParameterInfo`],
//! with one [`ParamDescriptor`] per index in [`PARAM_DESCRIPTORS`]. The index
//! order is stable and is the layout used to publish patches across threads.
//!
//! | Index | String ID | Range | Default |
//! |-------|-----------|-------|---------|
//! | 0–3 | `osc1_waveform`, `osc1_detune`, `osc1_amplitude`, `osc1_octave` | 0–3, ±1, 0–1, ±2 | Saw, 0, 0.8, 0 |
//! | 4–7 | `osc2_*` | same | Saw, 0.1, 0.5, 0 |
//! | 8–11 | `amp_attack`, `amp_decay`, `amp_sustain`, `amp_release` | 0–1 | 0.01, 0.2, 0.8, 0.3 |
//! | 12–15 | `filter_env_attack` … `filter_env_release` | 0–1 | 0.05, 0.3, 0.4, 0.4 |
//! | 16 | `glide` | 0–1 | 0 |
//! | 17–20 | `filter_cutoff`, `filter_resonance`, `filter_peak`, `filter_env_amount` | 0–1, -0.5–1, 0–1, ±1 | 0.6, 0.2, 0.5, 0.3 |
//! | 21–24 | `lfo_rate`, `lfo_depth`, `lfo_shape`, `lfo_destination` | 0–20 Hz, 0–1, 0–1, 0–2 | 5, 0, Sine, Filter |
//! | 25 | `hard_sync` | toggle | off |
//! | 26–27 | `reverb_mix`, `delay_mix` | 0–1 | 0, 0 |

use consumer_core::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
use libm::roundf;

use crate::envelope::AdsrEnvelope;
use crate::lfo::{LfoDestination, LfoShape};
use crate::oscillator::Waveform;

/// Number of patch parameters.
pub const PARAM_COUNT: usize = 28;

/// Flat parameter indices.
pub mod index {
    #![allow(missing_docs)]

    pub const OSC1_WAVEFORM: usize = 0;
    pub const OSC1_DETUNE: usize = 1;
    pub const OSC1_AMPLITUDE: usize = 2;
    pub const OSC1_OCTAVE: usize = 3;
    pub const OSC2_WAVEFORM: usize = 4;
    pub const OSC2_DETUNE: usize = 5;
    pub const OSC2_AMPLITUDE: usize = 6;
    pub const OSC2_OCTAVE: usize = 7;
    pub const AMP_ATTACK: usize = 8;
    pub const AMP_DECAY: usize = 9;
    pub const AMP_SUSTAIN: usize = 10;
    pub const AMP_RELEASE: usize = 11;
    pub const FILTER_ENV_ATTACK: usize = 12;
    pub const FILTER_ENV_DECAY: usize = 13;
    pub const FILTER_ENV_SUSTAIN: usize = 14;
    pub const FILTER_ENV_RELEASE: usize = 15;
    pub const GLIDE: usize = 16;
    pub const FILTER_CUTOFF: usize = 17;
    pub const FILTER_RESONANCE: usize = 18;
    pub const FILTER_PEAK: usize = 19;
    pub const FILTER_ENV_AMOUNT: usize = 20;
    pub const LFO_RATE: usize = 21;
    pub const LFO_DEPTH: usize = 22;
    pub const LFO_SHAPE: usize = 23;
    pub const LFO_DESTINATION: usize = 24;
    pub const HARD_SYNC: usize = 25;
    pub const REVERB_MIX: usize = 26;
    pub const DELAY_MIX: usize = 27;
}

const fn waveform_param(
    name: &'static str,
    id: u32,
    string_id: &'static str,
    group: &'static str,
    default: Waveform,
) -> ParamDescriptor {
    ParamDescriptor::stepped(name, "Wave", 0.0, 3.0, default as i32 as f32)
        .with_id(ParamId(id), string_id)
        .with_group(group)
}

const fn octave_param(
    name: &'static str,
    id: u32,
    string_id: &'static str,
    group: &'static str,
) -> ParamDescriptor {
    ParamDescriptor {
        unit: ParamUnit::Octaves,
        ..ParamDescriptor::stepped(name, "Octave", -2.0, 2.0, 0.0)
    }
    .with_id(ParamId(id), string_id)
    .with_group(group)
}

const fn time_param(
    name: &'static str,
    short: &'static str,
    id: u32,
    string_id: &'static str,
    group: &'static str,
    default: f32,
) -> ParamDescriptor {
    ParamDescriptor::continuous(name, short, ParamUnit::Seconds, 0.0, 1.0, default)
        .with_id(ParamId(id), string_id)
        .with_group(group)
}

const fn level_param(
    name: &'static str,
    short: &'static str,
    id: u32,
    string_id: &'static str,
    group: &'static str,
    default: f32,
) -> ParamDescriptor {
    ParamDescriptor::continuous(name, short, ParamUnit::None, 0.0, 1.0, default)
        .with_id(ParamId(id), string_id)
        .with_group(group)
}

/// Descriptor for every patch parameter, in index order.
pub static PARAM_DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    // Oscillator 1
    waveform_param("Osc 1 Waveform", 100, "osc1_waveform", "osc1", Waveform::Saw),
    ParamDescriptor::continuous("Osc 1 Detune", "Detune", ParamUnit::Semitones, -1.0, 1.0, 0.0)
        .with_id(ParamId(101), "osc1_detune")
        .with_group("osc1"),
    level_param("Osc 1 Amplitude", "Level", 102, "osc1_amplitude", "osc1", 0.8),
    octave_param("Osc 1 Octave", 103, "osc1_octave", "osc1"),
    // Oscillator 2
    waveform_param("Osc 2 Waveform", 200, "osc2_waveform", "osc2", Waveform::Saw),
    ParamDescriptor::continuous("Osc 2 Detune", "Detune", ParamUnit::Semitones, -1.0, 1.0, 0.1)
        .with_id(ParamId(201), "osc2_detune")
        .with_group("osc2"),
    level_param("Osc 2 Amplitude", "Level", 202, "osc2_amplitude", "osc2", 0.5),
    octave_param("Osc 2 Octave", 203, "osc2_octave", "osc2"),
    // Amplitude envelope
    time_param("Amp Attack", "Attack", 300, "amp_attack", "amp_env", 0.01),
    time_param("Amp Decay", "Decay", 301, "amp_decay", "amp_env", 0.2),
    level_param("Amp Sustain", "Sustain", 302, "amp_sustain", "amp_env", 0.8),
    time_param("Amp Release", "Release", 303, "amp_release", "amp_env", 0.3),
    // Filter envelope
    time_param("Filter Env Attack", "F.Att", 400, "filter_env_attack", "filter_env", 0.05),
    time_param("Filter Env Decay", "F.Dec", 401, "filter_env_decay", "filter_env", 0.3),
    level_param("Filter Env Sustain", "F.Sus", 402, "filter_env_sustain", "filter_env", 0.4),
    time_param("Filter Env Release", "F.Rel", 403, "filter_env_release", "filter_env", 0.4),
    // Glide
    level_param("Glide", "Glide", 500, "glide", "glide", 0.0),
    // Filter
    level_param("Filter Cutoff", "Cutoff", 600, "filter_cutoff", "filter", 0.6),
    ParamDescriptor::continuous("Filter Resonance", "Reso", ParamUnit::None, -0.5, 1.0, 0.2)
        .with_id(ParamId(601), "filter_resonance")
        .with_group("filter"),
    level_param("Filter Peak", "Peak", 602, "filter_peak", "filter", 0.5),
    ParamDescriptor::continuous("Filter Env Amount", "Env Amt", ParamUnit::None, -1.0, 1.0, 0.3)
        .with_id(ParamId(603), "filter_env_amount")
        .with_group("filter"),
    // LFO
    ParamDescriptor::continuous("LFO Rate", "Rate", ParamUnit::Hertz, 0.0, 20.0, 5.0)
        .with_id(ParamId(700), "lfo_rate")
        .with_group("lfo"),
    level_param("LFO Depth", "Depth", 701, "lfo_depth", "lfo", 0.0),
    ParamDescriptor::stepped("LFO Shape", "Shape", 0.0, 1.0, 0.0)
        .with_id(ParamId(702), "lfo_shape")
        .with_group("lfo"),
    ParamDescriptor::stepped("LFO Destination", "Dest", 0.0, 2.0, 0.0)
        .with_id(ParamId(703), "lfo_destination")
        .with_group("lfo"),
    // Sync
    ParamDescriptor::toggle("Hard Sync", "Sync", false)
        .with_id(ParamId(800), "hard_sync")
        .with_group("osc2"),
    // Effect sends
    level_param("Reverb Mix", "Reverb", 900, "reverb_mix", "sends", 0.0),
    level_param("Delay Mix", "Delay", 901, "delay_mix", "sends", 0.0),
];

/// Per-oscillator settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorParams {
    /// Waveform shape.
    pub waveform: Waveform,
    /// Fine tune, [-1, 1] (full scale = one semitone).
    pub detune: f32,
    /// Mix level, [0, 1].
    pub amplitude: f32,
    /// Octave shift, [-2, 2].
    pub octave: i32,
}

/// Filter settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    /// Normalized base cutoff, [0, 1].
    pub cutoff: f32,
    /// Resonance, [-0.5, 1].
    pub resonance: f32,
    /// Resonance ceiling, [0, 1].
    pub peak: f32,
    /// Filter envelope depth, [-1, 1].
    pub env_amount: f32,
}

/// LFO settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LfoParams {
    /// Rate in Hz, [0, 20].
    pub rate: f32,
    /// Output scale, [0, 1].
    pub depth: f32,
    /// Waveform shape.
    pub shape: LfoShape,
    /// Modulation target.
    pub destination: LfoDestination,
}

/// Effect send levels, read by the mixer rather than the voice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectSends {
    /// Reverb dry/wet mix, [0, 1].
    pub reverb: f32,
    /// Delay dry/wet mix, [0, 1].
    pub delay: f32,
}

/// The full patch of one synth channel.
///
/// # Example
///
/// ```rust
/// use consumer_synth::{ChannelParameters, ParameterInfo, Waveform};
///
/// let mut patch = ChannelParameters::default();
/// patch.osc1.waveform = Waveform::Square;
/// patch.filter.cutoff = 4.0; // out of range
///
/// let patch = patch.sanitized();
/// assert_eq!(patch.filter.cutoff, 1.0);
///
/// let cutoff = patch.find_param_by_string_id("filter_cutoff").unwrap();
/// assert_eq!(patch.get_param(cutoff), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelParameters {
    /// Oscillator 1 (hard-sync master).
    pub osc1: OscillatorParams,
    /// Oscillator 2 (hard-sync slave).
    pub osc2: OscillatorParams,
    /// Amplitude envelope.
    pub amp_envelope: AdsrEnvelope,
    /// Filter envelope.
    pub filter_envelope: AdsrEnvelope,
    /// Portamento amount, [0, 1].
    pub glide: f32,
    /// Filter settings.
    pub filter: FilterParams,
    /// LFO settings.
    pub lfo: LfoParams,
    /// Reset oscillator 2 whenever oscillator 1 wraps.
    pub hard_sync: bool,
    /// Effect send levels.
    pub sends: EffectSends,
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self::from_values(&Self::default_values())
    }
}

impl ChannelParameters {
    /// Descriptor defaults in index order.
    pub fn default_values() -> [f32; PARAM_COUNT] {
        core::array::from_fn(|i| PARAM_DESCRIPTORS[i].default)
    }

    /// Build a patch from flat values, clamping each to its range.
    #[allow(clippy::wildcard_imports)]
    pub fn from_values(values: &[f32; PARAM_COUNT]) -> Self {
        use crate::patch::index::*;

        let v: [f32; PARAM_COUNT] =
            core::array::from_fn(|i| PARAM_DESCRIPTORS[i].clamp(values[i]));
        let int = |i: usize| roundf(v[i]) as i32;

        Self {
            osc1: OscillatorParams {
                waveform: Waveform::from_index(int(OSC1_WAVEFORM)),
                detune: v[OSC1_DETUNE],
                amplitude: v[OSC1_AMPLITUDE],
                octave: int(OSC1_OCTAVE),
            },
            osc2: OscillatorParams {
                waveform: Waveform::from_index(int(OSC2_WAVEFORM)),
                detune: v[OSC2_DETUNE],
                amplitude: v[OSC2_AMPLITUDE],
                octave: int(OSC2_OCTAVE),
            },
            amp_envelope: AdsrEnvelope::new(
                v[AMP_ATTACK],
                v[AMP_DECAY],
                v[AMP_SUSTAIN],
                v[AMP_RELEASE],
            ),
            filter_envelope: AdsrEnvelope::new(
                v[FILTER_ENV_ATTACK],
                v[FILTER_ENV_DECAY],
                v[FILTER_ENV_SUSTAIN],
                v[FILTER_ENV_RELEASE],
            ),
            glide: v[GLIDE],
            filter: FilterParams {
                cutoff: v[FILTER_CUTOFF],
                resonance: v[FILTER_RESONANCE],
                peak: v[FILTER_PEAK],
                env_amount: v[FILTER_ENV_AMOUNT],
            },
            lfo: LfoParams {
                rate: v[LFO_RATE],
                depth: v[LFO_DEPTH],
                shape: LfoShape::from_index(int(LFO_SHAPE)),
                destination: LfoDestination::from_index(int(LFO_DESTINATION)),
            },
            hard_sync: v[HARD_SYNC] >= 0.5,
            sends: EffectSends {
                reverb: v[REVERB_MIX],
                delay: v[DELAY_MIX],
            },
        }
    }

    /// Flat values in index order.
    pub fn to_values(&self) -> [f32; PARAM_COUNT] {
        let mut values = [0.0; PARAM_COUNT];
        for (i, slot) in values.iter_mut().enumerate() {
            *slot = self.value(i).unwrap_or(0.0);
        }
        values
    }

    /// Copy with every field clamped to its range. Non-finite values become
    /// the parameter's default.
    pub fn sanitized(&self) -> Self {
        Self::from_values(&self.to_values())
    }

    /// Value at `index`, or `None` if out of range.
    #[allow(clippy::wildcard_imports)]
    pub fn value(&self, index: usize) -> Option<f32> {
        use crate::patch::index::*;

        let value = match index {
            OSC1_WAVEFORM => self.osc1.waveform.index() as f32,
            OSC1_DETUNE => self.osc1.detune,
            OSC1_AMPLITUDE => self.osc1.amplitude,
            OSC1_OCTAVE => self.osc1.octave as f32,
            OSC2_WAVEFORM => self.osc2.waveform.index() as f32,
            OSC2_DETUNE => self.osc2.detune,
            OSC2_AMPLITUDE => self.osc2.amplitude,
            OSC2_OCTAVE => self.osc2.octave as f32,
            AMP_ATTACK => self.amp_envelope.attack,
            AMP_DECAY => self.amp_envelope.decay,
            AMP_SUSTAIN => self.amp_envelope.sustain,
            AMP_RELEASE => self.amp_envelope.release,
            FILTER_ENV_ATTACK => self.filter_envelope.attack,
            FILTER_ENV_DECAY => self.filter_envelope.decay,
            FILTER_ENV_SUSTAIN => self.filter_envelope.sustain,
            FILTER_ENV_RELEASE => self.filter_envelope.release,
            GLIDE => self.glide,
            FILTER_CUTOFF => self.filter.cutoff,
            FILTER_RESONANCE => self.filter.resonance,
            FILTER_PEAK => self.filter.peak,
            FILTER_ENV_AMOUNT => self.filter.env_amount,
            LFO_RATE => self.lfo.rate,
            LFO_DEPTH => self.lfo.depth,
            LFO_SHAPE => self.lfo.shape.index() as f32,
            LFO_DESTINATION => self.lfo.destination.index() as f32,
            HARD_SYNC => {
                if self.hard_sync {
                    1.0
                } else {
                    0.0
                }
            }
            REVERB_MIX => self.sends.reverb,
            DELAY_MIX => self.sends.delay,
            _ => return None,
        };
        Some(value)
    }

    /// Set the value at `index`, clamped to its range.
    ///
    /// Returns the stored value, or `None` if `index` is out of range.
    pub fn set_value(&mut self, index: usize, value: f32) -> Option<f32> {
        self.set_param(index, value);
        self.value(index)
    }
}

impl ParameterInfo for ChannelParameters {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        PARAM_DESCRIPTORS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        self.value(index).unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(desc) = PARAM_DESCRIPTORS.get(index) {
            let mut values = self.to_values();
            values[index] = desc.clamp(value);
            *self = Self::from_values(&values);
        }
    }
}
