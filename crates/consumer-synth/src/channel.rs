//! One monophonic synth voice.
//!
//! [`SynthChannel`] owns two oscillators, the amplitude and filter
//! envelopes, the filter, the glide ramp, and the LFO, and advances them in
//! lock-step once per sample. It reads its patch but never validates it:
//! callers hand it [`ChannelParameters::sanitized`] values.
//!
//! # Signal Flow
//!
//! ```text
//! glide ─► osc1 ─┐
//!       └► osc2 ─┴─► mix × 0.5 ─► × amp env ─► filter ─► out
//!            ▲                                  ▲
//!         hard sync                     filter env, LFO
//! ```

use consumer_core::semitones_to_ratio;

use crate::envelope::EnvelopeGenerator;
use crate::filter::Filter;
use crate::glide::GlideRamp;
use crate::lfo::{LFO_PITCH_SEMITONES, Lfo};
use crate::note::Note;
use crate::oscillator::Oscillator;
use crate::patch::{ChannelParameters, EffectSends};

/// Gain applied to the summed oscillators.
pub const MIX_HEADROOM: f32 = 0.5;

/// A monophonic subtractive synth voice.
///
/// The sample rate is fixed at construction; build a new channel to change
/// it. Nothing here allocates after [`new`](Self::new).
///
/// # Example
///
/// ```rust
/// use consumer_synth::{ChannelParameters, Note, SynthChannel};
///
/// let mut channel = SynthChannel::new(48000.0);
/// channel.set_parameters(&ChannelParameters::default());
///
/// channel.note_on(Note(60));
/// let mut buffer = [0.0; 256];
/// channel.render_buffer(&mut buffer);
/// assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
///
/// channel.note_off();
/// assert!(channel.is_active()); // still releasing
/// ```
#[derive(Debug, Clone)]
pub struct SynthChannel {
    osc1: Oscillator,
    osc2: Oscillator,
    amp_env: EnvelopeGenerator,
    filter_env: EnvelopeGenerator,
    filter: Filter,
    glide: GlideRamp,
    lfo: Lfo,

    params: ChannelParameters,
    note: Note,
    /// Pitch of the last note-on; kept through release
    target_hz: f32,
    /// LFO output from the previous sample, used for pitch modulation
    lfo_value: f32,
    sample_rate: f32,
}

impl Default for SynthChannel {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl SynthChannel {
    /// Create a silent channel with the default patch.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            osc1: Oscillator::new(sample_rate),
            osc2: Oscillator::new(sample_rate),
            amp_env: EnvelopeGenerator::new(sample_rate),
            filter_env: EnvelopeGenerator::new(sample_rate),
            filter: Filter::new(sample_rate),
            glide: GlideRamp::new(sample_rate),
            lfo: Lfo::new(sample_rate),
            params: ChannelParameters::default(),
            note: Note::OFF,
            target_hz: 0.0,
            lfo_value: 0.0,
            sample_rate,
        }
    }

    /// Replace the patch. Takes effect on the next sample.
    pub fn set_parameters(&mut self, params: &ChannelParameters) {
        self.params = *params;
    }

    /// Current patch.
    pub fn parameters(&self) -> &ChannelParameters {
        &self.params
    }

    /// Start a note. [`Note::OFF`] is treated as [`note_off`](Self::note_off).
    ///
    /// Glide only applies while the voice is sounding; from silence the pitch
    /// jumps straight to the new note. Oscillator phases restart at 0.
    pub fn note_on(&mut self, note: Note) {
        let Some(hz) = note.frequency() else {
            self.note_off();
            return;
        };

        self.note = note;
        self.target_hz = hz;
        if !self.amp_env.is_active() {
            self.glide.snap(hz);
        }

        self.osc1.reset();
        self.osc2.reset();
        self.amp_env.note_on();
        self.filter_env.note_on();
    }

    /// Release the held note. The voice keeps sounding through release at
    /// the last pitch.
    pub fn note_off(&mut self) {
        self.note = Note::OFF;
        self.amp_env.note_off();
        self.filter_env.note_off();
    }

    /// Render one sample.
    #[inline]
    pub fn render_sample(&mut self) -> f32 {
        let p = &self.params;

        let base_hz = self.glide.advance(self.target_hz, p.glide);
        let hz = if p.lfo.destination.targets_pitch() {
            base_hz * semitones_to_ratio(self.lfo_value * LFO_PITCH_SEMITONES)
        } else {
            base_hz
        };

        let s1 = self
            .osc1
            .advance(hz, p.osc1.waveform, p.osc1.detune, p.osc1.octave);
        let s2 = self
            .osc2
            .advance(hz, p.osc2.waveform, p.osc2.detune, p.osc2.octave);
        let mixed = (s1 * p.osc1.amplitude + s2 * p.osc2.amplitude) * MIX_HEADROOM;

        if p.hard_sync && self.osc1.wrapped() {
            self.osc2.sync();
        }

        self.lfo_value = self.lfo.advance(p.lfo.rate, p.lfo.depth, p.lfo.shape);
        let amp = self.amp_env.advance(&p.amp_envelope);
        let filter_level = self.filter_env.advance(&p.filter_envelope);

        let lfo_cutoff = if p.lfo.destination.targets_filter() {
            self.lfo_value
        } else {
            0.0
        };
        let out = self.filter.process(
            mixed * amp,
            p.filter.cutoff,
            p.filter.resonance,
            p.filter.peak,
            p.filter.env_amount,
            filter_level,
            lfo_cutoff,
        );

        if out.is_finite() {
            out
        } else {
            self.filter.reset();
            0.0
        }
    }

    /// Fill `buffer` with consecutive samples.
    pub fn render_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.render_sample();
        }
    }

    /// True while either envelope is running.
    pub fn is_active(&self) -> bool {
        self.amp_env.is_active() || self.filter_env.is_active()
    }

    /// Return to a silent baseline, keeping the patch.
    pub fn reset(&mut self) {
        self.osc1.reset();
        self.osc2.reset();
        self.amp_env.reset();
        self.filter_env.reset();
        self.filter.reset();
        self.lfo.reset();
        self.glide.snap(0.0);
        self.note = Note::OFF;
        self.target_hz = 0.0;
        self.lfo_value = 0.0;
    }

    /// Held note, or [`Note::OFF`].
    pub fn note(&self) -> Note {
        self.note
    }

    /// Sample rate fixed at construction.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Effect send levels from the current patch.
    pub fn sends(&self) -> EffectSends {
        self.params.sends
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{AdsrEnvelope, EnvelopeStage};
    use crate::lfo::LfoDestination;
    use crate::oscillator::Waveform;

    const SR: f32 = 48000.0;

    fn render(channel: &mut SynthChannel, samples: usize) -> f32 {
        let mut peak: f32 = 0.0;
        for _ in 0..samples {
            peak = peak.max(channel.render_sample().abs());
        }
        peak
    }

    #[test]
    fn test_silent_until_note_on() {
        let mut channel = SynthChannel::new(SR);
        assert_eq!(render(&mut channel, 1000), 0.0);
        assert!(!channel.is_active());
    }

    #[test]
    fn test_note_on_sounds_and_note_off_decays() {
        let mut channel = SynthChannel::new(SR);
        channel.note_on(Note(60));
        assert_eq!(channel.note(), Note(60));
        assert!(render(&mut channel, 4800) > 0.05);

        channel.note_off();
        assert_eq!(channel.note(), Note::OFF);
        assert!(channel.is_active());

        render(&mut channel, SR as usize);
        assert!(!channel.is_active());
        assert!(render(&mut channel, 4800) < 1e-3);
    }

    #[test]
    fn test_off_sentinel_is_note_off() {
        let mut channel = SynthChannel::new(SR);
        channel.note_on(Note(64));
        render(&mut channel, 100);
        channel.note_on(Note::OFF);
        assert_eq!(channel.amp_env.stage(), EnvelopeStage::Release);
        assert_eq!(channel.note(), Note::OFF);
    }

    #[test]
    fn test_off_sentinel_from_silence_stays_silent() {
        let mut channel = SynthChannel::new(SR);
        channel.note_on(Note::OFF);
        assert!(!channel.is_active());
        assert_eq!(render(&mut channel, 100), 0.0);
    }

    #[test]
    fn test_note_on_resets_oscillator_phase() {
        let mut channel = SynthChannel::new(SR);
        channel.note_on(Note(60));
        render(&mut channel, 333);
        assert!(channel.osc1.phase() > 0.0);

        channel.note_on(Note(62));
        assert_eq!(channel.osc1.phase(), 0.0);
        assert_eq!(channel.osc2.phase(), 0.0);
    }

    #[test]
    fn test_first_note_does_not_glide() {
        let mut params = ChannelParameters::default();
        params.glide = 1.0;
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);

        channel.note_on(Note(69));
        channel.render_sample();
        assert!((channel.glide.current() - 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_legato_note_glides() {
        let mut params = ChannelParameters::default();
        params.glide = 0.2;
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);

        channel.note_on(Note(57));
        render(&mut channel, 100);
        channel.note_on(Note(69));
        channel.render_sample();

        let hz = channel.glide.current();
        assert!(hz > 220.0 && hz < 250.0, "should start near 220 Hz, got {}", hz);
    }

    #[test]
    fn test_hard_sync_resets_slave_on_master_wrap() {
        let mut params = ChannelParameters::default();
        params.hard_sync = true;
        params.osc2.octave = 1;
        params.osc2.detune = 0.37;
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);
        channel.note_on(Note(69));

        let mut syncs = 0;
        for _ in 0..4800 {
            channel.render_sample();
            if channel.osc1.wrapped() {
                assert_eq!(channel.osc2.phase(), 0.0);
                syncs += 1;
            }
        }
        assert!(syncs >= 40, "expected ~44 master cycles, got {}", syncs);
    }

    #[test]
    fn test_without_sync_slave_runs_free() {
        let mut params = ChannelParameters::default();
        params.osc2.octave = 1;
        params.osc2.detune = 0.37;
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);
        channel.note_on(Note(69));

        let mut nonzero_at_wrap = false;
        for _ in 0..4800 {
            channel.render_sample();
            if channel.osc1.wrapped() && channel.osc2.phase() != 0.0 {
                nonzero_at_wrap = true;
            }
        }
        assert!(nonzero_at_wrap);
    }

    #[test]
    fn test_lfo_pitch_uses_previous_sample_value() {
        let mut params = ChannelParameters::default();
        params.lfo.destination = LfoDestination::Pitch;
        params.lfo.depth = 1.0;
        params.lfo.rate = 20.0;
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);
        channel.note_on(Note(69));

        // First sample: no LFO value yet, pitch is unmodulated
        channel.render_sample();
        let expected = 440.0 * libm::exp2f(params.osc1.detune / 12.0) / SR;
        assert!((channel.osc1.phase() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_output_bounded_with_extreme_patch() {
        let mut params = ChannelParameters::default();
        params.osc1 = crate::patch::OscillatorParams {
            waveform: Waveform::Square,
            detune: 1.0,
            amplitude: 1.0,
            octave: 2,
        };
        params.osc2.amplitude = 1.0;
        params.osc2.waveform = Waveform::Square;
        params.filter.resonance = 1.0;
        params.filter.peak = 1.0;
        params.filter.env_amount = 1.0;
        params.lfo.destination = LfoDestination::Both;
        params.lfo.depth = 1.0;
        params.lfo.rate = 20.0;
        params.amp_envelope = AdsrEnvelope::new(0.0, 0.0, 1.0, 0.0);
        params.hard_sync = true;

        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params.sanitized());
        channel.note_on(Note(40));
        for _ in 0..SR as usize {
            let sample = channel.render_sample();
            assert!(sample.is_finite());
            assert!((-1.0..=1.0).contains(&sample));
        }
    }

    #[test]
    fn test_sends_follow_patch() {
        let mut params = ChannelParameters::default();
        params.sends = EffectSends {
            reverb: 0.4,
            delay: 0.2,
        };
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&params);
        assert_eq!(channel.sends(), params.sends);
    }

    #[test]
    fn test_reset_silences() {
        let mut channel = SynthChannel::new(SR);
        channel.note_on(Note(60));
        render(&mut channel, 1000);
        channel.reset();
        assert!(!channel.is_active());
        assert_eq!(channel.note(), Note::OFF);
        assert_eq!(render(&mut channel, 100), 0.0);
    }
}
