//! Control-thread and audio-thread handles for one synth channel.
//!
//! [`SynthController::new`] returns a pair. The controller stays on the
//! control thread and owns the authoritative patch: every setter clamps its
//! value, then publishes the whole patch through [`SharedPatch`]. Note events
//! are queued. The [`ChannelRenderer`] moves to the audio thread and owns
//! the [`SynthChannel`]; before each render call it picks up the newest
//! patch and applies queued note events in order. Note events wait while a
//! patch write is in flight, so a note is never shaped by a patch older than
//! the one published before it.
//!
//! ```rust
//! use consumer_synth::{Note, SynthController, Waveform};
//!
//! let (mut controller, mut renderer) = SynthController::new(48000.0).unwrap();
//! controller.set_osc1_waveform(Waveform::Square);
//! controller.set_filter_cutoff(0.4);
//! controller.note_on(Note(60)).unwrap();
//!
//! // On the audio thread
//! let mut buffer = [0.0; 128];
//! renderer.render_buffer(&mut buffer);
//! assert!(renderer.is_active());
//! ```

use std::sync::Arc;

use consumer_core::{ParamDescriptor, floats_are_equal};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::channel::SynthChannel;
use crate::envelope::AdsrEnvelope;
use crate::error::{Result, SynthError};
use crate::lfo::{LfoDestination, LfoShape};
use crate::note::Note;
use crate::oscillator::Waveform;
use crate::patch::{ChannelParameters, EffectSends, PARAM_COUNT, PARAM_DESCRIPTORS, index};
use crate::shared::{NOTE_QUEUE_CAPACITY, NoteEvent, PatchRead, SharedPatch};

/// Control-thread handle: patch owner and note sender.
#[derive(Debug)]
pub struct SynthController {
    params: ChannelParameters,
    shared: Arc<SharedPatch>,
    notes: Sender<NoteEvent>,
    note: Note,
    sample_rate: f32,
}

impl SynthController {
    /// Create a controller and its renderer with the default patch.
    ///
    /// Fails with [`SynthError::InvalidSampleRate`] unless `sample_rate` is
    /// finite and positive.
    pub fn new(sample_rate: f32) -> Result<(SynthController, ChannelRenderer)> {
        Self::with_parameters(sample_rate, &ChannelParameters::default())
    }

    /// Create a controller and its renderer with an initial patch.
    pub fn with_parameters(
        sample_rate: f32,
        params: &ChannelParameters,
    ) -> Result<(SynthController, ChannelRenderer)> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }

        let params = params.sanitized();
        let shared = Arc::new(SharedPatch::new(&params));
        let (tx, rx) = crossbeam_channel::bounded(NOTE_QUEUE_CAPACITY);

        let mut channel = SynthChannel::new(sample_rate);
        channel.set_parameters(&params);

        tracing::info!(sample_rate, params = PARAM_COUNT, "synth channel created");

        let controller = SynthController {
            params,
            shared: Arc::clone(&shared),
            notes: tx,
            note: Note::OFF,
            sample_rate,
        };
        let renderer = ChannelRenderer {
            channel,
            last_sequence: shared.sequence(),
            shared,
            notes: rx,
        };
        Ok((controller, renderer))
    }

    // --- Notes ---

    /// Queue a note-on. [`Note::OFF`] queues a note-off instead.
    pub fn note_on(&mut self, note: Note) -> Result<()> {
        if note.is_off() {
            return self.note_off();
        }
        self.send(NoteEvent::On(note))?;
        tracing::debug!(note = note.0, "note on");
        self.note = note;
        Ok(())
    }

    /// Queue a note-off.
    pub fn note_off(&mut self) -> Result<()> {
        self.send(NoteEvent::Off)?;
        tracing::debug!(note = self.note.0, "note off");
        self.note = Note::OFF;
        Ok(())
    }

    fn send(&self, event: NoteEvent) -> Result<()> {
        self.notes.try_send(event).map_err(|err| match err {
            TrySendError::Full(event) => {
                tracing::warn!(?event, "note queue full, event dropped");
                SynthError::EventQueueFull
            }
            TrySendError::Disconnected(event) => {
                tracing::warn!(?event, "renderer gone, event dropped");
                SynthError::Disconnected
            }
        })
    }

    /// Last note sent, or [`Note::OFF`].
    pub fn note(&self) -> Note {
        self.note
    }

    // --- Whole-patch access ---

    /// Current patch.
    pub fn parameters(&self) -> &ChannelParameters {
        &self.params
    }

    /// Replace the whole patch. Values are clamped before publishing.
    pub fn set_parameters(&mut self, params: &ChannelParameters) {
        let sanitized = params.sanitized();
        if sanitized != *params {
            tracing::debug!("patch clamped to valid ranges");
        }
        self.params = sanitized;
        self.publish();
    }

    /// Publish the current patch again.
    pub fn configure(&mut self) {
        self.publish();
    }

    fn publish(&self) {
        self.shared.publish(&self.params);
    }

    /// Value at `index`.
    pub fn param(&self, index: usize) -> Result<f32> {
        self.params
            .value(index)
            .ok_or(SynthError::UnknownParameter(index))
    }

    /// Set the value at `index`, returning the stored (clamped) value.
    pub fn set_param(&mut self, index: usize, value: f32) -> Result<f32> {
        if index >= PARAM_COUNT {
            return Err(SynthError::UnknownParameter(index));
        }
        Ok(self.apply(index, value))
    }

    /// Set a parameter by its string ID (case-insensitive).
    pub fn set_param_by_name(&mut self, string_id: &str, value: f32) -> Result<f32> {
        let index = PARAM_DESCRIPTORS
            .iter()
            .position(|d| d.string_id.eq_ignore_ascii_case(string_id))
            .ok_or_else(|| SynthError::UnknownParameterName(string_id.to_owned()))?;
        Ok(self.apply(index, value))
    }

    /// Descriptors for every parameter, in index order.
    pub fn param_descriptors(&self) -> &'static [ParamDescriptor] {
        &PARAM_DESCRIPTORS
    }

    /// Sample rate shared with the renderer.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn apply(&mut self, index: usize, value: f32) -> f32 {
        let stored = self.params.set_value(index, value).unwrap_or(value);
        if !floats_are_equal(stored, value) {
            tracing::debug!(
                param = PARAM_DESCRIPTORS[index].string_id,
                requested = value,
                stored,
                "parameter clamped"
            );
        }
        self.publish();
        stored
    }

    // --- Oscillators ---

    /// Set oscillator 1 waveform.
    pub fn set_osc1_waveform(&mut self, waveform: Waveform) {
        self.apply(index::OSC1_WAVEFORM, waveform.index() as f32);
    }

    /// Set oscillator 1 detune, [-1, 1].
    pub fn set_osc1_detune(&mut self, detune: f32) {
        self.apply(index::OSC1_DETUNE, detune);
    }

    /// Set oscillator 1 amplitude, [0, 1].
    pub fn set_osc1_amplitude(&mut self, amplitude: f32) {
        self.apply(index::OSC1_AMPLITUDE, amplitude);
    }

    /// Set oscillator 1 octave, [-2, 2].
    pub fn set_osc1_octave(&mut self, octave: i32) {
        self.apply(index::OSC1_OCTAVE, octave as f32);
    }

    /// Set oscillator 2 waveform.
    pub fn set_osc2_waveform(&mut self, waveform: Waveform) {
        self.apply(index::OSC2_WAVEFORM, waveform.index() as f32);
    }

    /// Set oscillator 2 detune, [-1, 1].
    pub fn set_osc2_detune(&mut self, detune: f32) {
        self.apply(index::OSC2_DETUNE, detune);
    }

    /// Set oscillator 2 amplitude, [0, 1].
    pub fn set_osc2_amplitude(&mut self, amplitude: f32) {
        self.apply(index::OSC2_AMPLITUDE, amplitude);
    }

    /// Set oscillator 2 octave, [-2, 2].
    pub fn set_osc2_octave(&mut self, octave: i32) {
        self.apply(index::OSC2_OCTAVE, octave as f32);
    }

    /// Enable or disable hard sync of oscillator 2 to oscillator 1.
    pub fn set_hard_sync(&mut self, enabled: bool) {
        self.apply(index::HARD_SYNC, if enabled { 1.0 } else { 0.0 });
    }

    // --- Envelopes ---

    /// Set the amplitude envelope.
    pub fn set_amp_envelope(&mut self, envelope: AdsrEnvelope) {
        let mut params = self.params;
        params.amp_envelope = envelope;
        self.set_parameters(&params);
    }

    /// Set the filter envelope.
    pub fn set_filter_envelope(&mut self, envelope: AdsrEnvelope) {
        let mut params = self.params;
        params.filter_envelope = envelope;
        self.set_parameters(&params);
    }

    // --- Glide ---

    /// Set glide amount, [0, 1].
    pub fn set_glide(&mut self, glide: f32) {
        self.apply(index::GLIDE, glide);
    }

    // --- Filter ---

    /// Set normalized filter cutoff, [0, 1].
    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.apply(index::FILTER_CUTOFF, cutoff);
    }

    /// Set filter resonance, [-0.5, 1].
    pub fn set_filter_resonance(&mut self, resonance: f32) {
        self.apply(index::FILTER_RESONANCE, resonance);
    }

    /// Set filter resonance ceiling, [0, 1].
    pub fn set_filter_peak(&mut self, peak: f32) {
        self.apply(index::FILTER_PEAK, peak);
    }

    /// Set filter envelope depth, [-1, 1].
    pub fn set_filter_env_amount(&mut self, amount: f32) {
        self.apply(index::FILTER_ENV_AMOUNT, amount);
    }

    // --- LFO ---

    /// Set LFO rate in Hz, [0, 20].
    pub fn set_lfo_rate(&mut self, rate_hz: f32) {
        self.apply(index::LFO_RATE, rate_hz);
    }

    /// Set LFO depth, [0, 1].
    pub fn set_lfo_depth(&mut self, depth: f32) {
        self.apply(index::LFO_DEPTH, depth);
    }

    /// Set LFO shape.
    pub fn set_lfo_shape(&mut self, shape: LfoShape) {
        self.apply(index::LFO_SHAPE, shape.index() as f32);
    }

    /// Set LFO destination.
    pub fn set_lfo_destination(&mut self, destination: LfoDestination) {
        self.apply(index::LFO_DESTINATION, destination.index() as f32);
    }

    // --- Sends ---

    /// Set reverb send level, [0, 1].
    pub fn set_reverb_mix(&mut self, mix: f32) {
        self.apply(index::REVERB_MIX, mix);
    }

    /// Set delay send level, [0, 1].
    pub fn set_delay_mix(&mut self, mix: f32) {
        self.apply(index::DELAY_MIX, mix);
    }

    /// Current send levels.
    pub fn sends(&self) -> EffectSends {
        self.params.sends
    }
}

/// Patch reads attempted per render call before note events are deferred.
const PATCH_READ_ATTEMPTS: usize = 4;

/// Audio-thread handle: owns the channel and renders it.
///
/// Never blocks or allocates.
#[derive(Debug)]
pub struct ChannelRenderer {
    channel: SynthChannel,
    shared: Arc<SharedPatch>,
    notes: Receiver<NoteEvent>,
    last_sequence: u64,
}

impl ChannelRenderer {
    /// Apply the newest patch and any queued note events.
    ///
    /// Events stay queued if every read attempt finds a write in flight.
    fn sync(&mut self) {
        let mut params = *self.channel.parameters();
        let mut read = PatchRead::Busy;
        for _ in 0..PATCH_READ_ATTEMPTS {
            read = self.shared.read_if_changed(&mut self.last_sequence, &mut params);
            if read != PatchRead::Busy {
                break;
            }
            std::hint::spin_loop();
        }
        match read {
            PatchRead::Updated => self.channel.set_parameters(&params),
            PatchRead::Unchanged => {}
            PatchRead::Busy => return,
        }

        while let Ok(event) = self.notes.try_recv() {
            match event {
                NoteEvent::On(note) => self.channel.note_on(note),
                NoteEvent::Off => self.channel.note_off(),
            }
        }
    }

    /// Render one sample.
    #[inline]
    pub fn render_sample(&mut self) -> f32 {
        self.sync();
        self.channel.render_sample()
    }

    /// Render a buffer. Pending updates apply before the first sample.
    pub fn render_buffer(&mut self, buffer: &mut [f32]) {
        self.sync();
        self.channel.render_buffer(buffer);
    }

    /// True while either envelope is running.
    pub fn is_active(&self) -> bool {
        self.channel.is_active()
    }

    /// The channel being rendered.
    pub fn channel(&self) -> &SynthChannel {
        &self.channel
    }

    /// Effect send levels from the renderer's current patch.
    pub fn sends(&self) -> EffectSends {
        self.channel.sends()
    }

    /// Sample rate fixed at construction.
    pub fn sample_rate(&self) -> f32 {
        self.channel.sample_rate()
    }
}
