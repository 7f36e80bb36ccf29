//! ADSR envelope generator for synthesis.
//!
//! Linear-segment attack-decay-sustain-release envelopes driving amplitude
//! and filter modulation. The envelope shape ([`AdsrEnvelope`]) is a plain
//! configuration value read on every sample; the generator owns only the
//! stage and the current level, so patch changes take effect immediately
//! without recomputing coefficients.

/// Stage durations at or below this many seconds complete on the same sample.
pub const STAGE_EPSILON: f32 = 1e-5;

/// ADSR envelope configuration.
///
/// `attack`, `decay`, and `release` are times in seconds within [0.0, 1.0];
/// `sustain` is a level within [0.0, 1.0].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdsrEnvelope {
    /// Time to rise from the current level to 1.0, in seconds.
    pub attack: f32,
    /// Time to fall from 1.0 to the sustain level, in seconds.
    pub decay: f32,
    /// Level held while the note is down.
    pub sustain: f32,
    /// Time to fall from the release-start level to 0.0, in seconds.
    pub release: f32,
}

impl AdsrEnvelope {
    /// Create an envelope configuration.
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self::new(0.01, 0.2, 0.8, 0.3)
    }
}

/// ADSR envelope stages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Envelope is inactive: output is zero.
    #[default]
    Idle,
    /// Attack phase: output ramps up toward 1.0.
    Attack,
    /// Decay phase: output falls from 1.0 toward the sustain level.
    Decay,
    /// Sustain phase: output holds at the sustain level while the note is held.
    Sustain,
    /// Release phase: output falls to zero after note-off.
    Release,
}

/// Linear ADSR envelope generator.
///
/// # Behavior
///
/// - Note-on from any stage restarts Attack from the current level, so a
///   retrigger never jumps.
/// - Note-off during Attack, Decay, or Sustain enters Release from the
///   current level.
/// - A stage whose duration is at most [`STAGE_EPSILON`] completes on the
///   same sample, and the next stage is evaluated in that sample too.
///
/// # Example
///
/// ```rust
/// use consumer_synth::{AdsrEnvelope, EnvelopeGenerator, EnvelopeStage};
///
/// let shape = AdsrEnvelope::new(0.01, 0.1, 0.7, 0.2);
/// let mut env = EnvelopeGenerator::new(48000.0);
///
/// env.note_on();
/// for _ in 0..1000 {
///     let level = env.advance(&shape);
///     assert!((0.0..=1.0).contains(&level));
/// }
///
/// env.note_off();
/// assert_eq!(env.stage(), EnvelopeStage::Release);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    stage: EnvelopeStage,
    level: f32,
    /// Level when release began; sets the release slope
    release_start: f32,
    sample_rate: f32,
}

impl Default for EnvelopeGenerator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl EnvelopeGenerator {
    /// Create an idle envelope generator at level 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_start: 0.0,
            sample_rate,
        }
    }

    /// Start (or restart) the attack from the current level.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Enter release from the current level.
    ///
    /// Has no effect while idle or already releasing.
    pub fn note_off(&mut self) {
        if matches!(
            self.stage,
            EnvelopeStage::Attack | EnvelopeStage::Decay | EnvelopeStage::Sustain
        ) {
            self.release_start = self.level;
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Return to idle at level 0.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_start = 0.0;
    }

    /// Current stage.
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Current output level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True unless the envelope is idle.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Advance one sample using `shape` and return the new level.
    #[inline]
    pub fn advance(&mut self, shape: &AdsrEnvelope) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => self.level = 0.0,
            EnvelopeStage::Attack => self.advance_attack(shape),
            EnvelopeStage::Decay => self.advance_decay(shape),
            EnvelopeStage::Sustain => self.level = shape.sustain,
            EnvelopeStage::Release => self.advance_release(shape),
        }
        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    fn advance_attack(&mut self, shape: &AdsrEnvelope) {
        if shape.attack <= STAGE_EPSILON {
            self.level = 1.0;
            self.stage = EnvelopeStage::Decay;
            self.advance_decay(shape);
            return;
        }

        self.level += 1.0 / (shape.attack * self.sample_rate);
        if self.level >= 1.0 {
            self.level = 1.0;
            self.stage = EnvelopeStage::Decay;
        }
    }

    fn advance_decay(&mut self, shape: &AdsrEnvelope) {
        let sustain = shape.sustain.clamp(0.0, 1.0);
        if shape.decay <= STAGE_EPSILON || self.level <= sustain {
            self.enter_sustain(sustain);
            return;
        }

        self.level -= (1.0 - sustain) / (shape.decay * self.sample_rate);
        if self.level <= sustain {
            self.enter_sustain(sustain);
        }
    }

    fn enter_sustain(&mut self, sustain: f32) {
        self.level = sustain;
        self.stage = EnvelopeStage::Sustain;
    }

    fn advance_release(&mut self, shape: &AdsrEnvelope) {
        if shape.release <= STAGE_EPSILON || self.release_start <= 0.0 {
            self.enter_idle();
            return;
        }

        self.level -= self.release_start / (shape.release * self.sample_rate);
        if self.level <= 0.0 {
            self.enter_idle();
        }
    }

    fn enter_idle(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Idle;
    }
}
