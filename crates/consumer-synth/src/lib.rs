//! Consumer Synth - monophonic subtractive synth voice
//!
//! This crate provides one synth voice (two oscillators, an amplitude and a
//! filter envelope, a resonant low-pass filter, glide, and an LFO) rendered
//! one sample at a time, plus a lock-free controller for driving it from
//! another thread.
//!
//! # Core Components
//!
//! ## Voice Building Blocks
//!
//! - [`Oscillator`] / [`Waveform`] - Phase accumulator with sine, square, triangle, saw
//! - [`EnvelopeGenerator`] / [`AdsrEnvelope`] - Linear ADSR state machine
//! - [`Filter`] - TPT state-variable low-pass with envelope and LFO cutoff modulation
//! - [`GlideRamp`] - One-pole portamento
//! - [`Lfo`] - Sine/triangle modulation routed to pitch, filter, or both
//!
//! ## The Channel
//!
//! - [`SynthChannel`] - Advances every component in lock-step per sample
//! - [`ChannelParameters`] - The patch, addressable by field or by index
//! - [`Note`] - Pitch index with the [`Note::OFF`] sentinel
//!
//! ```rust
//! use consumer_synth::{ChannelParameters, Note, SynthChannel, Waveform};
//!
//! let mut patch = ChannelParameters::default();
//! patch.osc1.waveform = Waveform::Square;
//! patch.filter.cutoff = 0.4;
//!
//! let mut channel = SynthChannel::new(48000.0);
//! channel.set_parameters(&patch.sanitized());
//! channel.note_on(Note(60));
//!
//! let sample = channel.render_sample();
//! assert!((-1.0..=1.0).contains(&sample));
//! ```
//!
//! ## Threading (requires `std`)
//!
//! - [`SynthController`] - Control-thread patch owner and note sender
//! - [`ChannelRenderer`] - Audio-thread side; never blocks or allocates
//! - [`SharedPatch`] - Seqlock over the flat patch values
//!
//! # no_std Support
//!
//! Everything except the threading types is `no_std` compatible. Disable
//! the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! consumer-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod channel;
pub mod envelope;
pub mod filter;
pub mod glide;
pub mod lfo;
pub mod note;
pub mod oscillator;
pub mod patch;

#[cfg(feature = "std")]
pub mod controller;
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod shared;

pub use channel::{MIX_HEADROOM, SynthChannel};
pub use envelope::{AdsrEnvelope, EnvelopeGenerator, EnvelopeStage, STAGE_EPSILON};
pub use filter::{Filter, OUTPUT_KNEE, Q_CEILING};
pub use glide::{GLIDE_MAX_SECONDS, GLIDE_SNAP_HZ, GlideRamp};
pub use lfo::{LFO_PITCH_SEMITONES, Lfo, LfoDestination, LfoShape};
pub use note::Note;
pub use oscillator::{DETUNE_SEMITONES, Oscillator, Waveform};
pub use patch::{
    ChannelParameters, EffectSends, FilterParams, LfoParams, OscillatorParams, PARAM_COUNT,
    PARAM_DESCRIPTORS,
};

#[cfg(feature = "std")]
pub use controller::{ChannelRenderer, SynthController};
#[cfg(feature = "std")]
pub use error::{Result, SynthError};
#[cfg(feature = "std")]
pub use shared::{NOTE_QUEUE_CAPACITY, NoteEvent, PatchRead, SharedPatch};

// Re-export core types used in the public API
pub use consumer_core::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
