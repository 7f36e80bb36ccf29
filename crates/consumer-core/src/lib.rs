//! Consumer Core - DSP primitives for the consumer synth voice
//!
//! This crate provides the foundational pieces shared by the synthesizer
//! engine and its hosts, designed for real-time audio with zero allocation
//! in the audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Introspection
//!
//! - [`ParameterInfo`] - Index-based access to a parameter set
//! - [`ParamDescriptor`] - Range, default, unit, and IDs for one parameter
//!
//! ## Thread Sharing
//!
//! - [`AtomicF32`] - Lock-free float cell for control → audio thread values
//!
//! ## Utilities
//!
//! - Pitch: [`note_to_freq`], [`semitones_to_ratio`]
//! - Buffers: [`clamp_channel`], [`clamp_stereo`]
//! - Misc: [`tick_length`], [`floats_are_equal`], [`flush_denormal`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! consumer-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod atomic;
pub mod math;
pub mod param_info;

pub use atomic::AtomicF32;
pub use math::{
    A4_FREQUENCY, A4_NOTE, FLOAT_EPSILON, clamp_channel, clamp_stereo, floats_are_equal,
    flush_denormal, note_to_freq, semitones_to_ratio, soft_limit, tick_length,
};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
