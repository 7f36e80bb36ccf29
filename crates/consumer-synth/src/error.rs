//! Error types for the control side of a synth channel.
//!
//! The render path never fails; these errors only surface from
//! [`SynthController`](crate::SynthController) operations.

use thiserror::Error;

/// Errors reported by the synth controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// Sample rate was zero, negative, or not finite
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Parameter index outside the patch table
    #[error("unknown parameter index: {0}")]
    UnknownParameter(usize),

    /// Parameter string ID not present in the patch table
    #[error("unknown parameter: {0}")]
    UnknownParameterName(String),

    /// The note queue is full; the renderer is not draining it
    #[error("note event queue is full")]
    EventQueueFull,

    /// The renderer has been dropped
    #[error("renderer disconnected")]
    Disconnected,
}

/// Result type for synth controller operations.
pub type Result<T> = std::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SynthError::InvalidSampleRate(0.0).to_string(),
            "invalid sample rate: 0 Hz"
        );
        assert_eq!(
            SynthError::UnknownParameter(99).to_string(),
            "unknown parameter index: 99"
        );
        assert_eq!(
            SynthError::UnknownParameterName("volume".into()).to_string(),
            "unknown parameter: volume"
        );
    }
}
