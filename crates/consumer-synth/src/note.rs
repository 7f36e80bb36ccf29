//! Pitch index with a note-off sentinel.

use consumer_core::note_to_freq;

/// A pitch index in twelve-tone equal temperament (69 = A4 = 440 Hz).
///
/// [`Note::OFF`] means "no note held". It never maps to a pitch:
/// [`frequency`](Self::frequency) returns `None` for it.
///
/// ```rust
/// use consumer_synth::Note;
///
/// assert!((Note(69).frequency().unwrap() - 440.0).abs() < 1e-3);
/// assert_eq!(Note::OFF.frequency(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Note(pub i32);

impl Note {
    /// The "no note held" sentinel.
    pub const OFF: Note = Note(-1);

    /// True for the [`Note::OFF`] sentinel.
    pub const fn is_off(self) -> bool {
        self.0 == Self::OFF.0
    }

    /// Frequency in Hz, or `None` for [`Note::OFF`].
    pub fn frequency(self) -> Option<f32> {
        if self.is_off() {
            None
        } else {
            Some(note_to_freq(self.0))
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::OFF
    }
}

impl From<i32> for Note {
    fn from(index: i32) -> Self {
        Self(index)
    }
}
