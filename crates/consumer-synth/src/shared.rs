//! Lock-free patch and note hand-off between the control and audio threads.
//!
//! [`SharedPatch`] is a single-writer sequence lock over the flat patch
//! values. The writer makes the sequence odd, stores every value, then makes
//! it even again. The reader only accepts a copy whose sequence was even and
//! unchanged across the whole read, so it never sees a half-written patch.
//! A rejected read keeps the previous snapshot and reports
//! [`PatchRead::Busy`] so the caller can retry or hold back work that must
//! follow the newest patch.
//!
//! Note events travel separately over a bounded `crossbeam-channel` queue.

use std::sync::atomic::{AtomicU64, Ordering, fence};

use consumer_core::AtomicF32;

use crate::note::Note;
use crate::patch::{ChannelParameters, PARAM_COUNT};

/// Capacity of the note event queue.
pub const NOTE_QUEUE_CAPACITY: usize = 64;

/// A note event queued for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEvent {
    /// Start a note.
    On(Note),
    /// Release the held note.
    Off,
}

/// Outcome of [`SharedPatch::read_if_changed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchRead {
    /// A newer complete patch was copied out.
    Updated,
    /// Nothing was published since the last accepted read.
    Unchanged,
    /// A write was in progress or overlapped the read.
    Busy,
}

/// Seqlock-protected patch values.
///
/// Exactly one thread may call [`publish`](Self::publish).
#[derive(Debug)]
pub struct SharedPatch {
    sequence: AtomicU64,
    values: [AtomicF32; PARAM_COUNT],
}

impl SharedPatch {
    /// Create with an initial patch at sequence 0.
    pub fn new(initial: &ChannelParameters) -> Self {
        let values = initial.to_values();
        Self {
            sequence: AtomicU64::new(0),
            values: core::array::from_fn(|i| AtomicF32::new(values[i])),
        }
    }

    /// Store a complete patch.
    pub fn publish(&self, params: &ChannelParameters) {
        let seq = self.begin_write();
        for (slot, value) in self.values.iter().zip(params.to_values()) {
            slot.store(value, Ordering::Relaxed);
        }
        self.end_write(seq);
    }

    /// Make the sequence odd. Returns the even sequence it started from.
    pub(crate) fn begin_write(&self) -> u64 {
        let seq = self.sequence.load(Ordering::Relaxed);
        self.sequence.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        seq
    }

    /// Close a write opened by [`begin_write`](Self::begin_write).
    pub(crate) fn end_write(&self, seq: u64) {
        self.sequence.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Copy the patch into `out` if a newer complete one is available.
    ///
    /// `last_sequence` is the caller's record of the last accepted sequence.
    /// `out` is only written on [`PatchRead::Updated`].
    pub fn read_if_changed(
        &self,
        last_sequence: &mut u64,
        out: &mut ChannelParameters,
    ) -> PatchRead {
        let before = self.sequence.load(Ordering::Acquire);
        if before & 1 == 1 {
            return PatchRead::Busy;
        }
        if before == *last_sequence {
            return PatchRead::Unchanged;
        }

        let values: [f32; PARAM_COUNT] =
            core::array::from_fn(|i| self.values[i].load(Ordering::Relaxed));

        fence(Ordering::Acquire);
        let after = self.sequence.load(Ordering::Relaxed);
        if after != before {
            return PatchRead::Busy;
        }

        *last_sequence = before;
        *out = ChannelParameters::from_values(&values);
        PatchRead::Updated
    }

    /// Current sequence number. Even when no write is in progress.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }
}
