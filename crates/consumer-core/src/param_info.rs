//! Parameter introspection for discoverable patch parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! enable runtime discovery and manipulation of a patch's parameters by index.
//! The controller uses it to validate values at the control boundary, the
//! shared patch store uses the indices as slot numbers, and hosts use the
//! descriptors to build generic editors or CLI listings.
//!
//! # Design
//!
//! Each parameter is described by a [`ParamDescriptor`] containing metadata for
//! display and validation:
//!
//! - [`ParamId`] - stable numeric ID that survives reordering
//! - [`ParamFlags`] - capability flags (automatable, stepped)
//! - `string_id` - human-readable stable ID used on the command line
//! - `group` - parameter grouping for display
//!
//! Discrete parameters (waveforms, octaves, switches) are carried as `f32`
//! values on integer steps and flagged [`ParamFlags::STEPPED`]; [`clamp`]
//! rounds them to the nearest step.
//!
//! [`clamp`]: ParamDescriptor::clamp
//!
//! # Example
//!
//! ```rust
//! use consumer_core::{ParameterInfo, ParamDescriptor, ParamUnit, ParamId};
//!
//! struct Gain {
//!     level: f32,
//! }
//!
//! impl ParameterInfo for Gain {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::continuous("Level", "Level", ParamUnit::None, 0.0, 1.0, 0.5)
//!                 .with_id(ParamId(1), "level")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.level,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.level = desc.clamp(value);
//!         }
//!     }
//! }
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// Use [`union`](Self::union) to combine.
///
/// # Example
///
/// ```rust
/// use consumer_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Parameter may be changed while audio is running (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps (enum-like values, switches).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Index-based access to a parameter set.
///
/// Implementors expose a fixed number of parameters, each described by a
/// [`ParamDescriptor`]. Out-of-range indices are never an error at this
/// level: getters return `0.0`, setters ignore the call.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index` (`0.0` if out of range).
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index`, clamped to its range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by its string ID (case-insensitive).
    ///
    /// Scans all parameters; intended for setup paths, not audio.
    fn find_param_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i)
                .is_some_and(|d| d.string_id.eq_ignore_ascii_case(string_id))
        })
    }

    /// Find a parameter index by its stable [`ParamId`].
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Filter Cutoff").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters (e.g., "Cutoff").
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Default value.
    pub default: f32,

    /// Recommended step increment (`1.0` for stepped parameters).
    pub step: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID, e.g. `"filter_cutoff"`.
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,

    /// Parameter group for display (e.g., `"osc1"`, `"filter"`).
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Continuous parameter with custom name, unit, and range.
    pub const fn continuous(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            group: "",
        }
    }

    /// Stepped (integer-valued) parameter, e.g. a waveform selector.
    pub const fn stepped(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            group: "",
        }
    }

    /// On/off switch (0.0 or 1.0).
    pub const fn toggle(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self::stepped(name, short_name, 0.0, 1.0, if default { 1.0 } else { 0.0 })
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use consumer_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::toggle("Hard Sync", "Sync", false).with_id(ParamId(25), "hard_sync");
    /// assert_eq!(desc.id, ParamId(25));
    /// assert_eq!(desc.string_id, "hard_sync");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the parameter group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Whether the parameter only takes integer steps.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// Non-finite values fall back to the default. Stepped parameters are
    /// rounded to the nearest integer step.
    ///
    /// # Example
    ///
    /// ```rust
    /// use consumer_core::{ParamDescriptor, ParamUnit};
    ///
    /// let desc = ParamDescriptor::continuous("Detune", "Detune", ParamUnit::Semitones, -1.0, 1.0, 0.0);
    /// assert_eq!(desc.clamp(0.5), 0.5);
    /// assert_eq!(desc.clamp(-3.0), -1.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        let value = if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        };
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) - LFO rate.
    Hertz,

    /// Seconds - envelope stage times.
    Seconds,

    /// Semitones - oscillator detune (full scale = one semitone).
    Semitones,

    /// Octaves - oscillator octave shift.
    Octaves,

    /// No unit - normalized or dimensionless parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use consumer_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Semitones => " st",
            ParamUnit::Octaves => " oct",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPatch {
        level: f32,
        mode: f32,
    }

    impl ParameterInfo for TestPatch {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::continuous("Level", "Level", ParamUnit::None, 0.0, 1.0, 0.5)
                        .with_id(ParamId(10), "level"),
                ),
                1 => Some(
                    ParamDescriptor::stepped("Mode", "Mode", 0.0, 3.0, 0.0)
                        .with_id(ParamId(11), "mode"),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.level,
                1 => self.mode,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            match index {
                0 => self.level = desc.clamp(value),
                1 => self.mode = desc.clamp(value),
                _ => {}
            }
        }
    }

    #[test]
    fn test_find_by_string_id_is_case_insensitive() {
        let patch = TestPatch { level: 0.5, mode: 0.0 };
        assert_eq!(patch.find_param_by_string_id("LEVEL"), Some(0));
        assert_eq!(patch.find_param_by_string_id("mode"), Some(1));
        assert_eq!(patch.find_param_by_string_id("missing"), None);
    }

    #[test]
    fn test_find_by_param_id() {
        let patch = TestPatch { level: 0.5, mode: 0.0 };
        assert_eq!(patch.param_index_by_id(ParamId(11)), Some(1));
        assert_eq!(patch.param_index_by_id(ParamId(99)), None);
    }

    #[test]
    fn test_set_param_clamps_and_rounds() {
        let mut patch = TestPatch { level: 0.5, mode: 0.0 };
        patch.set_param(0, 4.0);
        assert_eq!(patch.get_param(0), 1.0);
        patch.set_param(1, 2.6);
        assert_eq!(patch.get_param(1), 3.0);
        patch.set_param(1, -7.0);
        assert_eq!(patch.get_param(1), 0.0);
        // Out-of-range index is ignored
        patch.set_param(5, 1.0);
        assert_eq!(patch.get_param(5), 0.0);
    }

    #[test]
    fn test_clamp_non_finite_falls_back_to_default() {
        let desc = ParamDescriptor::continuous("Level", "Level", ParamUnit::None, 0.0, 1.0, 0.25);
        assert_eq!(desc.clamp(f32::NAN), 0.25);
        assert_eq!(desc.clamp(f32::INFINITY), 0.25);
    }

    #[test]
    fn test_toggle_descriptor() {
        let on = ParamDescriptor::toggle("Sync", "Sync", true);
        assert_eq!(on.default, 1.0);
        assert!(on.is_stepped());
        assert_eq!(on.clamp(0.4), 0.0);
        assert_eq!(on.clamp(0.6), 1.0);
    }

    #[test]
    fn test_flags() {
        let flags = ParamFlags::default();
        assert!(flags.contains(ParamFlags::AUTOMATABLE));
        assert!(!flags.contains(ParamFlags::STEPPED));
        assert!(ParamFlags::NONE.union(ParamFlags::STEPPED).contains(ParamFlags::STEPPED));
    }
}
