//! Data block status flags
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Describes which quantities of a [crate::DataBlock] are meaningful
    /// and which events the producer reported for that epoch.
    #[derive(Debug, Copy, Clone)]
    #[derive(PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct EventFlags: u16 {
        /// Position is missing or was reported as bad (zero)
        const ABSENT_POSITION = 0x0001;
        /// Clock offset is missing or was reported as bad
        const ABSENT_CLOCK = 0x0002;
        /// Discontinuity in the satellite clock
        const CLOCK_EVENT = 0x0004;
        /// Clock offset is predicted rather than estimated
        const CLOCK_PREDICTION = 0x0008;
        /// Satellite was maneuvering during or right before this epoch
        const MANEUVER = 0x0010;
        /// Orbit is predicted rather than estimated
        const ORBIT_PREDICTION = 0x0020;
        /// Position standard deviations are available
        const HAS_POSITION_STDDEV = 0x0040;
        /// Clock standard deviation is available
        const HAS_CLOCK_STDDEV = 0x0080;
        /// Velocity is missing or was reported as bad (zero)
        const ABSENT_VELOCITY = 0x0100;
        /// Clock rate is missing or was reported as bad
        const ABSENT_CLOCK_RATE = 0x0200;
        /// Velocity standard deviations are available
        const HAS_VELOCITY_STDDEV = 0x0400;
        /// Clock rate standard deviation is available
        const HAS_CLOCK_RATE_STDDEV = 0x0800;
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl EventFlags {
    /// State of a block prior to any parsing: everything absent.
    pub const PESSIMISTIC: Self = Self::ABSENT_POSITION
        .union(Self::ABSENT_CLOCK)
        .union(Self::ABSENT_VELOCITY)
        .union(Self::ABSENT_CLOCK_RATE);

    /// Clears all flags.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }
    /// Sets the pessimistic defaults: all quantities absent,
    /// no event and no standard deviation.
    pub fn reset_to_pessimistic_defaults(&mut self) {
        *self = Self::PESSIMISTIC;
    }
    /// True when all `other` flags are set.
    pub fn is_set(&self, other: Self) -> bool {
        self.contains(other)
    }
    /// True when no flag is set.
    pub fn is_clean(&self) -> bool {
        self.is_empty()
    }
}
