//! Per satellite data blocks
use crate::{
    fields::{is_blank, parse_field},
    EventFlags, ParsingError, Vector3D,
};
use hifitime::Epoch;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clock (or clock rate) values at or above this threshold mean "no data"
pub(crate) const BAD_CLOCK_VALUE: f64 = 999_999.0;

/// Satellite identifier, right after the record marker
pub(crate) const SATELLITE_COLUMNS: Range<usize> = 1..4;

/// (x, y, z) then clock value, in both P and V records
pub(crate) const VALUE_COLUMNS: [Range<usize>; 4] = [4..18, 18..32, 32..46, 46..60];

/// Std. dev. exponents of (x, y, z)
pub(crate) const SDEV_COLUMNS: [Range<usize>; 3] = [61..63, 64..66, 67..69];

/// Std. dev. exponent of the clock value
pub(crate) const CLOCK_SDEV_COLUMNS: Range<usize> = 70..73;

/// Index of the clock offset in [DataBlock::state]
pub(crate) const CLOCK: usize = 3;

/// Index of the first velocity component in [DataBlock::state]
pub(crate) const VELOCITY: usize = 4;

/// Index of the clock rate in [DataBlock::state]
pub(crate) const CLOCK_RATE: usize = 7;

/// One epoch of one satellite.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataBlock {
    /// Sampling instant
    pub epoch: Epoch,
    /// x, y, z (km), clock (us), vx, vy, vz (dm/s), clock rate (1e-4 us/s).
    /// A quantity may only be trusted when [Self::flags] does not mark it absent.
    pub state: [f64; 8],
    /// Standard deviations of [Self::state]: position (mm), clock (ps),
    /// velocity (1e-4 mm/s) and clock rate (1e-4 ps/s)
    pub state_sdev: [f64; 8],
    /// Availability and event flags
    pub flags: EventFlags,
}

impl DataBlock {
    /// Builds an empty block, every quantity marked absent.
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch,
            state: [0.0; 8],
            state_sdev: [0.0; 8],
            flags: EventFlags::PESSIMISTIC,
        }
    }
    /// Position (km), if available
    pub fn position_km(&self) -> Option<Vector3D> {
        if self.flags.is_set(EventFlags::ABSENT_POSITION) {
            None
        } else {
            Some((self.state[0], self.state[1], self.state[2]))
        }
    }
    /// Clock offset (us), if available
    pub fn clock_us(&self) -> Option<f64> {
        if self.flags.is_set(EventFlags::ABSENT_CLOCK) {
            None
        } else {
            Some(self.state[CLOCK])
        }
    }
    /// Velocity (dm/s), if available
    pub fn velocity_dm_s(&self) -> Option<Vector3D> {
        if self.flags.is_set(EventFlags::ABSENT_VELOCITY) {
            None
        } else {
            Some((
                self.state[VELOCITY],
                self.state[VELOCITY + 1],
                self.state[VELOCITY + 2],
            ))
        }
    }
    /// Clock rate (1e-4 us/s), if available
    pub fn clock_rate(&self) -> Option<f64> {
        if self.flags.is_set(EventFlags::ABSENT_CLOCK_RATE) {
            None
        } else {
            Some(self.state[CLOCK_RATE])
        }
    }
    /// Position standard deviation (mm), if available
    pub fn position_sdev_mm(&self) -> Option<Vector3D> {
        if self.flags.is_set(EventFlags::HAS_POSITION_STDDEV) {
            Some((self.state_sdev[0], self.state_sdev[1], self.state_sdev[2]))
        } else {
            None
        }
    }
    /// Clock standard deviation (ps), if available
    pub fn clock_sdev_ps(&self) -> Option<f64> {
        if self.flags.is_set(EventFlags::HAS_CLOCK_STDDEV) {
            Some(self.state_sdev[CLOCK])
        } else {
            None
        }
    }
    /// Velocity standard deviation (1e-4 mm/s), if available
    pub fn velocity_sdev(&self) -> Option<Vector3D> {
        if self.flags.is_set(EventFlags::HAS_VELOCITY_STDDEV) {
            Some((
                self.state_sdev[VELOCITY],
                self.state_sdev[VELOCITY + 1],
                self.state_sdev[VELOCITY + 2],
            ))
        } else {
            None
        }
    }
    /// Clock rate standard deviation (1e-4 ps/s), if available
    pub fn clock_rate_sdev(&self) -> Option<f64> {
        if self.flags.is_set(EventFlags::HAS_CLOCK_RATE_STDDEV) {
            Some(self.state_sdev[CLOCK_RATE])
        } else {
            None
        }
    }
}

/// Parses the 4 values of a P or V record.
pub(crate) fn parse_values(
    line: &str,
    vector_err: fn(String) -> ParsingError,
    clock_err: fn(String) -> ParsingError,
) -> Result<[f64; 4], ParsingError> {
    let mut values = [0.0_f64; 4];
    for (i, range) in VALUE_COLUMNS.iter().enumerate() {
        let err = if i == CLOCK { clock_err } else { vector_err };
        values[i] = parse_field(line, range.clone(), err)?;
    }
    Ok(values)
}

/// Decodes the optional std. dev. exponent located at `range` as `base^n`.
pub(crate) fn parse_sdev(
    line: &str,
    range: Range<usize>,
    base: f64,
) -> Result<Option<f64>, ParsingError> {
    if is_blank(line, range.clone()) {
        return Ok(None);
    }
    let exponent = parse_field::<i32>(line, range, ParsingError::StdDevExponent)?;
    Ok(Some(base.powi(exponent)))
}

/// Decodes the 3 vector std. dev. exponents, only when all of them are present.
pub(crate) fn parse_vector_sdev(line: &str, base: f64) -> Result<Option<[f64; 3]>, ParsingError> {
    let mut sdev = [0.0_f64; 3];
    for (i, range) in SDEV_COLUMNS.iter().enumerate() {
        match parse_sdev(line, range.clone(), base)? {
            Some(value) => sdev[i] = value,
            None => return Ok(None),
        }
    }
    Ok(Some(sdev))
}
