//! Calendar dates, as described in header line #1 and epoch records
use crate::{
    fields::{column, parse_field},
    ParsingError,
};
use hifitime::{Duration, Epoch, TimeScale};

const NANOSECONDS_PER_SECOND: u64 = 1_000_000_000;

/// Broken down calendar date. Header line #1 and epoch records share
/// the same column layout: both lines start with a 3 character marker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Calendar {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: f64,
}

impl Calendar {
    pub(crate) fn parse(line: &str) -> Result<Self, ParsingError> {
        let year = parse_field::<i32>(line, 3..7, ParsingError::EpochYear)?;
        let month = parse_field::<u8>(line, 8..10, ParsingError::EpochMonth)?;
        let day = parse_field::<u8>(line, 11..13, ParsingError::EpochDay)?;
        let hours = parse_field::<u8>(line, 14..16, ParsingError::EpochHours)?;
        let minutes = parse_field::<u8>(line, 17..19, ParsingError::EpochMinutes)?;
        let seconds = parse_field::<f64>(line, 20..31, ParsingError::EpochSeconds)?;
        if !(0.0..=60.0).contains(&seconds) {
            let raw = column(line, 20..31)?;
            return Err(ParsingError::EpochSeconds(raw.to_string()));
        }
        Ok(Self {
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
        })
    }

    /// Seconds field, rounded to the nanosecond.
    fn nanoseconds(&self) -> u64 {
        (self.seconds * 1.0E9).round() as u64
    }

    /// Converts to [Epoch] expressed in `ts`.
    pub(crate) fn to_epoch(&self, ts: TimeScale) -> Result<Epoch, ParsingError> {
        let minute = Epoch::maybe_from_gregorian(
            self.year,
            self.month,
            self.day,
            self.hours,
            self.minutes,
            0,
            0,
            ts,
        )
        .map_err(|e| ParsingError::InvalidEpoch(format!("{:?}: {}", self, e)))?;
        Ok(minute + Duration::from_total_nanoseconds(self.nanoseconds() as i128))
    }

    /// (week, seconds of week) of this date interpreted in GPST.
    pub(crate) fn gpst_time_of_week(&self) -> Result<(u32, f64), ParsingError> {
        let epoch = self.to_epoch(TimeScale::GPST)?;
        let (week, nanos) = epoch.to_time_of_week();
        let seconds = (nanos / NANOSECONDS_PER_SECOND) as f64
            + (nanos % NANOSECONDS_PER_SECOND) as f64 * 1.0E-9;
        Ok((week, seconds))
    }

    /// (integer MJD, fraction of day) of this date.
    pub(crate) fn mjd(&self) -> Result<(u32, f64), ParsingError> {
        let midnight = Epoch::maybe_from_gregorian(
            self.year,
            self.month,
            self.day,
            0,
            0,
            0,
            0,
            TimeScale::UTC,
        )
        .map_err(|e| ParsingError::InvalidEpoch(format!("{:?}: {}", self, e)))?;
        let day = midnight.to_mjd_utc_days().round() as u32;
        let nanos = self.nanoseconds()
            + (self.hours as u64 * 3600 + self.minutes as u64 * 60) * NANOSECONDS_PER_SECOND;
        let fraction = nanos as f64 / (86_400.0 * 1.0E9);
        Ok((day, fraction))
    }
}
