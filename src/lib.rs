//! IGS SP3 precise ephemeris reader and satellite state interpolation.
//!
//! [EphemerisReader] parses the SP3-c/d header once and then walks the
//! data section one epoch at a time, for one satellite at a time.
//! [SatelliteInterpolator] extracts a single satellite time series and
//! evaluates its position (and velocity) at any instant within the
//! file span, using Neville's algorithm over a sliding window.
#![cfg_attr(docsrs, feature(doc_cfg))]
extern crate gnss_rs as gnss;

use hifitime::Epoch;
use thiserror::Error;

#[cfg(test)]
mod tests;

mod cursor;
mod ephemeris;
mod epoch;
mod fields;
mod flags;
mod header;
mod interpolation;
mod position;
mod reader;
mod record;
mod satellite;
mod velocity;
mod version;

pub use cursor::{CursorStatus, ReaderCursor};
pub use ephemeris::EphemerisReader;
pub use flags::EventFlags;
pub use header::{DataType, Header};
pub use interpolation::{
    neville::{interpolate, interpolate3, neville_interpolation, neville_interpolation3, Tableau},
    Interpolation, InterpolationOptions, SatelliteInterpolator,
};
pub use reader::BufferedReader;
pub use record::DataBlock;
pub use satellite::SatelliteId;
pub use version::Version;

/// 3D vector, usually (x, y, z) coordinates
pub type Vector3D = (f64, f64, f64);

pub mod prelude {
    pub use crate::{
        CursorStatus, DataBlock, DataType, EphemerisReader, Error, EventFlags, Header,
        Interpolation, InterpolationError, InterpolationOptions, ParsingError, ReaderCursor,
        SatelliteId, SatelliteInterpolator, Vector3D, Version,
    };
    // Pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
}

/// Field level parsing errors. Each variant identifies the field
/// that could not be decoded and carries the offending content.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("line too short: missing columns {start}..{end} in \"{line}\"")]
    MissingColumns {
        line: String,
        start: usize,
        end: usize,
    },
    #[error("expected \"{expected}\" marker, found \"{found}\"")]
    UnexpectedMarker {
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of file")]
    UnexpectedEnd,
    #[error("section exceeds {0} lines")]
    TooManyLines(usize),
    #[error("unknown or non supported revision \"{0}\"")]
    UnknownVersion(String),
    #[error("unknown data type \"{0}\"")]
    UnknownDataType(String),
    #[error("unknown time system \"{0}\"")]
    UnknownTimeSystem(String),
    #[error("failed to parse epoch year from \"{0}\"")]
    EpochYear(String),
    #[error("failed to parse epoch month from \"{0}\"")]
    EpochMonth(String),
    #[error("failed to parse epoch day from \"{0}\"")]
    EpochDay(String),
    #[error("failed to parse epoch hours from \"{0}\"")]
    EpochHours(String),
    #[error("failed to parse epoch minutes from \"{0}\"")]
    EpochMinutes(String),
    #[error("failed to parse epoch seconds from \"{0}\"")]
    EpochSeconds(String),
    #[error("invalid calendar date {0}")]
    InvalidEpoch(String),
    #[error("failed to parse number of epochs \"{0}\"")]
    NumberEpochs(String),
    #[error("failed to parse week counter \"{0}\"")]
    WeekCounter(String),
    #[error("failed to parse seconds of week \"{0}\"")]
    SecondsOfWeek(String),
    #[error("failed to parse sample rate from \"{0}\"")]
    EpochInterval(String),
    #[error("failed to parse mjd start \"{0}\"")]
    Mjd(String),
    #[error("failed to parse mjd fraction \"{0}\"")]
    MjdFraction(String),
    #[error("failed to parse number of satellites \"{0}\"")]
    NumberSatellites(String),
    #[error("invalid std. dev. exponent base \"{0}\"")]
    ExponentBase(String),
    #[error("failed to parse (x, y, or z) coordinates from \"{0}\"")]
    Coordinates(String),
    #[error("failed to parse clock data from \"{0}\"")]
    Clock(String),
    #[error("failed to parse (x, y, or z) velocity from \"{0}\"")]
    Velocity(String),
    #[error("failed to parse clock rate from \"{0}\"")]
    ClockRate(String),
    #[error("failed to parse std. dev. exponent from \"{0}\"")]
    StdDevExponent(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file i/o error")]
    IoError(#[from] std::io::Error),
    #[error("header line #1: {0}")]
    HeaderLine1(ParsingError),
    #[error("header line #2: {0}")]
    HeaderLine2(ParsingError),
    #[error(
        "start epoch is ({computed_week}, {computed_sow}) in week counter, header declares ({declared_week}, {declared_sow})"
    )]
    WeekCounterMismatch {
        computed_week: u32,
        computed_sow: f64,
        declared_week: u32,
        declared_sow: f64,
    },
    #[error("start epoch is MJD {computed:?}, header declares {declared:?}")]
    MjdMismatch {
        computed: (u32, f64),
        declared: (u32, f64),
    },
    #[error("satellite id block: {0}")]
    SatelliteBlock(ParsingError),
    #[error("satellite accuracy block: {0}")]
    AccuracyBlock(ParsingError),
    #[error("time system block: {0}")]
    TimeSystemBlock(ParsingError),
    #[error("std. dev. exponent base block: {0}")]
    ExponentBaseBlock(ParsingError),
    #[error("integer parameters block: {0}")]
    IntegerBlock(ParsingError),
    #[error("comment block: {0}")]
    CommentBlock(ParsingError),
    #[error("unexpected line \"{0}\"")]
    UnexpectedLine(String),
    #[error("epoch record: {0}")]
    EpochRecord(ParsingError),
    #[error("position record: {0}")]
    PositionRecord(ParsingError),
    #[error("velocity record: {0}")]
    VelocityRecord(ParsingError),
    #[error("satellite {0} is not declared in this file")]
    UnknownSatellite(SatelliteId),
    #[error("no usable position or clock data for satellite {0}")]
    EmptyTimeSeries(SatelliteId),
    #[error("{0} precedes the first epoch of this file")]
    TargetPrecedesData(Epoch),
}

/// Errors returned by the interpolation routines. None of them
/// alters the interpolator state: the caller may retry at another instant.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InterpolationError {
    #[error("{required} samples required from index {from}, only {available} available")]
    NotEnoughSamples {
        required: usize,
        from: usize,
        available: usize,
    },
    #[error("two sample instants coincide")]
    CoincidentAbscissas,
    #[error("too few samples before requested instant ({found}/{required})")]
    TooFewPointsBefore { found: usize, required: usize },
    #[error("too few samples after requested instant ({found}/{required})")]
    TooFewPointsAfter { found: usize, required: usize },
    #[error("position is missing within the interpolation window")]
    MissingPosition,
    #[error("velocity is missing within the interpolation window")]
    MissingVelocity,
}
