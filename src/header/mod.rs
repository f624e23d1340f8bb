//! header parsing utilities
pub(crate) mod line1;
pub(crate) mod line2;

use crate::{
    epoch::Calendar,
    fields::{column, label, parse_field},
    reader::next_line,
    Error, ParsingError, SatelliteId, Version,
};

use gnss::prelude::Constellation;
use hifitime::{Duration, Epoch, TimeScale};
use itertools::Itertools;
use line1::Line1;
use line2::Line2;
use std::io::{BufRead, Seek, SeekFrom};
use std::str::FromStr;

#[cfg(feature = "log")]
use log::{debug, error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimal number of lines in the satellite and accuracy blocks
const MIN_BLOCK_LINES: usize = 5;

/// Upper bound on any repeated header section, malformed files
/// must not keep us looping
const MAX_SECTION_LINES: usize = 1000;

/// Satellite identifiers per "+ " line
const SATELLITES_PER_LINE: usize = 17;

/// Column of the first satellite identifier in "+ " lines
const FIRST_SATELLITE_COLUMN: usize = 9;

/// Tolerance on the declared seconds of week
const SOW_TOLERANCE_SECONDS: f64 = 1.0E-9;

/// Tolerance on the declared fraction of day
const MJD_FRACTION_TOLERANCE: f64 = 1.0E-12;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    /// Positions and clock offsets only
    #[default]
    Position,
    /// Velocities and clock rates are provided as well
    Velocity,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("P"),
            Self::Velocity => f.write_str("V"),
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Self::Position),
            "V" => Ok(Self::Velocity),
            _ => Err(ParsingError::UnknownDataType(s.to_string())),
        }
    }
}

/// Maps the `%c` time system label onto a [TimeScale].
fn timescale(label: &str) -> Result<TimeScale, ParsingError> {
    match label {
        "GPS" => Ok(TimeScale::GPST),
        "GAL" => Ok(TimeScale::GST),
        "BDT" => Ok(TimeScale::BDT),
        "QZS" => Ok(TimeScale::QZSST),
        "TAI" => Ok(TimeScale::TAI),
        "UTC" | "GLO" => Ok(TimeScale::UTC),
        _ => Err(ParsingError::UnknownTimeSystem(label.to_string())),
    }
}

/// SP3 file header
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// File revision as [Version]
    pub version: Version,
    /// [DataType] used in this file.
    /// [DataType::Velocity] means velocity records are to be expected.
    pub data_type: DataType,
    /// Datetime of the first epoch, in [Self::timescale]
    pub start_epoch: Epoch,
    /// Number of epochs declared in this file
    pub num_epochs: u32,
    /// Type of observations used in the fit
    pub data_used: String,
    /// Coordinates system description
    pub coord_system: String,
    /// Orbit type used in the fitting process prior publication
    pub orbit_type: String,
    /// Agency providing this file
    pub agency: String,
    /// Declared (GPS week, seconds of week) of the first epoch
    pub week_counter: (u32, f64),
    /// Declared (MJD, fraction of day) of the first epoch
    pub mjd_start: (u32, f64),
    /// Nominal sampling interval
    pub epoch_interval: Duration,
    /// Satellites to be found in this file, in declaration order
    pub satellites: Vec<SatelliteId>,
    /// File type label of the first `%c` line ("G", "M"..)
    pub file_type: String,
    /// Time system label of the first `%c` line
    pub time_system: String,
    /// [TimeScale] that applies to all epochs of this file
    pub timescale: TimeScale,
    /// Base of position and velocity standard deviation exponents
    pub position_base: f64,
    /// Base of clock and clock rate standard deviation exponents
    pub clock_base: f64,
    /// Header comments, without their marker
    pub comments: Vec<String>,
}

/// Reads the next line, which must exist.
fn expect_line<R: BufRead>(reader: &mut R, buf: &mut String) -> Result<(), ParsingError> {
    match next_line(reader, buf) {
        Ok(true) => Ok(()),
        _ => Err(ParsingError::UnexpectedEnd),
    }
}

/// Reads the next line and verifies its marker.
fn expect_marker<R: BufRead>(
    reader: &mut R,
    buf: &mut String,
    marker: &'static str,
) -> Result<(), ParsingError> {
    expect_line(reader, buf)?;
    if buf.starts_with(marker) {
        Ok(())
    } else {
        Err(ParsingError::UnexpectedMarker {
            expected: marker,
            found: buf.to_string(),
        })
    }
}

/// Consumes the next line if it starts with `marker`,
/// otherwise the stream is left untouched.
fn next_line_if<R: BufRead + Seek>(
    reader: &mut R,
    buf: &mut String,
    marker: &str,
) -> std::io::Result<bool> {
    let position = reader.stream_position()?;
    if next_line(reader, buf)? && buf.starts_with(marker) {
        Ok(true)
    } else {
        reader.seek(SeekFrom::Start(position))?;
        Ok(false)
    }
}

impl Header {
    /// Parses all header sections, in order, and leaves `reader`
    /// at the first line of the data section.
    pub(crate) fn parse<R: BufRead + Seek>(reader: &mut R) -> Result<Self, Error> {
        let mut buf = String::with_capacity(128);

        expect_line(reader, &mut buf).map_err(Error::HeaderLine1)?;
        let line1 = Line1::from_str(&buf).map_err(Error::HeaderLine1)?;

        expect_line(reader, &mut buf).map_err(Error::HeaderLine2)?;
        let line2 = Line2::from_str(&buf).map_err(Error::HeaderLine2)?;
        Self::cross_validate(&line1.calendar, &line2)?;

        let satellites = Self::parse_satellites(reader, &mut buf)?;
        Self::parse_accuracy(reader, &mut buf)?;

        // %c: file type and time system, then a placeholder line
        expect_marker(reader, &mut buf, "%c").map_err(Error::TimeSystemBlock)?;
        let file_type = label(&buf, 3..5);
        let time_system = column(&buf, 9..12)
            .map(|s| s.trim().to_string())
            .map_err(Error::TimeSystemBlock)?;
        let timescale = timescale(&time_system).map_err(Error::TimeSystemBlock)?;
        expect_marker(reader, &mut buf, "%c").map_err(Error::TimeSystemBlock)?;

        // %f: std. dev. exponent bases, the second line is optional
        expect_marker(reader, &mut buf, "%f").map_err(Error::ExponentBaseBlock)?;
        let position_base = parse_field::<f64>(&buf, 3..13, ParsingError::ExponentBase)
            .map_err(Error::ExponentBaseBlock)?;
        let clock_base = parse_field::<f64>(&buf, 14..26, ParsingError::ExponentBase)
            .map_err(Error::ExponentBaseBlock)?;
        for base in [position_base, clock_base] {
            if base.is_nan() || base <= 0.0 {
                return Err(Error::ExponentBaseBlock(ParsingError::ExponentBase(
                    base.to_string(),
                )));
            }
        }
        next_line_if(reader, &mut buf, "%f")?;

        for _ in 0..2 {
            expect_marker(reader, &mut buf, "%i").map_err(Error::IntegerBlock)?;
        }

        let mut comments = Vec::new();
        while next_line_if(reader, &mut buf, "/*")? {
            if comments.len() == MAX_SECTION_LINES {
                return Err(Error::CommentBlock(ParsingError::TooManyLines(
                    MAX_SECTION_LINES,
                )));
            }
            comments.push(buf[2..].trim().to_string());
        }

        let start_epoch = line1
            .calendar
            .to_epoch(timescale)
            .map_err(Error::HeaderLine1)?;

        #[cfg(feature = "log")]
        debug!(
            "sp3-{} {} {} - {} satellites - {} epochs",
            line1.version,
            line1.agency,
            start_epoch,
            satellites.len(),
            line1.num_epochs
        );

        Ok(Self {
            version: line1.version,
            data_type: line1.data_type,
            start_epoch,
            num_epochs: line1.num_epochs,
            data_used: line1.data_used,
            coord_system: line1.coord_system,
            orbit_type: line1.orbit_type,
            agency: line1.agency,
            week_counter: line2.week_counter,
            mjd_start: line2.mjd,
            epoch_interval: line2.epoch_interval,
            satellites,
            file_type,
            time_system,
            timescale,
            position_base,
            clock_base,
            comments,
        })
    }

    /// Verifies the declared week counter and MJD against line #1.
    fn cross_validate(calendar: &Calendar, line2: &Line2) -> Result<(), Error> {
        let (week, sow) = calendar.gpst_time_of_week().map_err(Error::HeaderLine1)?;
        let (declared_week, declared_sow) = line2.week_counter;
        if week != declared_week || (sow - declared_sow).abs() > SOW_TOLERANCE_SECONDS {
            #[cfg(feature = "log")]
            error!("week counter mismatch: ({}, {}) declared", declared_week, declared_sow);
            return Err(Error::WeekCounterMismatch {
                computed_week: week,
                computed_sow: sow,
                declared_week,
                declared_sow,
            });
        }
        let (mjd, fraction) = calendar.mjd().map_err(Error::HeaderLine1)?;
        if mjd != line2.mjd.0 || (fraction - line2.mjd.1).abs() > MJD_FRACTION_TOLERANCE {
            #[cfg(feature = "log")]
            error!("mjd mismatch: {:?} declared", line2.mjd);
            return Err(Error::MjdMismatch {
                computed: (mjd, fraction),
                declared: line2.mjd,
            });
        }
        Ok(())
    }

    /// Parses the "+ " block: declared count, then identifiers,
    /// then padding lines up to the minimal block size.
    fn parse_satellites<R: BufRead>(
        reader: &mut R,
        buf: &mut String,
    ) -> Result<Vec<SatelliteId>, Error> {
        expect_marker(reader, buf, "+ ").map_err(Error::SatelliteBlock)?;
        let count = parse_field::<usize>(buf, 3..6, ParsingError::NumberSatellites)
            .map_err(Error::SatelliteBlock)?;

        let mut satellites = Vec::with_capacity(count);
        let mut nb_lines = 1;
        loop {
            for slot in 0..SATELLITES_PER_LINE {
                if satellites.len() == count {
                    break;
                }
                let start = FIRST_SATELLITE_COLUMN + slot * 3;
                let id = column(buf, start..start + 3).map_err(Error::SatelliteBlock)?;
                satellites.push(SatelliteId::new(id));
            }
            if satellites.len() == count && nb_lines >= MIN_BLOCK_LINES {
                break;
            }
            if nb_lines == MAX_SECTION_LINES {
                return Err(Error::SatelliteBlock(ParsingError::TooManyLines(
                    MAX_SECTION_LINES,
                )));
            }
            expect_marker(reader, buf, "+ ").map_err(Error::SatelliteBlock)?;
            nb_lines += 1;
        }
        Ok(satellites)
    }

    /// Consumes the "++" block, which is not interpreted.
    fn parse_accuracy<R: BufRead + Seek>(reader: &mut R, buf: &mut String) -> Result<(), Error> {
        for _ in 0..MIN_BLOCK_LINES {
            expect_marker(reader, buf, "++").map_err(Error::AccuracyBlock)?;
        }
        let mut nb_lines = MIN_BLOCK_LINES;
        while next_line_if(reader, buf, "++")? {
            nb_lines += 1;
            if nb_lines > MAX_SECTION_LINES {
                return Err(Error::AccuracyBlock(ParsingError::TooManyLines(
                    MAX_SECTION_LINES,
                )));
            }
        }
        Ok(())
    }

    /// True if `satellite` is declared in this file.
    pub fn has_satellite(&self, satellite: &SatelliteId) -> bool {
        self.satellites.iter().any(|sat| sat == satellite)
    }

    /// Unique [Constellation]s of the declared satellites.
    pub fn constellations(&self) -> Vec<Constellation> {
        self.satellites
            .iter()
            .filter_map(|sat| sat.to_sv())
            .map(|sv| sv.constellation)
            .unique()
            .collect()
    }

    /// Nominal sampling interval
    pub fn interval(&self) -> Duration {
        self.epoch_interval
    }
}
