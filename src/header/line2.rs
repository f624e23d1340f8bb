//! header line #2 parsing helper

use crate::{fields::parse_field, ParsingError};
use hifitime::Duration;

pub(crate) fn is_header_line2(content: &str) -> bool {
    content.starts_with("##")
}

pub(crate) struct Line2 {
    pub week_counter: (u32, f64),
    pub epoch_interval: Duration,
    pub mjd: (u32, f64),
}

impl std::str::FromStr for Line2 {
    type Err = ParsingError;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if !is_header_line2(line) {
            return Err(ParsingError::UnexpectedMarker {
                expected: "##",
                found: line.to_string(),
            });
        }
        let week = parse_field::<u32>(line, 3..7, ParsingError::WeekCounter)?;
        let sow = parse_field::<f64>(line, 8..23, ParsingError::SecondsOfWeek)?;
        let dt = parse_field::<f64>(line, 24..38, ParsingError::EpochInterval)?;
        if dt <= 0.0 {
            return Err(ParsingError::EpochInterval(dt.to_string()));
        }
        let mjd = parse_field::<u32>(line, 39..44, ParsingError::Mjd)?;
        let fraction = parse_field::<f64>(line, 45..60, ParsingError::MjdFraction)?;
        Ok(Self {
            week_counter: (week, sow),
            epoch_interval: Duration::from_seconds(dt),
            mjd: (mjd, fraction),
        })
    }
}
