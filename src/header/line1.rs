//! header line #1 parsing helper

use crate::{
    epoch::Calendar,
    fields::{column, label, parse_field},
    header::DataType,
    ParsingError, Version,
};
use std::str::FromStr;

pub(crate) fn is_header_line1(content: &str) -> bool {
    content.starts_with('#') && !content.starts_with("##")
}

pub(crate) struct Line1 {
    pub version: Version,
    pub data_type: DataType,
    pub calendar: Calendar,
    pub num_epochs: u32,
    pub data_used: String,
    pub coord_system: String,
    pub orbit_type: String,
    pub agency: String,
}

impl std::str::FromStr for Line1 {
    type Err = ParsingError;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if !is_header_line1(line) {
            return Err(ParsingError::UnexpectedMarker {
                expected: "#",
                found: line.to_string(),
            });
        }
        Ok(Self {
            version: Version::from_str(column(line, 1..2)?)?,
            data_type: DataType::from_str(column(line, 2..3)?)?,
            calendar: Calendar::parse(line)?,
            num_epochs: parse_field(line, 32..39, ParsingError::NumberEpochs)?,
            data_used: label(line, 40..45),
            coord_system: label(line, 46..51),
            orbit_type: label(line, 52..55),
            agency: label(line, 56..60),
        })
    }
}
