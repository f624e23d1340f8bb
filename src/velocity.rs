//! Velocity & Clock rate data parsing
use crate::{
    fields::column,
    record::{
        parse_sdev, parse_values, parse_vector_sdev, BAD_CLOCK_VALUE, CLOCK, CLOCK_RATE,
        CLOCK_SDEV_COLUMNS, SATELLITE_COLUMNS, VELOCITY,
    },
    DataBlock, EventFlags, Header, ParsingError, SatelliteId,
};

pub(crate) fn is_velocity_entry(content: &str) -> bool {
    content.starts_with('V')
}

/// Parses a V record into `block`, if it describes `satellite`.
/// Records of other satellites leave `block` untouched.
/// Returns true when `block` was updated.
pub(crate) fn parse_velocity_entry(
    line: &str,
    satellite: &SatelliteId,
    header: &Header,
    block: &mut DataBlock,
) -> Result<bool, ParsingError> {
    let sat = SatelliteId::new(column(line, SATELLITE_COLUMNS)?);
    if sat != *satellite {
        return Ok(false);
    }

    let values = parse_values(line, ParsingError::Velocity, ParsingError::ClockRate)?;
    let sdev = parse_vector_sdev(line, header.position_base)?;
    let rate_sdev = parse_sdev(line, CLOCK_SDEV_COLUMNS, header.clock_base)?;

    block.state[VELOCITY..].copy_from_slice(&values);

    if values[..3].iter().any(|v| *v == 0.0) {
        block.flags.insert(EventFlags::ABSENT_VELOCITY);
    } else {
        block.flags.remove(EventFlags::ABSENT_VELOCITY);
    }

    if values[CLOCK] >= BAD_CLOCK_VALUE {
        block.flags.insert(EventFlags::ABSENT_CLOCK_RATE);
    } else {
        block.flags.remove(EventFlags::ABSENT_CLOCK_RATE);
    }

    if let Some(sdev) = sdev {
        block.state_sdev[VELOCITY..CLOCK_RATE].copy_from_slice(&sdev);
        block.flags.insert(EventFlags::HAS_VELOCITY_STDDEV);
    }
    if let Some(sdev) = rate_sdev {
        block.state_sdev[CLOCK_RATE] = sdev;
        block.flags.insert(EventFlags::HAS_CLOCK_RATE_STDDEV);
    }
    Ok(true)
}
