//! Position & Clock data parsing
use crate::{
    fields::{column, has_marker},
    record::{
        parse_sdev, parse_values, parse_vector_sdev, BAD_CLOCK_VALUE, CLOCK, CLOCK_SDEV_COLUMNS,
        SATELLITE_COLUMNS,
    },
    DataBlock, EventFlags, Header, ParsingError, SatelliteId,
};

pub(crate) fn is_position_entry(content: &str) -> bool {
    content.starts_with('P')
}

/// Parses a P record into `block`, if it describes `satellite`.
/// Records of other satellites leave `block` untouched.
/// Returns true when `block` was updated.
pub(crate) fn parse_position_entry(
    line: &str,
    satellite: &SatelliteId,
    header: &Header,
    block: &mut DataBlock,
) -> Result<bool, ParsingError> {
    let sat = SatelliteId::new(column(line, SATELLITE_COLUMNS)?);
    if sat != *satellite {
        return Ok(false);
    }

    let values = parse_values(line, ParsingError::Coordinates, ParsingError::Clock)?;
    let sdev = parse_vector_sdev(line, header.position_base)?;
    let clock_sdev = parse_sdev(line, CLOCK_SDEV_COLUMNS, header.clock_base)?;

    block.state[..4].copy_from_slice(&values);

    if values[..3].iter().any(|v| *v == 0.0) {
        block.flags.insert(EventFlags::ABSENT_POSITION);
    } else {
        block.flags.remove(EventFlags::ABSENT_POSITION);
    }

    let clock = values[CLOCK];
    if clock == 0.0 || clock >= BAD_CLOCK_VALUE {
        block.flags.insert(EventFlags::ABSENT_CLOCK);
    } else {
        block.flags.remove(EventFlags::ABSENT_CLOCK);
    }

    if let Some(sdev) = sdev {
        block.state_sdev[..3].copy_from_slice(&sdev);
        block.flags.insert(EventFlags::HAS_POSITION_STDDEV);
    }
    if let Some(sdev) = clock_sdev {
        block.state_sdev[CLOCK] = sdev;
        block.flags.insert(EventFlags::HAS_CLOCK_STDDEV);
    }

    for (index, marker, flag) in [
        (74, b'E', EventFlags::CLOCK_EVENT),
        (75, b'P', EventFlags::CLOCK_PREDICTION),
        (78, b'M', EventFlags::MANEUVER),
        (79, b'P', EventFlags::ORBIT_PREDICTION),
    ] {
        if has_marker(line, index, marker) {
            block.flags.insert(flag);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::toolkit::{test_header, test_epoch};

    #[test]
    fn position_entry_parsing() {
        let header = test_header();
        let g01 = SatelliteId::new("G01");
        for (content, state, clock_absent, events, has_sdev) in [
            (
                "PC01 -32312.652253  27060.656563    205.195454     63.035497",
                None,
                false,
                EventFlags::empty(),
                false,
            ),
            (
                "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102      P",
                Some([-22335.782004, -14656.280389, -1218.238499, -176.397152]),
                false,
                EventFlags::ORBIT_PREDICTION,
                true,
            ),
            (
                "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102     MP",
                Some([-22335.782004, -14656.280389, -1218.238499, -176.397152]),
                false,
                EventFlags::MANEUVER | EventFlags::ORBIT_PREDICTION,
                true,
            ),
            (
                "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102 E",
                Some([-22335.782004, -14656.280389, -1218.238499, -176.397152]),
                false,
                EventFlags::CLOCK_EVENT,
                true,
            ),
            (
                "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102  P",
                Some([-22335.782004, -14656.280389, -1218.238499, -176.397152]),
                false,
                EventFlags::CLOCK_PREDICTION,
                true,
            ),
            (
                "PG01 -22335.782004 -14656.280389  -1218.238499 999999.999999",
                Some([-22335.782004, -14656.280389, -1218.238499, 999999.999999]),
                true,
                EventFlags::empty(),
                false,
            ),
        ] {
            let mut block = DataBlock::new(test_epoch());
            let updated = parse_position_entry(content, &g01, &header, &mut block).unwrap();
            match state {
                Some(state) => {
                    assert!(updated);
                    assert_eq!(block.state[..4], state);
                    assert!(!block.flags.is_set(EventFlags::ABSENT_POSITION));
                    assert_eq!(block.flags.is_set(EventFlags::ABSENT_CLOCK), clock_absent);
                    assert!(block.flags.is_set(events));
                    assert_eq!(block.flags.is_set(EventFlags::HAS_POSITION_STDDEV), has_sdev);
                    assert_eq!(block.flags.is_set(EventFlags::HAS_CLOCK_STDDEV), has_sdev);
                },
                None => {
                    assert!(!updated);
                    assert_eq!(block, DataBlock::new(test_epoch()));
                },
            }
        }
    }

    #[test]
    fn zero_values_are_absent() {
        let header = test_header();
        let g01 = SatelliteId::new("G01");
        let mut block = DataBlock::new(test_epoch());
        let line = "PG01 -22335.782004      0.000000  -1218.238499      0.000000";
        parse_position_entry(line, &g01, &header, &mut block).unwrap();
        assert!(block.flags.is_set(EventFlags::ABSENT_POSITION | EventFlags::ABSENT_CLOCK));
        assert!(block.position_km().is_none());
        assert!(block.clock_us().is_none());
    }

    #[test]
    fn std_dev_units() {
        let header = test_header();
        let g01 = SatelliteId::new("G01");
        let mut block = DataBlock::new(test_epoch());
        let line = "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152  2  3  4 100";
        parse_position_entry(line, &g01, &header, &mut block).unwrap();
        let (sx, sy, sz) = block.position_sdev_mm().unwrap();
        assert_eq!(sx, header.position_base.powi(2));
        assert_eq!(sy, header.position_base.powi(3));
        assert_eq!(sz, header.position_base.powi(4));
        assert_eq!(block.clock_sdev_ps(), Some(header.clock_base.powi(100)));
    }

    #[test]
    fn malformed_entries() {
        let header = test_header();
        let g01 = SatelliteId::new("G01");
        for line in [
            "PG01 -22335.782004 -14656.28x389  -1218.238499   -176.397152",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.3x7152",
            "PG01 -22335.782004 -14656.280389",
            "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 1a  9 11 102",
        ] {
            let mut block = DataBlock::new(test_epoch());
            assert!(parse_position_entry(line, &g01, &header, &mut block).is_err());
            assert_eq!(block, DataBlock::new(test_epoch()), "block modified by \"{}\"", line);
        }
    }
}
