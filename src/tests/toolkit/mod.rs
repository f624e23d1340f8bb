//! Test helpers
use crate::{
    prelude::{Duration, Epoch, TimeScale},
    DataType, EphemerisReader, Header, SatelliteId, Version,
};
use std::io::Cursor;
use std::path::PathBuf;

/// Path to given SP3 test resource
pub fn test_resource(name: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join("SP3")
        .join(name)
}

/// Content of given SP3 test resource
pub fn test_content(name: &str) -> String {
    std::fs::read_to_string(test_resource(name)).unwrap()
}

/// Parses in-memory SP3 content
pub fn reader_from_str(
    content: &str,
) -> Result<EphemerisReader<Cursor<Vec<u8>>>, crate::Error> {
    EphemerisReader::from_reader(Cursor::new(content.as_bytes().to_vec()))
}

/// 2019-10-27T00:00:00 GPST
pub fn test_epoch() -> Epoch {
    Epoch::from_gregorian_at_midnight(2019, 10, 27, TimeScale::GPST)
}

/// Minimal [Header] for record parsing tests
pub fn test_header() -> Header {
    Header {
        version: Version::D,
        data_type: DataType::Velocity,
        start_epoch: test_epoch(),
        num_epochs: 1,
        data_used: "ORBIT".to_string(),
        coord_system: "IGS14".to_string(),
        orbit_type: "FIT".to_string(),
        agency: "TST".to_string(),
        week_counter: (2077, 0.0),
        mjd_start: (58783, 0.0),
        epoch_interval: Duration::from_seconds(60.0),
        satellites: vec![SatelliteId::new("G01"), SatelliteId::new("G02")],
        file_type: "G".to_string(),
        time_system: "GPS".to_string(),
        timescale: TimeScale::GPST,
        position_base: 1.25,
        clock_base: 1.025,
        comments: Vec::new(),
    }
}

/// Panics if `a` and `b` differ by more than `tolerance` on any axis
pub fn assert_close(a: (f64, f64, f64), b: (f64, f64, f64), tolerance: f64) {
    let err = (a.0 - b.0).abs().max((a.1 - b.1).abs()).max((a.2 - b.2).abs());
    assert!(
        err <= tolerance,
        "{:?} differs from {:?} by {:e} (> {:e})",
        a,
        b,
        err,
        tolerance
    );
}
