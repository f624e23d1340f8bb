//! Sequential SP3 reader
use crate::{
    epoch::Calendar,
    position::{is_position_entry, parse_position_entry},
    reader::{next_line, peek_byte, BufferedReader},
    velocity::{is_velocity_entry, parse_velocity_entry},
    DataBlock, Error, Header, SatelliteId,
};

use hifitime::{Duration, Epoch};
use std::io::{BufRead, Seek, SeekFrom};
use std::path::Path;

#[cfg(feature = "log")]
use log::debug;

/// Last line of a SP3 file
const EOF_SENTINEL: &str = "EOF";

fn is_epoch_line(line: &str) -> bool {
    line.starts_with('*')
}

fn is_eof_sentinel(line: &str) -> bool {
    line.trim_end() == EOF_SENTINEL
}

fn is_correlation_entry(line: &str) -> bool {
    line.starts_with("EP") || line.starts_with("EV")
}

/// [EphemerisReader] parses the header once, then walks the data section
/// one epoch at a time, retaining the data of a single satellite.
/// It carries a stream cursor: use one reader per thread.
#[derive(Debug)]
pub struct EphemerisReader<R = BufferedReader> {
    reader: R,
    header: Header,
    /// Stream position of the first epoch line
    start_of_data: u64,
    /// Line buffer, reused across calls
    line: String,
}

impl EphemerisReader<BufferedReader> {
    /// Opens and parses the header of given SP3 file, with possible seamless
    /// .gz decompression, if compiled with the "flate2" feature.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = BufferedReader::new(path)?;
        Self::from_reader(reader)
    }
}

impl<R: BufRead + Seek> EphemerisReader<R> {
    /// Parses the header from any seekable source, the reader is then
    /// positioned on the first epoch.
    pub fn from_reader(mut reader: R) -> Result<Self, Error> {
        let header = Header::parse(&mut reader)?;
        let start_of_data = reader.stream_position()?;
        Ok(Self {
            reader,
            header,
            start_of_data,
            line: String::with_capacity(128),
        })
    }

    /// File [Header]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// True if `satellite` is declared in the header
    pub fn has_satellite(&self, satellite: &SatelliteId) -> bool {
        self.header.has_satellite(satellite)
    }

    /// Declared satellites, in declaration order
    pub fn satellite_list(&self) -> &[SatelliteId] {
        &self.header.satellites
    }

    pub fn num_satellites(&self) -> usize {
        self.header.satellites.len()
    }

    pub fn num_epochs(&self) -> u32 {
        self.header.num_epochs
    }

    pub fn interval(&self) -> Duration {
        self.header.epoch_interval
    }

    pub fn start_epoch(&self) -> Epoch {
        self.header.start_epoch
    }

    /// Moves back to the first epoch of the data section.
    pub fn rewind(&mut self) -> Result<(), Error> {
        self.reader.seek(SeekFrom::Start(self.start_of_data))?;
        Ok(())
    }

    fn parse_epoch(&self, line: &str) -> Result<Epoch, Error> {
        Calendar::parse(line)
            .and_then(|cal| cal.to_epoch(self.header.timescale))
            .map_err(Error::EpochRecord)
    }

    /// Returns the next epoch without consuming it. None when the
    /// data section is exhausted.
    pub fn peek_next_epoch(&mut self) -> Result<Option<Epoch>, Error> {
        let position = self.reader.stream_position()?;
        let ret = self.read_epoch_line();
        self.reader.seek(SeekFrom::Start(position))?;
        ret
    }

    /// Reads the epoch line that opens a new block.
    /// The EOF sentinel is not consumed, so this keeps reporting end of stream.
    fn read_epoch_line(&mut self) -> Result<Option<Epoch>, Error> {
        let position = self.reader.stream_position()?;
        if !next_line(&mut self.reader, &mut self.line)? {
            return Ok(None);
        }
        if is_epoch_line(&self.line) {
            self.parse_epoch(&self.line).map(Some)
        } else if is_eof_sentinel(&self.line) {
            self.reader.seek(SeekFrom::Start(position))?;
            Ok(None)
        } else {
            Err(Error::UnexpectedLine(self.line.clone()))
        }
    }

    /// Parses the next epoch, retaining data of `satellite` only.
    /// Records of other satellites are skipped without being decoded.
    /// Returns None once the data section is exhausted.
    ///
    /// The returned [DataBlock] has every quantity marked absent when
    /// `satellite` has no record at that epoch. On error, the stream
    /// has already moved past the offending line.
    pub fn next_data_block(&mut self, satellite: &SatelliteId) -> Result<Option<DataBlock>, Error> {
        let epoch = match self.read_epoch_line()? {
            Some(epoch) => epoch,
            None => return Ok(None),
        };

        let mut block = DataBlock::new(epoch);

        loop {
            let position = match peek_byte(&mut self.reader)? {
                None | Some(b'*') => break,
                Some(b'E') => Some(self.reader.stream_position()?),
                _ => None,
            };

            next_line(&mut self.reader, &mut self.line)?;

            if is_position_entry(&self.line) {
                parse_position_entry(&self.line, satellite, &self.header, &mut block)
                    .map_err(Error::PositionRecord)?;
            } else if is_velocity_entry(&self.line) {
                parse_velocity_entry(&self.line, satellite, &self.header, &mut block)
                    .map_err(Error::VelocityRecord)?;
            } else if is_correlation_entry(&self.line) {
                #[cfg(feature = "log")]
                debug!("{}: skipped correlation record", epoch);
            } else if is_eof_sentinel(&self.line) {
                if let Some(position) = position {
                    self.reader.seek(SeekFrom::Start(position))?;
                }
                break;
            } else {
                return Err(Error::UnexpectedLine(self.line.clone()));
            }
        }

        Ok(Some(block))
    }

    /// Moves past the next data block without decoding its records.
    /// Returns false once the data section is exhausted.
    pub(crate) fn skip_data_block(&mut self) -> Result<bool, Error> {
        if self.read_epoch_line()?.is_none() {
            return Ok(false);
        }
        loop {
            match peek_byte(&mut self.reader)? {
                None | Some(b'*') => break,
                Some(b'E') => {
                    let position = self.reader.stream_position()?;
                    next_line(&mut self.reader, &mut self.line)?;
                    if is_eof_sentinel(&self.line) {
                        self.reader.seek(SeekFrom::Start(position))?;
                        break;
                    }
                },
                _ => {
                    next_line(&mut self.reader, &mut self.line)?;
                },
            }
        }
        Ok(true)
    }
}
