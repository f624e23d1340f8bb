//! Stateful iteration over an [EphemerisReader]
use crate::{DataBlock, EphemerisReader, Error, SatelliteId};
use hifitime::Epoch;
use std::io::{BufRead, Seek};

#[cfg(feature = "log")]
use log::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorStatus {
    /// Cursor sits on a valid [DataBlock]
    Positioned,
    /// Data section is exhausted
    EndOfStream,
}

/// Walks the data blocks of one satellite, with forward seeking.
pub struct ReaderCursor<'a, R = crate::BufferedReader> {
    reader: &'a mut EphemerisReader<R>,
    satellite: SatelliteId,
    block: Option<DataBlock>,
}

impl<'a, R: BufRead + Seek> ReaderCursor<'a, R> {
    /// Builds a cursor retaining `satellite` data. The cursor is not
    /// positioned until [Self::begin] is called.
    pub fn new(reader: &'a mut EphemerisReader<R>, satellite: SatelliteId) -> Self {
        Self {
            reader,
            satellite,
            block: None,
        }
    }

    /// Rewinds and moves to the first data block.
    pub fn begin(&mut self) -> Result<CursorStatus, Error> {
        self.reader.rewind()?;
        self.block = None;
        self.advance()
    }

    /// Moves to the next data block.
    pub fn advance(&mut self) -> Result<CursorStatus, Error> {
        self.block = self.reader.next_data_block(&self.satellite)?;
        Ok(self.status())
    }

    fn status(&self) -> CursorStatus {
        if self.block.is_some() {
            CursorStatus::Positioned
        } else {
            CursorStatus::EndOfStream
        }
    }

    /// Current [DataBlock], None when not positioned.
    pub fn data_block(&self) -> Option<&DataBlock> {
        self.block.as_ref()
    }

    /// Epoch of the current [DataBlock], None when not positioned.
    pub fn current_time(&self) -> Option<Epoch> {
        self.block.map(|block| block.epoch)
    }

    /// Epoch following the current block, None at end of stream.
    pub fn peek_next_epoch(&mut self) -> Result<Option<Epoch>, Error> {
        self.reader.peek_next_epoch()
    }

    /// Positions the cursor on the first block whose epoch is >= `t`.
    /// Intermediate blocks are skipped without being parsed.
    /// Targets behind the cursor cause a rewind. Targets that precede the
    /// whole data section are an error.
    pub fn goto_time(&mut self, t: Epoch) -> Result<CursorStatus, Error> {
        let current = match self.current_time() {
            Some(current) if current <= t => current,
            _ => {
                #[cfg(feature = "log")]
                debug!("{}: rewinding {} cursor", t, self.satellite);
                if self.begin()? == CursorStatus::EndOfStream {
                    return Ok(CursorStatus::EndOfStream);
                }
                let first = self.current_time().ok_or(Error::TargetPrecedesData(t))?;
                if first > t {
                    return Err(Error::TargetPrecedesData(t));
                }
                first
            },
        };

        if current == t {
            return Ok(CursorStatus::Positioned);
        }

        loop {
            match self.reader.peek_next_epoch()? {
                Some(next) if next < t => {
                    self.reader.skip_data_block()?;
                },
                Some(_) => return self.advance(),
                None => {
                    self.block = None;
                    return Ok(CursorStatus::EndOfStream);
                },
            }
        }
    }
}
