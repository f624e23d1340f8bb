//! Buffered Reader wrapper, for efficient and seekable data reading
//! with integrated .gz decompression.
#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

#[cfg(feature = "flate2")]
use std::io::Cursor;
use std::path::Path;

#[derive(Debug)]
pub enum BufferedReader {
    /// Readable (plain) file
    PlainFile(BufReader<File>),
    /// gzip compressed SP3, inflated in memory so it remains seekable
    #[cfg(feature = "flate2")]
    GzFile(Cursor<Vec<u8>>),
}

impl BufferedReader {
    /// Builds a new BufferedReader for efficient file interation,
    /// with possible .gz decompression
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        let f = File::open(path)?;
        if name.ends_with(".gz") {
            // --> gzip encoded
            #[cfg(feature = "flate2")]
            {
                let mut inflated = Vec::new();
                GzDecoder::new(f).read_to_end(&mut inflated)?;
                Ok(Self::GzFile(Cursor::new(inflated)))
            }
            #[cfg(not(feature = "flate2"))]
            {
                Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    ".gz data requires --flate2 feature",
                ))
            }
        } else if name.ends_with(".Z") {
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                ".Z decompression is not supported: uncompress manually",
            ))
        } else {
            // Assumes no extra compression
            Ok(Self::PlainFile(BufReader::new(f)))
        }
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, std::io::Error> {
        match self {
            Self::PlainFile(ref mut h) => h.read(buf),
            #[cfg(feature = "flate2")]
            Self::GzFile(ref mut h) => h.read(buf),
        }
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> Result<&[u8], std::io::Error> {
        match self {
            Self::PlainFile(ref mut bufreader) => bufreader.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::GzFile(ref mut cursor) => cursor.fill_buf(),
        }
    }
    fn consume(&mut self, s: usize) {
        match self {
            Self::PlainFile(ref mut bufreader) => bufreader.consume(s),
            #[cfg(feature = "flate2")]
            Self::GzFile(ref mut cursor) => cursor.consume(s),
        }
    }
}

impl Seek for BufferedReader {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, std::io::Error> {
        match self {
            Self::PlainFile(ref mut bufreader) => bufreader.seek(pos),
            #[cfg(feature = "flate2")]
            Self::GzFile(ref mut cursor) => cursor.seek(pos),
        }
    }
}

/// Reads the next line into `buf`, without its line terminator.
/// Returns false once the stream is exhausted.
pub(crate) fn next_line<R: BufRead>(reader: &mut R, buf: &mut String) -> std::io::Result<bool> {
    buf.clear();
    if reader.read_line(buf)? == 0 {
        return Ok(false);
    }
    while buf.ends_with('\n') || buf.ends_with('\r') {
        buf.pop();
    }
    Ok(true)
}

/// Returns the next byte without consuming it.
pub(crate) fn peek_byte<R: BufRead>(reader: &mut R) -> std::io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;
    #[test]
    fn line_iteration() {
        let mut cursor = Cursor::new("* first\r\nPG01\n\nEOF".as_bytes());
        let mut buf = String::new();
        assert_eq!(peek_byte(&mut cursor).unwrap(), Some(b'*'));
        assert!(next_line(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, "* first");
        assert_eq!(peek_byte(&mut cursor).unwrap(), Some(b'P'));
        assert!(next_line(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, "PG01");
        assert!(next_line(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, "");
        assert!(next_line(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, "EOF");
        assert_eq!(peek_byte(&mut cursor).unwrap(), None);
        assert!(!next_line(&mut cursor, &mut buf).unwrap());
    }
    #[test]
    fn missing_file() {
        assert!(BufferedReader::new("/this/file/does/not/exist.sp3").is_err());
    }
}
