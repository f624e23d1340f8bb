//! Fixed column field extraction
use crate::ParsingError;
use std::{ops::Range, str::FromStr};

/// Returns `line[range]`. The range end is clamped to the line length,
/// because writers tend to right-trim their lines, but the field must
/// at least start within the line.
pub(crate) fn column(line: &str, range: Range<usize>) -> Result<&str, ParsingError> {
    let end = range.end.min(line.len());
    if range.start >= end {
        return Err(ParsingError::MissingColumns {
            line: line.to_string(),
            start: range.start,
            end: range.end,
        });
    }
    line.get(range.start..end)
        .ok_or_else(|| ParsingError::MissingColumns {
            line: line.to_string(),
            start: range.start,
            end: range.end,
        })
}

/// Parses a numerical field located at `range`, `err` builds the
/// field specific error from the raw content.
pub(crate) fn parse_field<T: FromStr>(
    line: &str,
    range: Range<usize>,
    err: fn(String) -> ParsingError,
) -> Result<T, ParsingError> {
    let content = column(line, range)?;
    content
        .trim()
        .parse::<T>()
        .map_err(|_| err(content.to_string()))
}

/// Trimmed text label located at `range`, empty when the line stops short.
pub(crate) fn label(line: &str, range: Range<usize>) -> String {
    column(line, range)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// True when `range` is beyond the line or only holds whitespaces.
pub(crate) fn is_blank(line: &str, range: Range<usize>) -> bool {
    column(line, range)
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
}

/// True when the single character column `index` holds `marker`.
pub(crate) fn has_marker(line: &str, index: usize, marker: u8) -> bool {
    line.as_bytes().get(index) == Some(&marker)
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn column_extraction() {
        let line = "PG01 -22335.782004";
        assert_eq!(column(line, 1..4), Ok("G01"));
        assert_eq!(column(line, 4..18), Ok(" -22335.782004"));
        // right trimmed line
        assert_eq!(column(line, 4..30), Ok(" -22335.782004"));
        assert!(matches!(
            column(line, 18..32),
            Err(ParsingError::MissingColumns { start: 18, end: 32, .. })
        ));
        assert!(matches!(
            column(line, 40..46),
            Err(ParsingError::MissingColumns { .. })
        ));
    }
    #[test]
    fn field_parsing() {
        let line = "## 2077      0.00000000   300.00000000 58783 0.0000000000000";
        let week: u32 = parse_field(line, 3..7, ParsingError::WeekCounter).unwrap();
        assert_eq!(week, 2077);
        let dt: f64 = parse_field(line, 24..38, ParsingError::EpochInterval).unwrap();
        assert_eq!(dt, 300.0);
        let err = parse_field::<u32>(line, 8..23, ParsingError::WeekCounter);
        assert_eq!(
            err,
            Err(ParsingError::WeekCounter("     0.00000000".to_string()))
        );
    }
    #[test]
    fn blanks_and_markers() {
        let line = "PG01 -22335.782004 -14656.280389  -1218.238499   -176.397152 10  9 11 102 EP  MP";
        assert!(!is_blank(line, 61..63));
        assert!(is_blank(line, 60..61));
        assert!(is_blank(line, 90..93));
        assert!(has_marker(line, 74, b'E'));
        assert!(has_marker(line, 75, b'P'));
        assert!(has_marker(line, 78, b'M'));
        assert!(has_marker(line, 79, b'P'));
        assert!(!has_marker(line, 85, b'P'));
        assert_eq!(label(line, 1..4), "G01");
        assert_eq!(label(line, 100..104), "");
    }
}
