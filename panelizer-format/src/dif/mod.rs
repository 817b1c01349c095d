//! Reader for the DIF exports produced by the order spreadsheet.
//!
//! The layout handled here is:
//!
//! ```text
//! TABLE ... VECTORS ... TUPLES ...   (ignored)
//! DATA
//! 0,0
//! ""
//! -1,0
//! BOT                                 header tuple: one cell per field name
//! 1,0
//! "Filename"
//! ...
//! -1,0
//! BOT                                 first data tuple
//! ...
//! -1,0
//! EOD
//! ```

use std::io::BufRead;
use std::iter::FusedIterator;

mod cell;
mod error;

pub use self::cell::{parse_cell, Cell, BEGIN_TUPLE, DATA_MARKER, END_DATA};
pub use self::error::{CellError, FormatError};

use crate::record::ValueRecord;
use crate::schema::{FieldIndex, FieldSchema};

/// Lines between the `DATA` marker and the header tuple's `BOT`.
const PREAMBLE_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    BeginTuple,
    EndData,
}

struct Tuple {
    cells: Vec<String>,
    end: Terminator,
    end_line: usize,
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Inside a data tuple whose `BOT` was read on `start`.
    InTuple { start: usize },
    Done,
}

/// Single-pass reader over a DIF export.
///
/// Construction consumes everything up to and including the header tuple, so
/// [schema](DifReader::schema) and [index](DifReader::index) are available
/// immediately. Data records are then produced lazily by iterating the reader.
/// The iterator stops after `EOD` or after the first error.
#[derive(Debug)]
pub struct DifReader<R> {
    input: R,
    line: usize,
    schema: FieldSchema,
    index: FieldIndex,
    state: State,
}

impl<R: BufRead> DifReader<R> {
    pub fn new(input: R) -> Result<DifReader<R>, FormatError> {
        let mut reader = DifReader {
            input,
            line: 0,
            schema: FieldSchema::default(),
            index: FieldIndex {
                count: 0,
                order_number: 0,
                filename: 0,
                optional_count: 0,
            },
            state: State::Done,
        };

        reader.skip_to_data()?;

        let header = reader.read_tuple()?;
        if header.end == Terminator::EndData {
            return Err(FormatError::HeaderWithoutRecords(header.end_line));
        }

        reader.schema = FieldSchema::new(header.cells);
        reader.index = FieldIndex::resolve(&reader.schema)?;
        reader.state = State::InTuple {
            start: header.end_line,
        };

        tracing::debug!(fields = reader.schema.len(), index = ?reader.index, "read DIF header");

        Ok(reader)
    }

    #[inline(always)]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    #[inline(always)]
    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// Number of input lines consumed so far.
    #[inline(always)]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Next line without its terminator. Bytes that are not UTF-8 (exports
    /// saved in a legacy code page) are replaced rather than rejected.
    fn read_line(&mut self) -> Result<Option<String>, FormatError> {
        let mut buf = vec![];
        let count = self
            .input
            .read_until(b'\n', &mut buf)
            .map_err(FormatError::ReadFailed)?;

        if count == 0 {
            return Ok(None);
        }

        self.line += 1;
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }

        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(line = self.line, "replacing non UTF-8 bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(line))
    }

    fn skip_to_data(&mut self) -> Result<(), FormatError> {
        loop {
            match self.read_line()? {
                Some(line) if line.starts_with(DATA_MARKER) => break,
                Some(_) => {}
                None => return Err(FormatError::MissingDataMarker),
            }
        }

        for _ in 0..PREAMBLE_LINES {
            if self.read_line()?.is_none() {
                return Err(FormatError::MissingInitialTuple(self.line));
            }
        }

        match self.read_line()? {
            Some(line) if line.starts_with(BEGIN_TUPLE) => Ok(()),
            _ => Err(FormatError::MissingInitialTuple(self.line)),
        }
    }

    fn read_tuple(&mut self) -> Result<Tuple, FormatError> {
        let mut cells = vec![];

        loop {
            let tag = self.read_line()?;
            let tag_line = self.line;
            let value = self.read_line()?;

            let (tag, value) = match (tag, value) {
                (Some(tag), Some(value)) => (tag, value),
                _ => return Err(FormatError::UnexpectedEof(self.line)),
            };

            let cell = parse_cell(&tag, &value).map_err(|kind| FormatError::Cell {
                line: tag_line,
                tag: tag.clone(),
                kind,
            })?;

            let end = match cell {
                Cell::Value(v) => {
                    cells.push(v.into_owned());
                    continue;
                }
                Cell::BeginTuple => Terminator::BeginTuple,
                Cell::EndData => Terminator::EndData,
            };

            return Ok(Tuple {
                cells,
                end,
                end_line: self.line,
            });
        }
    }

    fn next_record(&mut self) -> Option<Result<ValueRecord, FormatError>> {
        loop {
            let start = match self.state {
                State::InTuple { start } => start,
                State::Done => return None,
            };

            let tuple = match self.read_tuple() {
                Ok(v) => v,
                Err(e) => {
                    self.state = State::Done;
                    return Some(Err(e));
                }
            };

            self.state = match tuple.end {
                Terminator::BeginTuple => State::InTuple {
                    start: tuple.end_line,
                },
                Terminator::EndData => State::Done,
            };

            if tuple.cells.is_empty() {
                tracing::debug!(line = start, "skipping empty tuple");
                continue;
            }

            if tuple.cells.len() != self.schema.len() {
                self.state = State::Done;
                return Some(Err(FormatError::RecordLength {
                    line: start,
                    expected: self.schema.len(),
                    found: tuple.cells.len(),
                }));
            }

            return Some(Ok(ValueRecord::new(start, tuple.cells)));
        }
    }
}

impl<R: BufRead> Iterator for DifReader<R> {
    type Item = Result<ValueRecord, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

impl<R: BufRead> FusedIterator for DifReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "TABLE\n0,1\n\"\"\nVECTORS\n0,4\n\"\"\nTUPLES\n0,3\n\"\"\nDATA\n0,0\n\"\"\n-1,0\nBOT\n";

    fn dif(body: &str) -> Cursor<Vec<u8>> {
        Cursor::new(format!("{}{}", HEADER, body).into_bytes())
    }

    const FIELDS: &str = "1,0\n\"count\"\n1,0\n\"order-nr\"\n1,0\n\"Filename\"\n1,0\n\"count optional\"\n-1,0\nBOT\n";

    #[test]
    fn reads_schema_and_records() {
        let body = format!(
            "{}{}",
            FIELDS,
            "0,2\nV\n1,0\n\"7\"\n1,0\n\"foo.fzz\"\n0,1\nV\n-1,0\nBOT\n\
             0,1\nV\n1,0\n\"products\"\n1,0\n\"bar.fzz\"\n1,0\n\"\"\n-1,0\nEOD\n"
        );
        let mut reader = DifReader::new(dif(&body)).unwrap();

        assert_eq!(
            reader.schema().iter().collect::<Vec<_>>(),
            vec!["count", "order-nr", "Filename", "count optional"]
        );
        assert_eq!(reader.index().filename, 2);

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.values(), &["2", "7", "foo.fzz", "1"]);
        assert_eq!(first.line(), 24);

        let second = reader.next().unwrap().unwrap();
        assert_eq!(second.values(), &["1", "products", "bar.fzz", ""]);

        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn numeric_schema_cells() {
        let body = "0,count\nV\n1,0\n\"order-nr\"\n1,0\n\"Filename\"\n1,0\n\"count optional\"\n-1,0\nBOT\n-1,0\nEOD\n";
        let reader = DifReader::new(dif(body)).unwrap();
        assert_eq!(reader.index().count, 0);
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn crlf_line_endings() {
        let body = format!(
            "{}{}",
            FIELDS, "0,3\nV\n1,0\n\"9\"\n1,0\n\"baz\"\n0,0\nV\n-1,0\nEOD\n"
        );
        let text = format!("{}{}", HEADER, body).replace('\n', "\r\n");
        let records = DifReader::new(Cursor::new(text.into_bytes()))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].values(), &["3", "9", "baz", "0"]);
    }

    #[test]
    fn non_utf8_bytes_are_replaced() {
        let body = format!(
            "{}{}",
            FIELDS, "0,1\nV\n1,0\n\"7\"\n1,0\n\"caf\u{1}.fzz\"\n0,0\nV\n-1,0\nEOD\n"
        );
        let bytes = format!("{}{}", HEADER, body)
            .into_bytes()
            .into_iter()
            .map(|b| if b == 0x01 { 0xe9 } else { b })
            .collect::<Vec<u8>>();

        let records = DifReader::new(Cursor::new(bytes))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(2), "caf\u{fffd}.fzz");
    }

    #[test]
    fn missing_data_marker() {
        let input = Cursor::new(b"TABLE\n0,1\n\"\"\n".to_vec());
        assert!(matches!(
            DifReader::new(input),
            Err(FormatError::MissingDataMarker)
        ));
    }

    #[test]
    fn missing_initial_tuple() {
        let input = Cursor::new(b"DATA\n0,0\n\"\"\n-1,0\nEOD\n".to_vec());
        assert!(matches!(
            DifReader::new(input),
            Err(FormatError::MissingInitialTuple(5))
        ));

        let input = Cursor::new(b"DATA\n0,0\n".to_vec());
        assert!(matches!(
            DifReader::new(input),
            Err(FormatError::MissingInitialTuple(_))
        ));
    }

    #[test]
    fn header_ending_in_eod() {
        let body = "1,0\n\"count\"\n-1,0\nEOD\n";
        assert!(matches!(
            DifReader::new(dif(body)),
            Err(FormatError::HeaderWithoutRecords(_))
        ));
    }

    #[test]
    fn header_cut_short() {
        let body = "1,0\n\"count\"\n1,0\n";
        assert!(matches!(
            DifReader::new(dif(body)),
            Err(FormatError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn header_missing_field() {
        let body = "1,0\n\"count\"\n1,0\n\"order-nr\"\n1,0\n\"Filename\"\n-1,0\nBOT\n-1,0\nEOD\n";
        assert!(matches!(
            DifReader::new(dif(body)),
            Err(FormatError::MissingField("count optional"))
        ));
    }

    #[test]
    fn malformed_numeric_tag() {
        let body = format!("{}{}", FIELDS, "0,1,2\nV\n");
        let mut reader = DifReader::new(dif(&body)).unwrap();
        match reader.next() {
            Some(Err(FormatError::Cell { line, tag, kind })) => {
                assert_eq!(line, 25);
                assert_eq!(tag, "0,1,2");
                assert_eq!(kind, CellError::TooManyComponents);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn unexpected_tag() {
        let body = format!("{}{}", FIELDS, "2,0\n\"?\"\n");
        let mut reader = DifReader::new(dif(&body)).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(FormatError::Cell {
                kind: CellError::UnexpectedFormat,
                ..
            }))
        ));
    }

    #[test]
    fn records_without_eod() {
        let body = format!("{}{}", FIELDS, "0,2\nV\n1,0\n\"7\"\n");
        let mut reader = DifReader::new(dif(&body)).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(FormatError::UnexpectedEof(_)))
        ));
    }

    #[test]
    fn short_record() {
        let body = format!("{}{}", FIELDS, "0,2\nV\n1,0\n\"7\"\n-1,0\nEOD\n");
        let mut reader = DifReader::new(dif(&body)).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(FormatError::RecordLength {
                expected: 4,
                found: 2,
                ..
            }))
        ));
    }

    #[test]
    fn empty_tuples_are_not_records() {
        let body = format!(
            "{}{}",
            FIELDS, "-1,0\nBOT\n0,1\nV\n1,0\n\"1\"\n1,0\n\"a\"\n0,0\nV\n-1,0\nEOD\n"
        );
        let records = DifReader::new(dif(&body))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get(2), "a");
    }

    #[test]
    fn trailing_lines_after_eod_are_ignored() {
        let body = format!(
            "{}{}",
            FIELDS, "0,1\nV\n1,0\n\"1\"\n1,0\n\"a\"\n0,0\nV\n-1,0\nEOD\ngarbage\n"
        );
        assert_eq!(DifReader::new(dif(&body)).unwrap().count(), 1);
    }
}
