//! Turning value records into board entries.

use crate::dif::FormatError;
use crate::record::ValueRecord;
use crate::schema::FieldIndex;

/// Order number of boards that are already named and are not panelized.
pub const PRODUCTS_ORDER: &str = "products";

/// One board to place on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub name: String,
    pub required_count: u64,
    pub max_optional_count: i64,
    pub inscription: String,
    pub original_name: String,
}

/// Why a record did not produce a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingFilename,
    MissingOrderNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardDecision {
    Board(BoardEntry),
    Skip(SkipReason),
}

impl BoardDecision {
    pub fn into_board(self) -> Option<BoardEntry> {
        match self {
            BoardDecision::Board(board) => Some(board),
            BoardDecision::Skip(_) => None,
        }
    }
}

impl BoardEntry {
    /// A pre-named board from the products folder, kept under its own name.
    pub fn product(filename: &str, required_count: u64, max_optional_count: i64) -> BoardEntry {
        BoardEntry {
            name: filename.to_string(),
            required_count,
            max_optional_count,
            inscription: String::new(),
            original_name: filename.to_string(),
        }
    }

    /// A board ordered under `order_number`, renamed so every panel gets a unique name.
    pub fn ordered(
        filename: &str,
        order_number: &str,
        required_count: u64,
        max_optional_count: i64,
    ) -> BoardEntry {
        BoardEntry {
            name: format!("{}_{}_{}", filename, order_number, filename),
            required_count,
            max_optional_count,
            inscription: filename.to_string(),
            original_name: filename.to_string(),
        }
    }

    /// Apply the board policy to one record.
    ///
    /// An unparsable optional count becomes `0`. A record without a filename or
    /// order number is skipped. An unparsable count is fatal.
    pub fn from_record(record: &ValueRecord, index: &FieldIndex) -> Result<BoardDecision, FormatError> {
        let max_optional_count = record
            .get(index.optional_count)
            .trim()
            .parse::<i64>()
            .unwrap_or(0);

        let filename = record.get(index.filename);
        if filename.is_empty() {
            return Ok(BoardDecision::Skip(SkipReason::MissingFilename));
        }

        let order_number = record.get(index.order_number).trim_end_matches(&['\r', '\n'][..]);
        if order_number.is_empty() {
            return Ok(BoardDecision::Skip(SkipReason::MissingOrderNumber));
        }

        let count = record.get(index.count);
        let required_count = count
            .trim()
            .parse::<u64>()
            .map_err(|_| FormatError::InvalidCount {
                line: record.line(),
                value: count.to_string(),
            })?;

        let board = if order_number == PRODUCTS_ORDER {
            BoardEntry::product(filename, required_count, max_optional_count)
        } else {
            BoardEntry::ordered(filename, order_number, required_count, max_optional_count)
        };

        Ok(BoardDecision::Board(board))
    }
}
