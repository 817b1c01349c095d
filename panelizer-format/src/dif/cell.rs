//! Sans-IO classification of DIF line pairs.
//!
//! Every cell of a DIF tuple is written as two lines: a tag line and a value
//! line. String cells carry a `1,0` tag and the quoted text on the value line.
//! Numeric cells carry the value inside the tag (`0,<value>`) and a type
//! indicator on the value line. Tuple boundaries are special cells with a
//! `-1,0` tag and `BOT` or `EOD` on the value line.

use std::borrow::Cow;

use super::CellError;

pub const DATA_MARKER: &str = "DATA";
pub const BEGIN_TUPLE: &str = "BOT";
pub const END_DATA: &str = "EOD";

/// One classified (tag, value) line pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<'a> {
    /// A string or numeric cell's text.
    Value(Cow<'a, str>),
    /// `BOT`: the current tuple ends and another one begins.
    BeginTuple,
    /// `EOD`: the current tuple is the last one.
    EndData,
}

/// Classify a tag line and its value line.
///
/// Both lines are expected without their line terminator.
pub fn parse_cell<'a>(tag: &'a str, value: &'a str) -> Result<Cell<'a>, CellError> {
    if tag.starts_with('1') {
        return Ok(Cell::Value(strip_quotes(value)));
    }

    if tag.starts_with('0') {
        let mut parts = tag.split(',');
        parts.next();
        let number = parts.next().ok_or(CellError::MissingValueComponent)?;
        if parts.next().is_some() {
            return Err(CellError::TooManyComponents);
        }
        return Ok(Cell::Value(Cow::Borrowed(number)));
    }

    if value.starts_with(BEGIN_TUPLE) {
        Ok(Cell::BeginTuple)
    } else if value.starts_with(END_DATA) {
        Ok(Cell::EndData)
    } else {
        Err(CellError::UnexpectedFormat)
    }
}

#[inline]
fn strip_quotes(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', ""))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_cell_drops_every_quote() {
        assert_eq!(
            parse_cell("1,0", "\"Filename\"").unwrap(),
            Cell::Value("Filename".into())
        );
        assert_eq!(
            parse_cell("1,0", "\"say \"\"hi\"\"\"").unwrap(),
            Cell::Value("say hi".into())
        );
        assert_eq!(parse_cell("1,0", "\"\"").unwrap(), Cell::Value("".into()));
    }

    #[test]
    fn string_cell_without_quotes_is_borrowed() {
        match parse_cell("1,0", "plain").unwrap() {
            Cell::Value(Cow::Borrowed(v)) => assert_eq!(v, "plain"),
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn numeric_cell_takes_second_component() {
        assert_eq!(parse_cell("0,12", "V").unwrap(), Cell::Value("12".into()));
        assert_eq!(parse_cell("0,", "V").unwrap(), Cell::Value("".into()));
        assert_eq!(parse_cell("0,1.5", "V").unwrap(), Cell::Value("1.5".into()));
    }

    #[test]
    fn numeric_cell_with_extra_components() {
        assert_eq!(
            parse_cell("0,1,2", "V").unwrap_err(),
            CellError::TooManyComponents
        );
    }

    #[test]
    fn numeric_cell_without_comma() {
        assert_eq!(
            parse_cell("0", "V").unwrap_err(),
            CellError::MissingValueComponent
        );
    }

    #[test]
    fn tuple_markers() {
        assert_eq!(parse_cell("-1,0", "BOT").unwrap(), Cell::BeginTuple);
        assert_eq!(parse_cell("-1,0", "EOD").unwrap(), Cell::EndData);
    }

    #[test]
    fn unknown_tag() {
        assert_eq!(
            parse_cell("-1,0", "XYZ").unwrap_err(),
            CellError::UnexpectedFormat
        );
        assert_eq!(parse_cell("", "").unwrap_err(), CellError::UnexpectedFormat);
    }
}
