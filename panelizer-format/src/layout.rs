//! Panel layout parameters.

use std::fmt;
use std::str::FromStr;

/// A whole number of millimetres, written as `<n>mm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millimetres(pub u32);

impl fmt::Display for Millimetres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid length '{0}', expected a whole number of millimetres such as '6mm'.")]
pub struct ParseLengthError(pub String);

impl FromStr for Millimetres {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_suffix("mm")
            .and_then(|x| x.trim().parse::<u32>().ok())
            .map(Millimetres)
            .ok_or_else(|| ParseLengthError(s.to_string()))
    }
}

/// Height of the inscription printed next to each board.
pub const INSCRIPTION_HEIGHT: Millimetres = Millimetres(2);

/// Sheet dimensions the boards are arranged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: Millimetres,
    pub height: Millimetres,
    pub spacing: Millimetres,
    pub border: Millimetres,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            width: Millimetres(550),
            height: Millimetres(330),
            spacing: Millimetres(6),
            border: Millimetres(0),
        }
    }
}
