use std::fmt;

/// Why a single (tag, value) line pair could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A numeric tag split into more than two comma-separated components.
    TooManyComponents,
    /// A numeric tag carried no value after its type indicator.
    MissingValueComponent,
    /// Neither a string cell, a numeric cell, nor a `BOT`/`EOD` marker.
    UnexpectedFormat,
}

impl std::error::Error for CellError {}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CellError {
    pub fn as_str(&self) -> &str {
        match self {
            CellError::TooManyComponents => "numeric tag has more than two components",
            CellError::MissingValueComponent => "numeric tag has no value component",
            CellError::UnexpectedFormat => "unexpected format",
        }
    }
}

/// Structural violation of the DIF tuple framing. Always fatal for the input.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("No DATA element found.")]
    MissingDataMarker,

    #[error("No initial BOT element found. Line: {0}")]
    MissingInitialTuple(usize),

    #[error("Input ended inside a tuple. Line: {0}")]
    UnexpectedEof(usize),

    #[error("Malformed cell ({kind}). Line: {line}, tag: '{tag}'")]
    Cell {
        line: usize,
        tag: String,
        #[source]
        kind: CellError,
    },

    #[error("Header tuple ended with EOD instead of BOT. Line: {0}")]
    HeaderWithoutRecords(usize),

    #[error("Missing '{0}' field in header tuple.")]
    MissingField(&'static str),

    #[error("Record has {found} cells but the header declares {expected}. Line: {line}")]
    RecordLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid count '{value}'. Line: {line}")]
    InvalidCount { line: usize, value: String },

    #[error("Failed to read input.")]
    ReadFailed(#[source] std::io::Error),
}
