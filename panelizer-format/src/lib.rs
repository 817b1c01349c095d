//! Herein lies the brains of the panelizer tooling.
//!
//! Use [DifReader][DifReader] to read a spreadsheet DIF export, [emit_descriptor][emit_descriptor]
//! to turn one into a `panelizer.xml` [PanelizerDescriptor][PanelizerDescriptor], and
//! [Repackager][Repackager] to rename the archives a descriptor refers to.

pub mod board;
pub mod descriptor;
pub mod dif;
pub mod emit;
mod fs;
pub mod layout;
mod record;
pub mod repack;
mod schema;

pub use board::{BoardDecision, BoardEntry, SkipReason};
pub use descriptor::{DescriptorError, PanelizerDescriptor};
pub use dif::{Cell, CellError, DifReader, FormatError};
pub use emit::{emit_descriptor, make_descriptor, read_boards, write_descriptor, EmitError, EmitStats};
pub use layout::{Layout, Millimetres};
pub use record::ValueRecord;
pub use repack::{BoardOutcome, BoardReport, RepackError, RepackReport, Repackager};
pub use schema::{FieldIndex, FieldSchema};
