//! From a DIF export on disk to `panelizer.xml` next to it.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::board::{BoardDecision, BoardEntry};
use crate::descriptor::PanelizerDescriptor;
use crate::dif::{DifReader, FormatError};

pub const DESCRIPTOR_FILE_NAME: &str = "panelizer.xml";

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Failed to open input file. Path: '{}'", .1.display())]
    OpenFailed(#[source] std::io::Error, PathBuf),

    #[error("Invalid DIF export. Path: '{}'", .1.display())]
    Format(#[source] FormatError, PathBuf),

    #[error("Failed to write descriptor. Path: '{}'", .1.display())]
    WriteFailed(#[source] std::io::Error, PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Data records read from the export.
    pub records: usize,
    /// Boards written to the descriptor.
    pub boards: usize,
    /// Records without a filename or order number.
    pub skipped: usize,
}

/// Read every record of a DIF export and apply the board policy to it.
///
/// Stops at the first [FormatError]; nothing read so far is returned in that case.
pub fn read_boards<R: BufRead>(input: R) -> Result<(Vec<BoardEntry>, EmitStats), FormatError> {
    let reader = DifReader::new(input)?;
    let index = *reader.index();

    let mut boards = vec![];
    let mut stats = EmitStats::default();

    for record in reader {
        let record = record?;
        stats.records += 1;

        match BoardEntry::from_record(&record, &index)? {
            BoardDecision::Board(board) => {
                tracing::info!(
                    name = %board.name,
                    count = board.required_count,
                    optional = board.max_optional_count,
                    "board"
                );
                boards.push(board);
            }
            BoardDecision::Skip(reason) => {
                tracing::debug!(line = record.line(), ?reason, "skipping record");
                stats.skipped += 1;
            }
        }
    }

    stats.boards = boards.len();
    Ok((boards, stats))
}

/// Folder the descriptor is written to: the one holding the export.
pub fn output_folder(dif_path: &Path) -> PathBuf {
    match dif_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parse `dif_path` and assemble its descriptor without writing anything.
pub fn make_descriptor<P: AsRef<Path>>(
    dif_path: P,
    date: NaiveDate,
) -> Result<(PanelizerDescriptor, EmitStats), EmitError> {
    let dif_path = dif_path.as_ref();
    let file =
        File::open(dif_path).map_err(|e| EmitError::OpenFailed(e, dif_path.to_path_buf()))?;

    let (boards, stats) = read_boards(BufReader::new(file))
        .map_err(|e| EmitError::Format(e, dif_path.to_path_buf()))?;

    let descriptor = PanelizerDescriptor::new(output_folder(dif_path), date, boards);
    Ok((descriptor, stats))
}

/// Write `panelizer.xml` into the descriptor's output folder.
///
/// The document goes to a temporary file in the same folder first and only
/// replaces the destination once it is complete.
pub fn write_descriptor(descriptor: &PanelizerDescriptor) -> Result<PathBuf, EmitError> {
    let path = descriptor.output_folder.join(DESCRIPTOR_FILE_NAME);
    let failed = |e: std::io::Error| EmitError::WriteFailed(e, path.clone());

    let mut temp = crate::fs::output_temp_file(&descriptor.output_folder).map_err(failed)?;
    {
        let mut writer = BufWriter::new(&mut temp);
        descriptor.write_xml(&mut writer).map_err(failed)?;
        writer.flush().map_err(failed)?;
    }
    temp.persist(&path).map_err(|e| failed(e.error))?;

    tracing::debug!(path = %path.display(), "wrote descriptor");
    Ok(path)
}

/// Parse `dif_path` and write its descriptor, returning where it was written.
pub fn emit_descriptor<P: AsRef<Path>>(
    dif_path: P,
    date: NaiveDate,
) -> Result<(PathBuf, EmitStats), EmitError> {
    let (descriptor, stats) = make_descriptor(dif_path, date)?;
    let path = write_descriptor(&descriptor)?;
    Ok((path, stats))
}
