//! Renaming board archives to the names chosen in a descriptor.
//!
//! A board archive is a zip file holding one sketch entry (ending in `.fz`)
//! plus its resources. Renaming a board writes a copy of the archive under the
//! board's new name, with the sketch entry renamed to match.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use zip::result::{ZipError, ZipResult};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::board::BoardEntry;
use crate::descriptor::PanelizerDescriptor;

pub const DEFAULT_INNER_SUFFIX: &str = ".fz";

#[derive(Debug, thiserror::Error)]
pub enum RepackError {
    #[error("No output folder specified.")]
    NoOutputFolder,

    #[error("Board has no name. Original name: '{0}'")]
    MissingName(String),

    #[error("Unable to open archive. Path: '{}'", .1.display())]
    OpenArchive(#[source] ZipError, PathBuf),

    #[error("No entry ending in '{1}' in archive. Path: '{}'", .0.display())]
    NoInnerEntry(PathBuf, String),

    #[error("Unable to write archive. Path: '{}'", .1.display())]
    WriteArchive(#[source] ZipError, PathBuf),
}

#[derive(Debug)]
pub enum BoardOutcome {
    Renamed {
        from: PathBuf,
        to: PathBuf,
        inner_from: String,
        inner_to: String,
    },
    /// `name` and `originalName` are the same.
    Unchanged,
    /// No `originalName`, so there is nothing to rename.
    Ignored,
    Failed(RepackError),
}

#[derive(Debug)]
pub struct BoardReport {
    pub name: String,
    pub original_name: String,
    pub outcome: BoardOutcome,
}

#[derive(Debug, Default)]
pub struct RepackReport {
    pub boards: Vec<BoardReport>,
}

impl RepackReport {
    pub fn renamed(&self) -> usize {
        self.boards
            .iter()
            .filter(|x| matches!(x.outcome, BoardOutcome::Renamed { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BoardReport, &RepackError)> {
        self.boards.iter().filter_map(|x| match &x.outcome {
            BoardOutcome::Failed(e) => Some((x, e)),
            _ => None,
        })
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }
}

#[derive(Debug, Clone)]
pub struct Repackager {
    output_folder: PathBuf,
    inner_suffix: String,
}

impl Repackager {
    pub fn new<P: Into<PathBuf>>(output_folder: P) -> Result<Repackager, RepackError> {
        let output_folder = output_folder.into();
        if output_folder.as_os_str().is_empty() {
            return Err(RepackError::NoOutputFolder);
        }

        Ok(Repackager {
            output_folder,
            inner_suffix: DEFAULT_INNER_SUFFIX.to_string(),
        })
    }

    pub fn for_descriptor(descriptor: &PanelizerDescriptor) -> Result<Repackager, RepackError> {
        Self::new(descriptor.output_folder.clone())
    }

    pub fn with_inner_suffix<S: Into<String>>(mut self, suffix: S) -> Repackager {
        self.inner_suffix = suffix.into();
        self
    }

    #[inline(always)]
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    #[inline(always)]
    pub fn inner_suffix(&self) -> &str {
        &self.inner_suffix
    }

    /// Name of the sketch entry inside the archive called `archive_name`.
    pub fn inner_name(&self, archive_name: &str) -> String {
        let stem = Path::new(archive_name).with_extension("");
        format!("{}{}", stem.to_string_lossy(), self.inner_suffix)
    }

    pub fn repack_all(&self, boards: &[BoardEntry]) -> RepackReport {
        self.repack_all_with(boards, |_| {})
    }

    /// Repack every board, calling `on_board` after each one.
    ///
    /// A failing board is recorded in the report and does not stop the others.
    pub fn repack_all_with<F>(&self, boards: &[BoardEntry], mut on_board: F) -> RepackReport
    where
        F: FnMut(&BoardReport),
    {
        let mut report = RepackReport::default();
        for board in boards {
            let entry = BoardReport {
                name: board.name.clone(),
                original_name: board.original_name.clone(),
                outcome: self.repack(board),
            };
            on_board(&entry);
            report.boards.push(entry);
        }
        report
    }

    pub fn repack(&self, board: &BoardEntry) -> BoardOutcome {
        if board.original_name.is_empty() {
            return BoardOutcome::Ignored;
        }

        if board.name.is_empty() {
            let e = RepackError::MissingName(board.original_name.clone());
            tracing::warn!(error = %e, "cannot repack board");
            return BoardOutcome::Failed(e);
        }

        if board.name == board.original_name {
            return BoardOutcome::Unchanged;
        }

        match self.rename(&board.original_name, &board.name) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, name = %board.name, "cannot repack board");
                BoardOutcome::Failed(e)
            }
        }
    }

    fn rename(&self, from_name: &str, to_name: &str) -> Result<BoardOutcome, RepackError> {
        let from = self.output_folder.join(from_name);
        let to = self.output_folder.join(to_name);

        let file = File::open(&from).map_err(|e| RepackError::OpenArchive(e.into(), from.clone()))?;
        let permissions = file
            .metadata()
            .map_err(|e| RepackError::OpenArchive(e.into(), from.clone()))?
            .permissions();
        let mut source =
            ZipArchive::new(file).map_err(|e| RepackError::OpenArchive(e, from.clone()))?;

        let (inner_index, inner_from) = find_inner(&mut source, &self.inner_suffix)
            .map_err(|e| RepackError::OpenArchive(e, from.clone()))?
            .ok_or_else(|| RepackError::NoInnerEntry(from.clone(), self.inner_suffix.clone()))?;
        let inner_to = self.inner_name(to_name);

        tracing::info!(from = %inner_from, to = %inner_to, archive = %to.display(), "renaming");

        let write_failed = |e: ZipError| RepackError::WriteArchive(e, to.clone());
        let temp =
            crate::fs::output_temp_file(&self.output_folder).map_err(|e| write_failed(e.into()))?;

        let mut writer = ZipWriter::new(temp);
        copy_entries(&mut source, &mut writer, inner_index, &inner_to).map_err(write_failed)?;
        let temp = writer.finish().map_err(write_failed)?;
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| write_failed(e.into()))?;
        temp.persist(&to).map_err(|e| write_failed(e.error.into()))?;

        Ok(BoardOutcome::Renamed {
            from,
            to,
            inner_from,
            inner_to,
        })
    }
}

fn find_inner(archive: &mut ZipArchive<File>, suffix: &str) -> ZipResult<Option<(usize, String)>> {
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.name().ends_with(suffix) {
            return Ok(Some((i, entry.name().to_string())));
        }
    }
    Ok(None)
}

fn copy_entries<W: Write + Seek>(
    source: &mut ZipArchive<File>,
    dest: &mut ZipWriter<W>,
    inner_index: usize,
    inner_to: &str,
) -> ZipResult<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..source.len() {
        let mut entry = source.by_index(i)?;
        let name = if i == inner_index {
            inner_to.to_string()
        } else {
            entry.name().to_string()
        };

        if entry.is_dir() {
            dest.add_directory(name, options)?;
        } else {
            dest.start_file(name, options)?;
            std::io::copy(&mut entry, dest)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_name_replaces_extension() {
        let repackager = Repackager::new("/tmp").unwrap();
        assert_eq!(repackager.inner_name("foo.fzz_7_foo.fzz"), "foo.fzz_7_foo.fz");
        assert_eq!(repackager.inner_name("plain"), "plain.fz");

        let repackager = repackager.with_inner_suffix(".sketch");
        assert_eq!(repackager.inner_name("a.fzz"), "a.sketch");
    }

    #[test]
    fn empty_output_folder() {
        assert!(matches!(
            Repackager::new(""),
            Err(RepackError::NoOutputFolder)
        ));
    }

    #[test]
    fn boards_that_need_no_work() {
        let repackager = Repackager::new("/nonexistent").unwrap();

        let mut board = BoardEntry::product("a.fzz", 1, 0);
        assert!(matches!(repackager.repack(&board), BoardOutcome::Unchanged));

        board.original_name.clear();
        assert!(matches!(repackager.repack(&board), BoardOutcome::Ignored));
    }

    #[test]
    fn board_without_name() {
        let repackager = Repackager::new("/nonexistent").unwrap();
        let mut board = BoardEntry::ordered("a.fzz", "1", 1, 0);
        board.name.clear();
        assert!(matches!(
            repackager.repack(&board),
            BoardOutcome::Failed(RepackError::MissingName(name)) if name == "a.fzz"
        ));
    }
}
