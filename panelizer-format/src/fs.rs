//! Filesystem helpers for the files written next to an order.

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

/// Mode requested for new output files; the process umask still applies.
#[cfg(unix)]
pub const NEW_FILE_MODE: u32 = 0o666;

const TEMP_PREFIX: &str = ".panelizer";

/// Temporary file in `dir` that will be persisted over an output file.
///
/// Unlike [NamedTempFile::new_in], which is owner-only, the file gets the
/// same mode a plain `File::create` in `dir` would give it.
pub(crate) fn output_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(NEW_FILE_MODE));
    }

    builder.tempfile_in(dir)
}
