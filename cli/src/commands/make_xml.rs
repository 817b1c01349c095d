use panelizer_format::emit_descriptor;

use crate::cli::MakeXmlArgs;
use crate::error::{Error, Result};
use crate::util::is_dif;

pub fn run(args: MakeXmlArgs) -> Result<()> {
    if !is_dif(&args.from) {
        return Err(Error::NotDif { path: args.from });
    }

    let today = chrono::Local::now().date_naive();
    tracing::debug!(input = %args.from.display(), %today, "making descriptor");

    let (path, stats) =
        emit_descriptor(&args.from, today).map_err(|source| Error::Emit { source })?;

    if !args.quiet {
        println!(
            "Wrote {} boards to {} ({} records read, {} skipped)",
            stats.boards,
            path.display(),
            stats.records,
            stats.skipped
        );
    }

    Ok(())
}
